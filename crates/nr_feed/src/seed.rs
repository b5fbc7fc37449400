use chrono::{TimeZone, Utc};
use nr_core::{Article, Category};

/// The built-in articles shown before the first fetch and whenever a fetch
/// fails.
pub fn seed_articles() -> Vec<Article> {
    vec![
        Article {
            id: "1".to_string(),
            title: "The Future of AI in Healthcare".to_string(),
            description: "Artificial Intelligence is revolutionizing healthcare with breakthrough \
                          innovations in diagnosis and treatment..."
                .to_string(),
            source_name: "Tech Daily".to_string(),
            category: Some(Category::Technology),
            url: "https://example.com".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1576091160399-112ba8d25d1d?auto=format&fit=crop&q=80"
                    .to_string(),
            ),
            published_at: Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap(),
        },
        Article {
            id: "2".to_string(),
            title: "Global Climate Summit Reaches Historic Agreement".to_string(),
            description: "World leaders have reached a landmark agreement on reducing carbon \
                          emissions..."
                .to_string(),
            source_name: "World News".to_string(),
            category: Some(Category::World),
            url: "https://example.com".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1569163139599-0f4517e36f51?auto=format&fit=crop&q=80"
                    .to_string(),
            ),
            published_at: Utc.with_ymd_and_hms(2024, 3, 9, 15, 30, 0).unwrap(),
        },
        Article {
            id: "3".to_string(),
            title: "Breaking Records at the Olympics".to_string(),
            description: "Athletes from around the world continue to push boundaries and set new \
                          records..."
                .to_string(),
            source_name: "Sports Central".to_string(),
            category: Some(Category::Sports),
            url: "https://example.com".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1461896836934-ffe607ba8211?auto=format&fit=crop&q=80"
                    .to_string(),
            ),
            published_at: Utc.with_ymd_and_hms(2024, 3, 8, 20, 15, 0).unwrap(),
        },
    ]
}
