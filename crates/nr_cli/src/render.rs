use nr_core::{Article, Category};
use nr_feed::{Bookmarks, FeedController, FeedPhase, ShareLinks};

pub fn print_feed(controller: &FeedController, dark_mode: bool) {
    let query = controller.query();
    let theme = if dark_mode { "🌙" } else { "☀️" };
    let heading = if query.search.is_empty() {
        format!("{} {}", theme, capitalize(query.category.as_str()))
    } else {
        format!("{} {} · \"{}\"", theme, capitalize(query.category.as_str()), query.search)
    };
    println!("{}", heading);

    if let Some(error) = controller.error() {
        println!("⚠️  {}", error);
    }

    if controller.phase() == FeedPhase::Loading {
        println!("⏳ Loading...");
        return;
    }

    let view = controller.view();
    if view.is_empty() {
        println!("No articles found.");
    }
    for article in &view {
        print_article(article, controller.bookmarks());
    }
}

fn print_article(article: &Article, bookmarks: &Bookmarks) {
    let marker = if bookmarks.contains(&article.id) { "★" } else { "☆" };
    println!("{} [{}] {}", marker, article.id, article.title);
    println!(
        "    {} · {} · {}",
        article.source_name,
        article.published_at.format("%Y-%m-%d %H:%M"),
        article.category.map(|c| c.as_str()).unwrap_or("general"),
    );
    println!("    {}", article.description);
    println!("    {}", article.url);
}

pub fn print_share(article: &Article, links: &ShareLinks) {
    println!("Share \"{}\"", article.title);
    println!("  X:        {}", links.x);
    println!("  LinkedIn: {}", links.linkedin);
    println!("  Link:     {}", links.copy);
}

pub fn print_categories(selected: Category) {
    for category in Category::ALL_CATEGORIES {
        let marker = if category == selected { "*" } else { " " };
        println!("{} {}", marker, capitalize(category.as_str()));
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
