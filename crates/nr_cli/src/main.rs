use clap::Parser;
use nr_core::{Category, Error};
use nr_feed::{load_bookmarks, Bookmarks, FeedController, Preferences, ShareLinks};
use nr_fetch::config::DEFAULT_BASE_URL;
use nr_fetch::{ClientConfig, GNewsClient, IdStrategy};
use nr_storage::{DurableStore, StoreKind, DEFAULT_STORE_PATH};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod browse;
mod logging;
mod render;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_millis = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;
        let mut chars = s.trim().chars().peekable();

        while let Some(c) = chars.next() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                let millis = match c {
                    'm' if chars.peek() == Some(&'s') => {
                        chars.next();
                        num
                    }
                    's' => num * 1_000,
                    'm' => num * 60_000,
                    'h' => num * 3_600_000,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_millis += millis;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // If we have a number but no unit, assume seconds
        if !current_number.is_empty() {
            match current_number.parse::<u64>() {
                Ok(num) => {
                    total_millis += num * 1_000;
                    has_unit = true;
                }
                Err(_) => return Err("Invalid number in duration".to_string()),
            }
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_millis(total_millis)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Read the news from your terminal", long_about = None)]
pub struct Cli {
    /// GNews API key
    #[arg(long, env = "GNEWS_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Where bookmarks and preferences are kept
    #[arg(long, value_enum, default_value_t = StoreKind::Json)]
    storage: StoreKind,
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    store_path: PathBuf,
    /// Upper bound for one fetch (e.g. 10s, 1m, 500ms)
    #[arg(long, default_value = "10s")]
    timeout: HumanDuration,
    #[arg(long, value_enum, default_value_t = IdStrategy::Sequential)]
    id_strategy: IdStrategy,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show top headlines
    Headlines {
        #[arg(short, long, default_value = "all")]
        category: Category,
    },
    /// Search articles by keyword
    Search {
        query: String,
        #[arg(short, long, default_value = "all")]
        category: Category,
    },
    /// Manage bookmarked article ids
    Bookmarks {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Show or change the dark mode preference
    DarkMode {
        #[arg(value_enum)]
        action: Option<Switch>,
    },
    /// Print share links for an article of a fresh fetch
    Share {
        id: String,
        #[arg(short, long, default_value = "all")]
        category: Category,
        #[arg(short, long)]
        query: Option<String>,
    },
    /// List the available categories
    Categories,
    /// Interactive reader
    Browse {
        /// Search debounce delay in milliseconds
        #[arg(long, default_value_t = 500)]
        debounce: u64,
    },
}

#[derive(clap::Subcommand, Debug)]
enum BookmarkCommands {
    List,
    Toggle { id: String },
    Clear,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum Switch {
    On,
    Off,
    Toggle,
}

async fn create_controller(cli: &Cli, store: DurableStore) -> anyhow::Result<FeedController> {
    if cli.api_key.is_empty() {
        warn!("No API key set (--api-key or GNEWS_API_KEY); requests will fail and built-in articles will be shown");
    }
    let config = ClientConfig::new(cli.api_key.clone())
        .with_base_url(cli.base_url.clone())
        .with_id_strategy(cli.id_strategy)
        .with_timeout(cli.timeout.0);
    let source = Arc::new(GNewsClient::new(config)?);
    info!("🦗 News source initialized (using {})", nr_core::NewsSource::name(source.as_ref()));

    Ok(FeedController::new(source, store).await.with_timeout(cli.timeout.0))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let backend = nr_storage::create_store(cli.storage, &cli.store_path).await?;
    info!("💾 Storage initialized (using {})", cli.storage);
    let store = DurableStore::new(backend);
    let mut prefs = Preferences::load(store.clone()).await;

    match &cli.command {
        Commands::Headlines { category } => {
            let mut controller = create_controller(&cli, store).await?.with_query(*category, "");
            controller.refresh().await;
            render::print_feed(&controller, prefs.dark_mode());
        }
        Commands::Search { query, category } => {
            let mut controller = create_controller(&cli, store).await?.with_query(*category, query);
            controller.refresh().await;
            render::print_feed(&controller, prefs.dark_mode());
        }
        Commands::Bookmarks { command } => {
            let mut bookmarks = load_bookmarks(store).await;
            match command {
                BookmarkCommands::List => {
                    if bookmarks.get().is_empty() {
                        println!("No bookmarks.");
                    }
                    for id in bookmarks.get().ids() {
                        println!("★ {}", id);
                    }
                }
                BookmarkCommands::Toggle { id } => {
                    let mut bookmarked = false;
                    bookmarks.update(|b| bookmarked = b.toggle(id)).await;
                    if bookmarked {
                        println!("★ Bookmarked {}", id);
                    } else {
                        println!("☆ Removed bookmark {}", id);
                    }
                }
                BookmarkCommands::Clear => {
                    bookmarks.update(Bookmarks::clear).await;
                    println!("Bookmarks cleared.");
                }
            }
        }
        Commands::DarkMode { action } => {
            match action {
                Some(Switch::On) => prefs.set_dark_mode(true).await,
                Some(Switch::Off) => prefs.set_dark_mode(false).await,
                Some(Switch::Toggle) => {
                    prefs.toggle_dark_mode().await;
                }
                None => {}
            }
            println!("Dark mode: {}", if prefs.dark_mode() { "on" } else { "off" });
        }
        Commands::Share { id, category, query } => {
            let mut controller = create_controller(&cli, store)
                .await?
                .with_query(*category, query.as_deref().unwrap_or_default());
            controller.refresh().await;
            if let Some(error) = controller.error() {
                println!("⚠️  {}", error);
            }
            let article = controller
                .find(id)
                .ok_or_else(|| Error::ArticleNotFound(id.clone()))?;
            render::print_share(article, &ShareLinks::for_article(article)?);
        }
        Commands::Categories => render::print_categories(Category::All),
        Commands::Browse { debounce } => {
            let controller = create_controller(&cli, store).await?;
            browse::run(controller, prefs, Duration::from_millis(*debounce)).await?;
        }
    }

    Ok(())
}
