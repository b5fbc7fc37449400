pub mod config;
pub mod ids;
pub mod sources;

pub use config::ClientConfig;
pub use ids::IdStrategy;
pub use sources::GNewsClient;
pub use sources::gnews::build_request_url;

pub mod prelude {
    pub use super::{ClientConfig, GNewsClient, IdStrategy};
    pub use nr_core::{Article, Category, FetchError, NewsSource};
}
