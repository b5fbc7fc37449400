pub mod error;
pub mod source;
pub mod storage;
pub mod types;

pub use error::{Error, FetchError, Result, StorageError};
pub use source::NewsSource;
pub use storage::KeyValueStore;
pub use types::{Article, Category};

pub mod prelude {
    pub use super::{Article, Category, Error, FetchError, NewsSource, KeyValueStore, Result, StorageError};
}
