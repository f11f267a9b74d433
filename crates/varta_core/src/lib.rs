pub mod error;
pub mod storage;
pub mod types;

pub use error::Error;
pub use types::{Category, Headline, HeadlineFilter, Language, SearchResult, User};
pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::storage::{HeadlineStore, SearchStore, UserStore};
    pub use crate::types::{Category, Headline, HeadlineFilter, Language, SearchResult, User};
    pub use crate::{Error, Result};
}
