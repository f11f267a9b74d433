use async_trait::async_trait;

use crate::types::{Headline, HeadlineFilter, SearchResult, User};
use crate::Result;

#[async_trait]
pub trait HeadlineStore: Send + Sync {
    /// Append a headline unconditionally.
    async fn insert(&self, headline: &Headline) -> Result<()>;

    /// Atomically insert unless a record with the same
    /// (title, language, category, date) already exists.
    /// Returns true if the headline was inserted.
    async fn insert_if_absent(&self, headline: &Headline) -> Result<bool>;

    async fn exists(&self, filter: &HeadlineFilter) -> Result<bool>;

    /// All headlines in insertion order.
    async fn all(&self) -> Result<Vec<Headline>>;

    async fn filter(&self, filter: &HeadlineFilter) -> Result<Vec<Headline>>;

    async fn count(&self, filter: &HeadlineFilter) -> Result<usize>;

    async fn delete_where(&self, filter: &HeadlineFilter) -> Result<usize>;
}

#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Drop the previous result set and store a new one.
    async fn replace_all(&self, results: Vec<SearchResult>) -> Result<()>;

    async fn all(&self) -> Result<Vec<SearchResult>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a user. Fails with `Error::Auth` if a user with the same
    /// name or email already exists.
    async fn add(&self, user: &User) -> Result<()>;

    async fn find(&self, name: &str) -> Result<Option<User>>;

    /// Plaintext credential check. `None` covers both unknown user and
    /// wrong password; callers must not distinguish the two.
    async fn authenticate(&self, name: &str, password: &str) -> Result<Option<User>>;
}
