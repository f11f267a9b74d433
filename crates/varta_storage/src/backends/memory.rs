use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use varta_core::storage::{HeadlineStore, SearchStore, UserStore};
use varta_core::types::{Headline, HeadlineFilter, SearchResult, User};
use varta_core::{Error, Result};

/// In-memory backend. Headlines keep insertion order; the search set is
/// a single replaceable snapshot.
#[derive(Default)]
pub struct MemoryStorage {
    headlines: Arc<RwLock<Vec<Headline>>>,
    searches: Arc<RwLock<Vec<SearchResult>>>,
    users: Arc<RwLock<Vec<User>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HeadlineStore for MemoryStorage {
    async fn insert(&self, headline: &Headline) -> Result<()> {
        let mut headlines = self.headlines.write().await;
        headlines.push(headline.clone());
        Ok(())
    }

    async fn insert_if_absent(&self, headline: &Headline) -> Result<bool> {
        // Check and insert under one write lock so concurrent scrapes
        // cannot double-insert the same key.
        let filter = headline.dedup_filter();
        let mut headlines = self.headlines.write().await;
        if headlines.iter().any(|h| filter.matches(h)) {
            return Ok(false);
        }
        headlines.push(headline.clone());
        Ok(true)
    }

    async fn exists(&self, filter: &HeadlineFilter) -> Result<bool> {
        let headlines = self.headlines.read().await;
        Ok(headlines.iter().any(|h| filter.matches(h)))
    }

    async fn all(&self) -> Result<Vec<Headline>> {
        let headlines = self.headlines.read().await;
        Ok(headlines.clone())
    }

    async fn filter(&self, filter: &HeadlineFilter) -> Result<Vec<Headline>> {
        let headlines = self.headlines.read().await;
        Ok(headlines.iter().filter(|h| filter.matches(h)).cloned().collect())
    }

    async fn count(&self, filter: &HeadlineFilter) -> Result<usize> {
        let headlines = self.headlines.read().await;
        Ok(headlines.iter().filter(|h| filter.matches(h)).count())
    }

    async fn delete_where(&self, filter: &HeadlineFilter) -> Result<usize> {
        let mut headlines = self.headlines.write().await;
        let before = headlines.len();
        headlines.retain(|h| !filter.matches(h));
        Ok(before - headlines.len())
    }
}

#[async_trait]
impl SearchStore for MemoryStorage {
    async fn replace_all(&self, results: Vec<SearchResult>) -> Result<()> {
        let mut searches = self.searches.write().await;
        *searches = results;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<SearchResult>> {
        let searches = self.searches.read().await;
        Ok(searches.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn add(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.name == user.name || u.email == user.email) {
            return Err(Error::Auth(format!("user already exists: {}", user.name)));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find(&self, name: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.name == name).cloned())
    }

    async fn authenticate(&self, name: &str, password: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.name == name && u.password == password)
            .cloned())
    }
}
