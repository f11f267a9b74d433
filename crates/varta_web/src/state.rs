use std::sync::Arc;

use chrono::NaiveDate;

use varta_core::storage::{HeadlineStore, SearchStore, UserStore};
use varta_scrapers::ScrapeManager;

use crate::sessions::SessionStore;

pub struct AppState {
    pub headlines: Arc<dyn HeadlineStore>,
    pub searches: Arc<dyn SearchStore>,
    pub users: Arc<dyn UserStore>,
    pub manager: Arc<ScrapeManager>,
    pub sessions: SessionStore,
    /// Test override for "today"; `None` uses the local calendar date.
    pub frozen_today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(
        headlines: Arc<dyn HeadlineStore>,
        searches: Arc<dyn SearchStore>,
        users: Arc<dyn UserStore>,
        manager: Arc<ScrapeManager>,
    ) -> Self {
        Self {
            headlines,
            searches,
            users,
            manager,
            sessions: SessionStore::new(),
            frozen_today: None,
        }
    }

    /// The ingestion/freshness date for this request.
    pub fn today(&self) -> NaiveDate {
        self.frozen_today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
