use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{info, warn};

use varta_core::storage::HeadlineStore;
use varta_core::types::{Headline, HeadlineFilter, Language};
use varta_core::Result;

use crate::classify::infer_category;
use crate::fetch::PageFetcher;
use crate::parsers::{
    ArticleImageParser, BlockParser, CandidateItem, HeadingParser, ImageMode, RssParser,
};
use crate::sources::{ParserKind, SourceSpec};

/// Outcome of one pass over the scrape plan. Fetch and parse errors are
/// tallied, never propagated: a dead source costs its own items only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub sources: usize,
    pub items: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub failures: usize,
}

impl RunSummary {
    fn merge(&mut self, other: RunSummary) {
        self.sources += other.sources;
        self.items += other.items;
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.failures += other.failures;
    }

    /// True when the run produced nothing or lost sources, so the caller
    /// can surface an explicit notice instead of a silently thin page.
    pub fn is_degraded(&self) -> bool {
        self.failures > 0 || self.inserted == 0
    }
}

/// Runs the scrape plan and guards freshness per (language, day).
///
/// The chain is strictly ordered and a single request's freshness miss
/// populates every category of both languages; concurrent requests for
/// the same scope await one in-flight run instead of duplicating it.
pub struct ScrapeManager {
    store: Arc<dyn HeadlineStore>,
    fetcher: Arc<dyn PageFetcher>,
    plan: Vec<SourceSpec>,
    in_flight: Mutex<HashMap<(Language, NaiveDate), Arc<Mutex<()>>>>,
}

impl ScrapeManager {
    pub fn new(
        store: Arc<dyn HeadlineStore>,
        fetcher: Arc<dyn PageFetcher>,
        plan: Vec<SourceSpec>,
    ) -> Self {
        Self {
            store,
            fetcher,
            plan,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn plan(&self) -> &[SourceSpec] {
        &self.plan
    }

    /// Freshness check plus scrape-on-miss. Returns `None` when records
    /// for (language, today) already exist and nothing was fetched.
    pub async fn ensure_fresh(
        &self,
        language: Language,
        today: NaiveDate,
    ) -> Result<Option<RunSummary>> {
        let freshness = HeadlineFilter::new().language(language).date(today);
        if self.store.exists(&freshness).await? {
            return Ok(None);
        }

        let gate = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight
                .entry((language, today))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = gate.lock().await;

        // Re-check: another request may have finished the scrape while
        // this one waited on the gate.
        if self.store.exists(&freshness).await? {
            return Ok(None);
        }

        info!(language = language.slug(), %today, "no records for today, scraping");
        Ok(Some(self.run_plan(today).await))
    }

    /// One full pass over the plan, in order. Used directly by the CLI
    /// and by `ensure_fresh` on a freshness miss.
    pub async fn run_plan(&self, today: NaiveDate) -> RunSummary {
        let mut summary = RunSummary::default();
        for spec in &self.plan {
            summary.merge(self.run_source(spec, today).await);
        }
        info!(
            sources = summary.sources,
            items = summary.items,
            inserted = summary.inserted,
            duplicates = summary.duplicates,
            failures = summary.failures,
            "scrape run finished"
        );
        summary
    }

    async fn run_source(&self, spec: &SourceSpec, today: NaiveDate) -> RunSummary {
        let mut summary = RunSummary {
            sources: 1,
            ..RunSummary::default()
        };

        let raw = match self.fetcher.get(spec.url, spec.identity).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(source = spec.name, error = %e, "fetch failed, source skipped");
                summary.failures += 1;
                return summary;
            }
        };

        let mut items = match self.parse(spec, &raw).await {
            Ok(items) => items,
            Err(e) => {
                warn!(source = spec.name, error = %e, "parse failed, source skipped");
                summary.failures += 1;
                return summary;
            }
        };
        if spec.image_mode == ImageMode::Strict {
            items.retain(|item| item.image.is_some());
        }
        summary.items = items.len();

        for item in items {
            let category = spec
                .category
                .unwrap_or_else(|| infer_category(&item.url));
            let headline = Headline {
                title: item.title,
                url: item.url,
                language: spec.language,
                category,
                image: item.image,
                content: item.content,
                date: today,
            };
            match self.store.insert_if_absent(&headline).await {
                Ok(true) => summary.inserted += 1,
                Ok(false) => summary.duplicates += 1,
                Err(e) => {
                    warn!(source = spec.name, error = %e, "insert failed");
                    summary.failures += 1;
                }
            }
        }

        summary
    }

    async fn parse(&self, spec: &SourceSpec, raw: &str) -> Result<Vec<CandidateItem>> {
        match &spec.parser {
            ParserKind::Rss => RssParser::new(spec.image_mode).parse(raw),
            ParserKind::Blocks { container } => Ok(BlockParser::new(
                container,
                spec.origin,
                spec.image_mode,
                spec.keep_untitled,
            )?
            .parse(raw)),
            ParserKind::Headings => Ok(HeadingParser::new(spec.origin).parse(raw)),
            ParserKind::TwoStage => Ok(ArticleImageParser::new(spec.origin, spec.identity)
                .parse(self.fetcher.as_ref(), raw)
                .await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use varta_core::types::Category;
    use varta_core::Error;
    use varta_storage::MemoryStorage;

    use crate::fetch::ClientIdentity;

    struct FixtureFetcher {
        pages: HashMap<String, String>,
        calls: AtomicUsize,
    }

    impl FixtureFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for FixtureFetcher {
        async fn get(&self, url: &str, _identity: ClientIdentity) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Fetch(format!("{}: no fixture", url)))
        }
    }

    const EN_FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
<channel><title>f</title><link>https://f</link><description>f</description>
<item><title>Budget session opens</title><link>https://en.test/news/budget</link>
<media:content url="https://img.test/budget.jpg"/></item>
<item><title>Monsoon forecast</title><link>https://en.test/news/monsoon</link></item>
</channel></rss>"#;

    const ML_PAGE: &str = r#"
<img src="/img/card.jpg">
<h2><a href="/sports/series-win">പരമ്പര വിജയം</a></h2>
<h3><a href="/kerala-news/budget">ബജറ്റ്</a></h3>
"#;

    fn rss_spec(url: &'static str, image_mode: ImageMode) -> SourceSpec {
        SourceSpec {
            name: "test/rss",
            url,
            origin: "https://en.test",
            language: Language::English,
            category: Some(Category::Trending),
            parser: ParserKind::Rss,
            image_mode,
            keep_untitled: false,
            identity: ClientIdentity::Browser,
        }
    }

    fn headings_spec(url: &'static str) -> SourceSpec {
        SourceSpec {
            name: "test/headings",
            url,
            origin: "https://ml.test",
            language: Language::Malayalam,
            category: None,
            parser: ParserKind::Headings,
            image_mode: ImageMode::Lenient,
            keep_untitled: false,
            identity: ClientIdentity::Browser,
        }
    }

    fn manager(
        plan: Vec<SourceSpec>,
        pages: &[(&str, &str)],
    ) -> (Arc<ScrapeManager>, Arc<MemoryStorage>, Arc<FixtureFetcher>) {
        let store = Arc::new(MemoryStorage::new());
        let fetcher = Arc::new(FixtureFetcher::new(pages));
        let manager = Arc::new(ScrapeManager::new(
            store.clone(),
            fetcher.clone(),
            plan,
        ));
        (manager, store, fetcher)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[tokio::test]
    async fn test_run_populates_both_languages() {
        let (manager, store, _) = manager(
            vec![
                rss_spec("https://en.test/feed", ImageMode::Lenient),
                headings_spec("https://ml.test/"),
            ],
            &[
                ("https://en.test/feed", EN_FEED),
                ("https://ml.test/", ML_PAGE),
            ],
        );

        let summary = manager.ensure_fresh(Language::English, today()).await.unwrap();
        let summary = summary.expect("empty store should trigger a scrape");
        assert_eq!(summary.inserted, 4);
        assert_eq!(summary.failures, 0);

        // English request populated Malayalam too; items got classified.
        let sports = store
            .filter(
                &HeadlineFilter::new()
                    .language(Language::Malayalam)
                    .category(Category::Sports),
            )
            .await
            .unwrap();
        assert_eq!(sports.len(), 1);
        assert_eq!(sports[0].title, "പരമ്പര വിജയം");
        assert_eq!(sports[0].date, today());
    }

    #[tokio::test]
    async fn test_second_run_same_day_is_idempotent() {
        let (manager, store, fetcher) = manager(
            vec![rss_spec("https://en.test/feed", ImageMode::Lenient)],
            &[("https://en.test/feed", EN_FEED)],
        );

        manager.ensure_fresh(Language::English, today()).await.unwrap();
        let count_after_first = store.count(&HeadlineFilter::new()).await.unwrap();
        let calls_after_first = fetcher.calls();

        let second = manager.ensure_fresh(Language::English, today()).await.unwrap();
        assert!(second.is_none());
        assert_eq!(store.count(&HeadlineFilter::new()).await.unwrap(), count_after_first);
        assert_eq!(fetcher.calls(), calls_after_first);
    }

    #[tokio::test]
    async fn test_next_day_triggers_rescrape() {
        let (manager, store, _) = manager(
            vec![rss_spec("https://en.test/feed", ImageMode::Lenient)],
            &[("https://en.test/feed", EN_FEED)],
        );

        manager.ensure_fresh(Language::English, today()).await.unwrap();
        let tomorrow = today().succ_opt().unwrap();
        let rerun = manager.ensure_fresh(Language::English, tomorrow).await.unwrap();
        assert!(rerun.is_some());
        // Same titles, different ingestion date: both days kept.
        assert_eq!(store.count(&HeadlineFilter::new()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_concurrent_requests_scrape_once() {
        let (manager, store, fetcher) = manager(
            vec![rss_spec("https://en.test/feed", ImageMode::Lenient)],
            &[("https://en.test/feed", EN_FEED)],
        );

        let a = tokio::spawn({
            let manager = manager.clone();
            async move { manager.ensure_fresh(Language::English, today()).await }
        });
        let b = tokio::spawn({
            let manager = manager.clone();
            async move { manager.ensure_fresh(Language::English, today()).await }
        });
        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());

        let scrapes = [a, b].iter().filter(|r| r.is_some()).count();
        assert_eq!(scrapes, 1);
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(store.count(&HeadlineFilter::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_source_does_not_abort_chain() {
        let (manager, store, _) = manager(
            vec![
                rss_spec("https://en.test/missing-feed", ImageMode::Lenient),
                headings_spec("https://ml.test/"),
            ],
            &[("https://ml.test/", ML_PAGE)],
        );

        let summary = manager.run_plan(today()).await;
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.inserted, 2);
        assert!(summary.is_degraded());
        assert!(store
            .exists(&HeadlineFilter::new().language(Language::Malayalam))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_strict_mode_end_to_end() {
        let (strict, strict_store, _) = manager(
            vec![rss_spec("https://en.test/feed", ImageMode::Strict)],
            &[("https://en.test/feed", EN_FEED)],
        );
        strict.run_plan(today()).await;
        // "Monsoon forecast" has no image and is discarded under strict.
        assert_eq!(strict_store.count(&HeadlineFilter::new()).await.unwrap(), 1);
        assert!(!strict_store
            .exists(&HeadlineFilter::new().title("Monsoon forecast"))
            .await
            .unwrap());

        let (lenient, lenient_store, _) = manager(
            vec![rss_spec("https://en.test/feed", ImageMode::Lenient)],
            &[("https://en.test/feed", EN_FEED)],
        );
        lenient.run_plan(today()).await;
        let monsoon = lenient_store
            .filter(&HeadlineFilter::new().title("Monsoon forecast"))
            .await
            .unwrap();
        assert_eq!(monsoon.len(), 1);
        assert!(monsoon[0].image.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_titles_within_run_kept_once() {
        let (manager, store, _) = manager(
            vec![
                rss_spec("https://en.test/feed", ImageMode::Lenient),
                rss_spec("https://en.test/feed", ImageMode::Lenient),
            ],
            &[("https://en.test/feed", EN_FEED)],
        );

        let summary = manager.run_plan(today()).await;
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.duplicates, 2);
        assert_eq!(store.count(&HeadlineFilter::new()).await.unwrap(), 2);
    }
}
