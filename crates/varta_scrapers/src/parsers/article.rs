use std::collections::HashSet;

use futures::{stream, StreamExt};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::{image_from_attrs, CandidateItem};
use crate::classify::is_malayalam;
use crate::fetch::{ClientIdentity, PageFetcher};
use crate::urlnorm::absolutize;

/// How many article pages are fetched at once. Each candidate costs a
/// full round-trip, so the second stage is the expensive part.
const ARTICLE_FETCH_CONCURRENCY: usize = 4;

/// Two-stage parser for listing pages that carry no usable image.
/// Stage one keeps only anchors whose text contains Malayalam script
/// (navigation chrome is Latin); stage two fetches each article page and
/// pulls an image out of its metadata. Always strict: an item that still
/// has no image after the second fetch is dropped.
pub struct ArticleImageParser {
    origin: String,
    identity: ClientIdentity,
}

impl ArticleImageParser {
    pub fn new(origin: &str, identity: ClientIdentity) -> Self {
        Self {
            origin: origin.to_string(),
            identity,
        }
    }

    pub async fn parse(&self, fetcher: &dyn PageFetcher, raw: &str) -> Vec<CandidateItem> {
        let candidates = self.listing_candidates(raw);
        debug!(count = candidates.len(), "two-stage listing candidates");

        let resolved = stream::iter(candidates)
            .map(|(title, url)| async move {
                let body = match fetcher.get(&url, self.identity).await {
                    Ok(body) => body,
                    Err(e) => {
                        // A failed article fetch costs one item, not the batch.
                        warn!(%url, error = %e, "article fetch failed");
                        return None;
                    }
                };
                let image = extract_article_image(&body)?;
                Some(CandidateItem {
                    title,
                    url,
                    image: Some(absolutize(&image, &self.origin)),
                    content: String::new(),
                })
            })
            .buffered(ARTICLE_FETCH_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        resolved.into_iter().flatten().collect()
    }

    fn listing_candidates(&self, raw: &str) -> Vec<(String, String)> {
        let document = Html::parse_document(raw);
        let anchor = Selector::parse("a[href]").expect("static selector");

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for link in document.select(&anchor) {
            let title = link.text().collect::<String>().trim().to_string();
            if !is_malayalam(&title) {
                continue;
            }
            let href = link.value().attr("href").unwrap_or_default();
            let url = absolutize(href, &self.origin);
            if url.is_empty() || !seen.insert(url.clone()) {
                continue;
            }
            candidates.push((title, url));
        }
        candidates
    }
}

/// Best image on an article page: OpenGraph meta, then Twitter card,
/// then the first image inside the article body, then any image at all.
fn extract_article_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let og = Selector::parse(r#"meta[property="og:image"]"#).expect("static selector");
    if let Some(url) = document
        .select(&og)
        .next()
        .and_then(|el| el.value().attr("content"))
        .filter(|c| !c.trim().is_empty())
    {
        return Some(url.trim().to_string());
    }

    let twitter = Selector::parse(r#"meta[name="twitter:image"]"#).expect("static selector");
    if let Some(url) = document
        .select(&twitter)
        .next()
        .and_then(|el| el.value().attr("content"))
        .filter(|c| !c.trim().is_empty())
    {
        return Some(url.trim().to_string());
    }

    let article_img = Selector::parse("article img").expect("static selector");
    if let Some(url) = document
        .select(&article_img)
        .next()
        .and_then(|el| image_from_attrs(&el))
    {
        return Some(url);
    }

    let any_img = Selector::parse("img").expect("static selector");
    document
        .select(&any_img)
        .next()
        .and_then(|el| image_from_attrs(&el))
}
