use rss::Channel;
use tracing::debug;

use varta_core::{Error, Result};

use super::text::strip_html;
use super::{CandidateItem, ImageMode};

/// Parser for RSS 2.0 feeds. Title and link are required per item;
/// the description is entity-decoded and tag-stripped into a plain
/// excerpt. Feed order is preserved.
#[derive(Debug, Clone, Copy)]
pub struct RssParser {
    pub image_mode: ImageMode,
}

impl RssParser {
    pub fn new(image_mode: ImageMode) -> Self {
        Self { image_mode }
    }

    pub fn parse(&self, raw: &str) -> Result<Vec<CandidateItem>> {
        let channel = Channel::read_from(raw.as_bytes())
            .map_err(|e| Error::Parse(format!("rss: {}", e)))?;

        let mut items = Vec::new();
        for item in channel.items() {
            let title = match item.title().map(str::trim) {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => continue,
            };
            let link = match item.link().map(str::trim) {
                Some(l) if !l.is_empty() => l.to_string(),
                _ => continue,
            };

            let content = item.description().map(strip_html).unwrap_or_default();
            let image = media_content_url(item).or_else(|| enclosure_url(item));

            if image.is_none() && self.image_mode == ImageMode::Strict {
                debug!(%title, "discarding rss item without image");
                continue;
            }

            items.push(CandidateItem {
                title,
                url: link,
                image,
                content,
            });
        }

        Ok(items)
    }
}

/// `media:content` extension element's url attribute, the feed's primary
/// image carrier.
fn media_content_url(item: &rss::Item) -> Option<String> {
    let media = item.extensions().get("media")?;
    for content in media.get("content")? {
        if let Some(url) = content.attrs().get("url") {
            if !url.is_empty() {
                return Some(url.clone());
            }
        }
    }
    None
}

fn enclosure_url(item: &rss::Item) -> Option<String> {
    let enclosure = item.enclosure()?;
    let url = enclosure.url().trim();
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}
