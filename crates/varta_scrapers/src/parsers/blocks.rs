use scraper::{Html, Selector};
use tracing::debug;

use varta_core::{Error, Result};

use super::text::strip_html;
use super::{image_from_attrs, CandidateItem, ImageMode};
use crate::urlnorm::absolutize;

/// Parser for listing pages built from repeating article blocks. The
/// container selector is site-specific; within a block the first anchor
/// is the link, the first heading the title, the first paragraph the
/// excerpt, and the first image the picture.
pub struct BlockParser {
    container: Selector,
    anchor: Selector,
    heading: Selector,
    paragraph: Selector,
    image: Selector,
    origin: String,
    image_mode: ImageMode,
    keep_untitled: bool,
}

impl BlockParser {
    pub fn new(
        container: &str,
        origin: &str,
        image_mode: ImageMode,
        keep_untitled: bool,
    ) -> Result<Self> {
        let container = Selector::parse(container)
            .map_err(|e| Error::Parse(format!("container selector: {}", e)))?;
        Ok(Self {
            container,
            anchor: Selector::parse("a[href]").expect("static selector"),
            heading: Selector::parse("h1, h2, h3, h4").expect("static selector"),
            paragraph: Selector::parse("p").expect("static selector"),
            image: Selector::parse("img").expect("static selector"),
            origin: origin.to_string(),
            image_mode,
            keep_untitled,
        })
    }

    pub fn parse(&self, raw: &str) -> Vec<CandidateItem> {
        let document = Html::parse_document(raw);
        let mut items = Vec::new();

        for block in document.select(&self.container) {
            let href = match block
                .select(&self.anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
            {
                Some(href) if !href.trim().is_empty() => href,
                _ => continue,
            };
            let url = absolutize(href, &self.origin);

            let title = block
                .select(&self.heading)
                .next()
                .map(|h| h.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            if title.is_empty() && !self.keep_untitled {
                continue;
            }

            let content = block
                .select(&self.paragraph)
                .next()
                .map(|p| strip_html(&p.text().collect::<String>()))
                .unwrap_or_default();

            let image = block
                .select(&self.image)
                .next()
                .and_then(|img| image_from_attrs(&img))
                .map(|src| absolutize(&src, &self.origin));

            if image.is_none() && self.image_mode == ImageMode::Strict {
                debug!(%url, "discarding block without image");
                continue;
            }

            items.push(CandidateItem {
                title,
                url,
                image,
                content,
            });
        }

        items
    }
}
