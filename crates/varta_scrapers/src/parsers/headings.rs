use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use super::{image_from_attrs, CandidateItem};
use crate::urlnorm::absolutize;

/// Parser for front pages with no reliable repeating container: every
/// h2/h3 heading with an anchor inside is a candidate. Cards on these
/// pages usually place the image before the heading, so each heading is
/// paired with the nearest preceding `<img>` in document order.
pub struct HeadingParser {
    anchor: Selector,
    origin: String,
}

impl HeadingParser {
    pub fn new(origin: &str) -> Self {
        Self {
            anchor: Selector::parse("a[href]").expect("static selector"),
            origin: origin.to_string(),
        }
    }

    pub fn parse(&self, raw: &str) -> Vec<CandidateItem> {
        let document = Html::parse_document(raw);
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut last_image: Option<String> = None;

        // One walk over the whole tree: remembering the last image seen
        // gives the nearest-preceding-image lookup for free.
        for node in document.root_element().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            match element.value().name() {
                "img" => {
                    if let Some(src) = image_from_attrs(&element) {
                        last_image = Some(absolutize(&src, &self.origin));
                    }
                }
                "h2" | "h3" => {
                    let Some(anchor) = element.select(&self.anchor).next() else {
                        continue;
                    };
                    let href = anchor.value().attr("href").unwrap_or_default();
                    let url = absolutize(href, &self.origin);
                    if url.is_empty() || !seen.insert(url.clone()) {
                        continue;
                    }

                    let title = anchor.text().collect::<String>().trim().to_string();
                    if title.is_empty() {
                        continue;
                    }

                    items.push(CandidateItem {
                        title,
                        url,
                        image: last_image.clone(),
                        content: String::new(),
                    });
                }
                _ => {}
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://ml.example";

    const PAGE: &str = r#"
        <div class="card">
            <img data-src="/images/rain.jpg" src="spacer.gif">
            <h2><a href="/kerala-news/rain-alert">മഴ മുന്നറിയിപ്പ്</a></h2>
        </div>
        <div class="card">
            <h3><a href="//ml.example/sports/final">കളി ഫലം</a></h3>
        </div>
        <h2><a href="/kerala-news/rain-alert">മഴ മുന്നറിയിപ്പ്</a></h2>
        <h2><a href="/empty-title"> </a></h2>
        <h2>No anchor heading</h2>
    "#;

    #[test]
    fn test_headings_with_preceding_images() {
        let items = HeadingParser::new(ORIGIN).parse(PAGE);
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title, "മഴ മുന്നറിയിപ്പ്");
        assert_eq!(items[0].url, "https://ml.example/kerala-news/rain-alert");
        assert_eq!(items[0].image.as_deref(), Some("https://ml.example/images/rain.jpg"));

        // The second heading has no image of its own; the nearest
        // preceding one in document order carries over.
        assert_eq!(items[1].url, "https://ml.example/sports/final");
        assert_eq!(items[1].image.as_deref(), Some("https://ml.example/images/rain.jpg"));
    }

    #[test]
    fn test_duplicate_links_deduped_within_pass() {
        let items = HeadingParser::new(ORIGIN).parse(PAGE);
        let rain_items = items
            .iter()
            .filter(|i| i.url.ends_with("/rain-alert"))
            .count();
        assert_eq!(rain_items, 1);
    }

    #[test]
    fn test_heading_before_any_image() {
        let page = r#"<h2><a href="/first">First story</a></h2>
                      <img src="/late.jpg">"#;
        let items = HeadingParser::new(ORIGIN).parse(page);
        assert_eq!(items.len(), 1);
        assert!(items[0].image.is_none());
    }
}
