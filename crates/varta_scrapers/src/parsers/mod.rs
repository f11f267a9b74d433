use scraper::ElementRef;

pub mod article;
pub mod blocks;
pub mod headings;
pub mod rss;

pub use article::ArticleImageParser;
pub use blocks::BlockParser;
pub use headings::HeadingParser;
pub use rss::RssParser;

/// One parsed listing entry before classification and record building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub content: String,
}

/// Whether a parser keeps items that yielded no image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// Save the item with `image = None`.
    Lenient,
    /// Discard the item entirely.
    Strict,
}

/// Image source attributes checked in priority order. Listing pages
/// commonly lazy-load images, so the real URL tends to live in a
/// non-standard attribute while `src` holds a placeholder.
const IMAGE_ATTRS: &[&str] = &["data-lazy-src", "data-src", "srcset", "src"];

/// First usable image URL on an `<img>` element. A srcset value is cut
/// down to its first URL token.
pub(crate) fn image_from_attrs(img: &ElementRef) -> Option<String> {
    for attr in IMAGE_ATTRS {
        if let Some(value) = img.value().attr(attr) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if *attr == "srcset" {
                if let Some(first) = value.split([',', ' ']).find(|t| !t.is_empty()) {
                    return Some(first.to_string());
                }
                continue;
            }
            return Some(value.to_string());
        }
    }
    None
}

pub(crate) mod text {
    /// Decodes the common HTML entities and strips markup tags, collapsing
    /// runs of whitespace to single spaces.
    pub fn strip_html(html: &str) -> String {
        let decoded = html
            .replace("&nbsp;", " ")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&");

        let mut result = String::with_capacity(decoded.len());
        let mut in_tag = false;
        for c in decoded.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => result.push(c),
                _ => {}
            }
        }

        result.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_img(html: &str) -> Option<String> {
        let doc = Html::parse_fragment(html);
        let selector = Selector::parse("img").unwrap();
        doc.select(&selector).next().and_then(|el| image_from_attrs(&el))
    }

    #[test]
    fn test_lazy_attr_beats_src() {
        let image = first_img(
            r#"<img data-lazy-src="https://cdn/real.jpg" src="placeholder.gif">"#,
        );
        assert_eq!(image.as_deref(), Some("https://cdn/real.jpg"));
    }

    #[test]
    fn test_srcset_first_token() {
        let image = first_img(r#"<img srcset="https://cdn/a.jpg 300w, https://cdn/b.jpg 600w">"#);
        assert_eq!(image.as_deref(), Some("https://cdn/a.jpg"));
    }

    #[test]
    fn test_plain_src_fallback() {
        assert_eq!(
            first_img(r#"<img src="https://cdn/c.jpg">"#).as_deref(),
            Some("https://cdn/c.jpg")
        );
        assert_eq!(first_img("<img>"), None);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            text::strip_html("<p>One &amp; two,&nbsp; <b>three</b></p>"),
            "One & two, three"
        );
        assert_eq!(text::strip_html("  plain   text  "), "plain text");
        assert_eq!(text::strip_html(""), "");
    }
}
