use url::Url;
use varta_core::types::Category;

/// Maps an article URL's path to a category. This is the fallback used
/// when a source page has no explicit per-section category; the more
/// specific segments are checked first because every section path also
/// matches the generic "/news" test.
pub fn infer_category(article_url: &str) -> Category {
    let path = Url::parse(article_url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_default();

    if path.contains("/sports") {
        Category::Sports
    } else if path.contains("/entertainment") {
        Category::Movies
    } else if path.contains("/tech") {
        Category::Technology
    } else if path.contains("/kerala-news") || path.contains("/news") {
        Category::India
    } else {
        Category::Trending
    }
}

/// True if the text contains at least one character from the Malayalam
/// Unicode block (U+0D00..U+0D7F). Used to tell article links apart from
/// navigation chrome on Malayalam listing pages.
pub fn is_malayalam(text: &str) -> bool {
    text.chars().any(|c| ('\u{0d00}'..='\u{0d7f}').contains(&c))
}
