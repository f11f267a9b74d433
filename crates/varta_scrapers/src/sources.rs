use varta_core::types::{Category, Language};

use crate::fetch::ClientIdentity;
use crate::parsers::ImageMode;

/// Which parser a source's pages go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserKind {
    Rss,
    Blocks { container: &'static str },
    Headings,
    TwoStage,
}

/// One entry of the scrape plan. The chain is data: the orchestrator
/// iterates these in order instead of sources calling each other.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub name: &'static str,
    pub url: &'static str,
    pub origin: &'static str,
    pub language: Language,
    /// Fixed category for the whole source; `None` infers per item from
    /// the article URL path.
    pub category: Option<Category>,
    pub parser: ParserKind,
    pub image_mode: ImageMode,
    pub keep_untitled: bool,
    pub identity: ClientIdentity,
}

const HINDU_ORIGIN: &str = "https://www.thehindu.com";
const IE_ML_ORIGIN: &str = "https://malayalam.indianexpress.com";

fn hindu_feed(
    name: &'static str,
    url: &'static str,
    category: Category,
) -> SourceSpec {
    SourceSpec {
        name,
        url,
        origin: HINDU_ORIGIN,
        language: Language::English,
        category: Some(category),
        parser: ParserKind::Rss,
        image_mode: ImageMode::Lenient,
        keep_untitled: false,
        identity: ClientIdentity::Browser,
    }
}

/// The default scrape plan. English categories keep the legacy order
/// (Trending, then the Malayalam front page, then India, Technology,
/// Sports, Movies); the Malayalam section pages follow their front page.
pub fn default_plan() -> Vec<SourceSpec> {
    vec![
        hindu_feed(
            "thehindu/news",
            "https://www.thehindu.com/news/?service=rss",
            Category::Trending,
        ),
        SourceSpec {
            name: "iemalayalam/frontpage",
            url: "https://malayalam.indianexpress.com/",
            origin: IE_ML_ORIGIN,
            language: Language::Malayalam,
            category: None,
            parser: ParserKind::Headings,
            image_mode: ImageMode::Lenient,
            keep_untitled: false,
            identity: ClientIdentity::Browser,
        },
        SourceSpec {
            name: "iemalayalam/entertainment",
            url: "https://malayalam.indianexpress.com/entertainment/",
            origin: IE_ML_ORIGIN,
            language: Language::Malayalam,
            category: Some(Category::Movies),
            parser: ParserKind::Blocks {
                container: "div.articles, div.ie-first-story",
            },
            image_mode: ImageMode::Lenient,
            keep_untitled: false,
            identity: ClientIdentity::Browser,
        },
        SourceSpec {
            name: "iemalayalam/sports",
            url: "https://malayalam.indianexpress.com/sports/",
            origin: IE_ML_ORIGIN,
            language: Language::Malayalam,
            category: Some(Category::Sports),
            parser: ParserKind::TwoStage,
            image_mode: ImageMode::Strict,
            keep_untitled: false,
            identity: ClientIdentity::Googlebot,
        },
        hindu_feed(
            "thehindu/national",
            "https://www.thehindu.com/news/national/?service=rss",
            Category::India,
        ),
        hindu_feed(
            "thehindu/technology",
            "https://www.thehindu.com/sci-tech/technology/?service=rss",
            Category::Technology,
        ),
        hindu_feed(
            "thehindu/sport",
            "https://www.thehindu.com/sport/?service=rss",
            Category::Sports,
        ),
        hindu_feed(
            "thehindu/movies",
            "https://www.thehindu.com/entertainment/movies/?service=rss",
            Category::Movies,
        ),
    ]
}
