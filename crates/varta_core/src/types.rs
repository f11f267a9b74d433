use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Top-level content partition. Numeric codes match the legacy records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Malayalam,
}

impl Language {
    pub fn code(&self) -> u8 {
        match self {
            Language::English => 1,
            Language::Malayalam => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Language::English),
            2 => Some(Language::Malayalam),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Malayalam => "malayalam",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "english" => Some(Language::English),
            "malayalam" => Some(Language::Malayalam),
            _ => None,
        }
    }
}

/// Content section within a language. Code 1 is the home/trending
/// section for that language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Trending,
    India,
    Movies,
    Technology,
    Sports,
}

impl Category {
    pub fn code(&self) -> u8 {
        match self {
            Category::Trending => 1,
            Category::India => 2,
            Category::Movies => 3,
            Category::Technology => 4,
            Category::Sports => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Category::Trending),
            2 => Some(Category::India),
            3 => Some(Category::Movies),
            4 => Some(Category::Technology),
            5 => Some(Category::Sports),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Trending => "trending",
            Category::India => "india",
            Category::Movies => "movies",
            Category::Technology => "tech",
            Category::Sports => "sports",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "trending" => Some(Category::Trending),
            "india" => Some(Category::India),
            "movies" => Some(Category::Movies),
            "tech" => Some(Category::Technology),
            "sports" => Some(Category::Sports),
            _ => None,
        }
    }
}

/// A single normalized news item. Created during ingestion, never
/// updated in place. `date` is the ingestion date, not the publish date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub url: String,
    pub language: Language,
    pub category: Category,
    pub image: Option<String>,
    pub content: String,
    pub date: NaiveDate,
}

impl Headline {
    /// The dedup key: two records with the same quadruple are duplicates.
    pub fn dedup_filter(&self) -> HeadlineFilter {
        HeadlineFilter::new()
            .title(&self.title)
            .language(self.language)
            .category(self.category)
            .date(self.date)
    }
}

/// Transient projection of `Headline` rebuilt wholesale on every search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub language: Language,
    pub category: Category,
    pub image: Option<String>,
    pub content: String,
}

impl From<&Headline> for SearchResult {
    fn from(h: &Headline) -> Self {
        Self {
            title: h.title.clone(),
            url: h.url.clone(),
            language: h.language,
            category: h.category,
            image: h.image.clone(),
            content: h.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub password: String,
    pub language: Language,
}

/// Conjunction of equality tests over headline fields. `None` means
/// "any value".
#[derive(Debug, Clone, Default)]
pub struct HeadlineFilter {
    pub title: Option<String>,
    pub language: Option<Language>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

impl HeadlineFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn matches(&self, headline: &Headline) -> bool {
        if let Some(ref title) = self.title {
            if headline.title != *title {
                return false;
            }
        }
        if let Some(language) = self.language {
            if headline.language != language {
                return false;
            }
        }
        if let Some(category) = self.category {
            if headline.category != category {
                return false;
            }
        }
        if let Some(date) = self.date {
            if headline.date != date {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline() -> Headline {
        Headline {
            title: "Test headline".to_string(),
            url: "https://example.com/a".to_string(),
            language: Language::English,
            category: Category::Trending,
            image: None,
            content: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
        }
    }

    #[test]
    fn test_codes_round_trip() {
        for code in 1..=2 {
            assert_eq!(Language::from_code(code).unwrap().code(), code);
        }
        for code in 1..=5 {
            assert_eq!(Category::from_code(code).unwrap().code(), code);
        }
        assert!(Language::from_code(0).is_none());
        assert!(Category::from_code(6).is_none());
    }

    #[test]
    fn test_filter_matches() {
        let h = headline();
        assert!(HeadlineFilter::new().matches(&h));
        assert!(HeadlineFilter::new()
            .language(Language::English)
            .category(Category::Trending)
            .matches(&h));
        assert!(!HeadlineFilter::new().language(Language::Malayalam).matches(&h));
        assert!(!HeadlineFilter::new().title("Other").matches(&h));
    }

    #[test]
    fn test_dedup_filter_is_fully_scoped() {
        let h = headline();
        let filter = h.dedup_filter();
        assert!(filter.title.is_some());
        assert!(filter.language.is_some());
        assert!(filter.category.is_some());
        assert!(filter.date.is_some());
    }
}
