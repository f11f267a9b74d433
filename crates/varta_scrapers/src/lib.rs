pub mod classify;
pub mod fetch;
pub mod parsers;
pub mod pipeline;
pub mod sources;
pub mod urlnorm;

pub use fetch::{HttpFetcher, PageFetcher};
pub use pipeline::{RunSummary, ScrapeManager};
pub use sources::{default_plan, SourceSpec};

pub mod prelude {
    pub use crate::fetch::{ClientIdentity, HttpFetcher, PageFetcher};
    pub use crate::parsers::{CandidateItem, ImageMode};
    pub use crate::pipeline::{RunSummary, ScrapeManager};
    pub use varta_core::{Error, Result};
}
