pub mod backends;

pub use backends::memory::MemoryStorage;

pub mod prelude {
    pub use super::backends::memory::MemoryStorage;
    pub use varta_core::storage::{HeadlineStore, SearchStore, UserStore};
}
