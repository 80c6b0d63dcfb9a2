//! Infrastructure adapters for schedule storage.

pub mod store;

pub use store::InMemoryScheduleStore;
