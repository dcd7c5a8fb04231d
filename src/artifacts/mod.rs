//! Persisted training output: model, pivot table, ratings table, book names.

pub mod serialization;
pub mod store;

pub use store::ArtifactStore;
