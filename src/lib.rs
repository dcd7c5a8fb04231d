//! # Book Recommender
//!
//! A collaborative-filtering book recommender.
//!
//! This library provides:
//! - A training pipeline from the Book-Crossing CSV exports to a books × users pivot table
//! - A brute-force nearest-neighbour model fit over the pivot rows
//! - Versioned on-disk artifacts that refuse to load across format changes
//! - A recommendation service mapping a title to similar titles and posters
//! - An HTTP page and JSON API on top of it
//!
//! ## Example
//!
//! ```rust,no_run
//! use book_recommender::{AppConfig, Recommendation};
//!
//! let config = AppConfig::from_env()?;
//! let service = Recommendation::new(&config)?;
//!
//! let recs = service.recommend("The Da Vinci Code")?;
//! for book in recs.displayed() {
//!     println!("{} {:?}", book.title, book.poster_url);
//! }
//! # Ok::<(), book_recommender::RecommenderError>(())
//! ```

pub mod artifacts;
pub mod config;
pub mod distance;
pub mod error;
pub mod model;
pub mod pivot;
pub mod ratings;
pub mod recommend;
pub mod server;
pub mod training;
pub mod vector;

pub use artifacts::ArtifactStore;
pub use config::AppConfig;
pub use distance::DistanceMetric;
pub use error::{RecommenderError, Result};
pub use model::NearestNeighbors;
pub use pivot::PivotTable;
pub use ratings::{RatingRecord, RatingsTable};
pub use recommend::{resolve_posters, Recommendation, Recommendations};
pub use training::{train_engine, TrainingPipeline, TrainingSummary};
pub use vector::RatingVector;
