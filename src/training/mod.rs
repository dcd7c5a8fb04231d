//! Training pipeline: raw CSV -> cleaned ratings -> pivot table -> fitted model.

pub mod cleaning;
pub mod ingestion;

use crate::artifacts::ArtifactStore;
use crate::config::{AppConfig, TrainingConfig};
use crate::error::{Result, ResultExt};
use crate::model::NearestNeighbors;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// What a training run produced.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrainingSummary {
    pub books: usize,
    pub users: usize,
    pub ratings: usize,
}

pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Run every stage and write all artifacts. Runs synchronously.
    pub fn start_training_pipeline(&self) -> Result<TrainingSummary> {
        let start = Instant::now();
        let cfg = &self.config;

        let books = ingestion::read_books(&cfg.books_csv).context("data ingestion")?;
        let raw_ratings = ingestion::read_ratings(&cfg.ratings_csv).context("data ingestion")?;

        let ratings = cleaning::clean(
            &books,
            &raw_ratings,
            cfg.min_user_ratings,
            cfg.min_book_ratings,
        );
        let pivot = cleaning::pivot(&ratings)?;

        let store = ArtifactStore::new(cfg.artifacts.clone());
        store.save_ratings(&ratings).context("data transformation")?;
        store.save_pivot(&pivot).context("data transformation")?;
        store
            .save_book_names(pivot.titles())
            .context("data transformation")?;

        let model = NearestNeighbors::fit(pivot.rows().to_vec(), cfg.metric)?;
        store.save_model(&model).context("model trainer")?;
        store
            .save_manifest(&pivot, &ratings)
            .context("model trainer")?;

        let summary = TrainingSummary {
            books: pivot.len(),
            users: pivot.users().len(),
            ratings: ratings.len(),
        };
        info!(
            books = summary.books,
            users = summary.users,
            ratings = summary.ratings,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "training pipeline finished"
        );
        Ok(summary)
    }
}

/// Train from the configured raw data and replace the served artifacts.
pub fn train_engine(config: &AppConfig) -> Result<TrainingSummary> {
    let training = config.get_training_config()?;
    let summary = TrainingPipeline::new(training)
        .start_training_pipeline()
        .context("train_engine")?;
    info!("Training completed!");
    Ok(summary)
}
