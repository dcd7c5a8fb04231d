//! Application configuration, read from `BOOKREC_*` environment variables.

use crate::distance::DistanceMetric;
use crate::error::{RecommenderError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Number of neighbours requested from the model, the query book included.
pub const DEFAULT_NEIGHBORS: usize = 6;

/// Top-level configuration shared by serving and training.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub artifacts_dir: PathBuf,
    pub raw_data_dir: PathBuf,
    pub bind_addr: String,
    pub neighbors: usize,
    pub metric: DistanceMetric,
    /// Users need strictly more ratings than this to be kept.
    pub min_user_ratings: usize,
    /// Titles need at least this many ratings to be kept.
    pub min_book_ratings: usize,
}

/// Artifact locations used when serving recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationConfig {
    pub trained_model_path: PathBuf,
    pub book_pivot_path: PathBuf,
    pub final_rating_path: PathBuf,
    pub book_names_path: PathBuf,
    pub manifest_path: PathBuf,
    pub neighbors: usize,
}

/// Inputs and thresholds for the training pipeline.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub books_csv: PathBuf,
    pub ratings_csv: PathBuf,
    pub min_user_ratings: usize,
    pub min_book_ratings: usize,
    pub metric: DistanceMetric,
    pub artifacts: RecommendationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("artifacts"),
            raw_data_dir: PathBuf::from("data"),
            bind_addr: "0.0.0.0:8501".to_string(),
            neighbors: DEFAULT_NEIGHBORS,
            metric: DistanceMetric::Euclidean,
            min_user_ratings: 200,
            min_book_ratings: 50,
        }
    }
}

impl AppConfig {
    /// Load from the process environment, honouring a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source. Unset variables keep defaults.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let metric = match lookup("BOOKREC_METRIC").as_deref() {
            None => defaults.metric,
            Some(raw) => parse_metric(raw)?,
        };

        Ok(Self {
            artifacts_dir: lookup("BOOKREC_ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifacts_dir),
            raw_data_dir: lookup("BOOKREC_RAW_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.raw_data_dir),
            bind_addr: lookup("BOOKREC_BIND_ADDR").unwrap_or(defaults.bind_addr),
            neighbors: parse_var(&lookup, "BOOKREC_NEIGHBORS", defaults.neighbors)?,
            metric,
            min_user_ratings: parse_var(
                &lookup,
                "BOOKREC_MIN_USER_RATINGS",
                defaults.min_user_ratings,
            )?,
            min_book_ratings: parse_var(
                &lookup,
                "BOOKREC_MIN_BOOK_RATINGS",
                defaults.min_book_ratings,
            )?,
        })
    }

    /// Point the configuration at a different artifacts directory.
    pub fn with_artifacts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.artifacts_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn get_recommendation_config(&self) -> Result<RecommendationConfig> {
        if self.artifacts_dir.as_os_str().is_empty() {
            return Err(RecommenderError::Configuration(
                "artifacts directory must not be empty".to_string(),
            ));
        }
        if self.neighbors == 0 {
            return Err(RecommenderError::Configuration(
                "neighbors must be at least 1".to_string(),
            ));
        }

        let dir = &self.artifacts_dir;
        Ok(RecommendationConfig {
            trained_model_path: dir.join("model.bin"),
            book_pivot_path: dir.join("book_pivot.bin"),
            final_rating_path: dir.join("final_rating.bin"),
            book_names_path: dir.join("book_names.bin"),
            manifest_path: dir.join("manifest.json"),
            neighbors: self.neighbors,
        })
    }

    pub fn get_training_config(&self) -> Result<TrainingConfig> {
        Ok(TrainingConfig {
            books_csv: self.raw_data_dir.join("Books.csv"),
            ratings_csv: self.raw_data_dir.join("Ratings.csv"),
            min_user_ratings: self.min_user_ratings,
            min_book_ratings: self.min_book_ratings,
            metric: self.metric,
            artifacts: self.get_recommendation_config()?,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            RecommenderError::Configuration(format!("{key} has an invalid value: {raw}"))
        }),
    }
}

fn parse_metric(raw: &str) -> Result<DistanceMetric> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "euclidean" => Ok(DistanceMetric::Euclidean),
        "cosine" => Ok(DistanceMetric::Cosine),
        other => Err(RecommenderError::Configuration(format!(
            "BOOKREC_METRIC must be euclidean or cosine, got {other}"
        ))),
    }
}
