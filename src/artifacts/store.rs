//! Artifact store: save/load the four training artifacts to/from disk.

use crate::artifacts::serialization::{self, ArtifactKind};
use crate::config::RecommendationConfig;
use crate::error::{RecommenderError, Result};
use crate::model::NearestNeighbors;
use crate::pivot::PivotTable;
use crate::ratings::RatingsTable;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Reads and writes artifacts at the locations named by a
/// [`RecommendationConfig`]. Nothing is cached: every load hits the disk.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    config: RecommendationConfig,
}

impl ArtifactStore {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    pub fn save_model(&self, model: &NearestNeighbors) -> Result<()> {
        save(&self.config.trained_model_path, ArtifactKind::Model, model)
    }

    pub fn save_pivot(&self, pivot: &PivotTable) -> Result<()> {
        save(&self.config.book_pivot_path, ArtifactKind::BookPivot, pivot)
    }

    pub fn save_ratings(&self, ratings: &RatingsTable) -> Result<()> {
        save(&self.config.final_rating_path, ArtifactKind::FinalRating, ratings)
    }

    pub fn save_book_names(&self, names: &[String]) -> Result<()> {
        save(&self.config.book_names_path, ArtifactKind::BookNames, &names)
    }

    /// Write a human-readable summary next to the binary artifacts.
    pub fn save_manifest(&self, pivot: &PivotTable, ratings: &RatingsTable) -> Result<()> {
        let manifest = serde_json::json!({
            "format_version": serialization::FORMAT_VERSION,
            "books": pivot.len(),
            "users": pivot.users().len(),
            "ratings": ratings.len(),
        });
        let bytes = serde_json::to_vec_pretty(&manifest).map_err(|e| {
            RecommenderError::Unknown {
                context: "ArtifactStore::save_manifest".to_string(),
                source: Box::new(e),
            }
        })?;
        write_atomic(&self.config.manifest_path, &bytes)?;
        Ok(())
    }

    pub fn load_model(&self) -> Result<NearestNeighbors> {
        load(&self.config.trained_model_path, ArtifactKind::Model)
    }

    pub fn load_pivot(&self) -> Result<PivotTable> {
        load(&self.config.book_pivot_path, ArtifactKind::BookPivot)
    }

    pub fn load_ratings(&self) -> Result<RatingsTable> {
        load(&self.config.final_rating_path, ArtifactKind::FinalRating)
    }

    pub fn load_book_names(&self) -> Result<Vec<String>> {
        load(&self.config.book_names_path, ArtifactKind::BookNames)
    }

    /// Load the model together with the pivot table it was fit against.
    /// Their row counts must agree, otherwise neighbour indices would point
    /// at the wrong books, and so must their user counts, otherwise a pivot
    /// row cannot be compared against the model rows.
    pub fn load_model_and_pivot(&self) -> Result<(NearestNeighbors, PivotTable)> {
        let model = self.load_model()?;
        let pivot = self.load_pivot()?;

        if model.len() != pivot.len() {
            error!(
                model_rows = model.len(),
                pivot_rows = pivot.len(),
                "model and pivot table disagree on row count"
            );
            return Err(RecommenderError::ArtifactIncompatible {
                artifact: self.config.trained_model_path.display().to_string(),
                reason: format!(
                    "model was fit on {} rows but the pivot table has {}",
                    model.len(),
                    pivot.len()
                ),
            });
        }
        if !model.is_empty() && model.dimension() != pivot.users().len() {
            error!(
                model_users = model.dimension(),
                pivot_users = pivot.users().len(),
                "model and pivot table disagree on user count"
            );
            return Err(RecommenderError::ArtifactIncompatible {
                artifact: self.config.trained_model_path.display().to_string(),
                reason: format!(
                    "model was fit on {} users but the pivot table has {}",
                    model.dimension(),
                    pivot.users().len()
                ),
            });
        }
        Ok((model, pivot))
    }

    /// Whether the book-name list still matches the pivot index. A mismatch
    /// does not fail anything, but selections may not resolve exactly.
    pub fn check_book_names(&self, names: &[String], pivot: &PivotTable) -> bool {
        let consistent = names == pivot.titles();
        if !consistent {
            warn!(
                names = names.len(),
                pivot_rows = pivot.len(),
                "book name list is out of sync with the pivot table"
            );
        }
        consistent
    }
}

fn save<T: Serialize>(path: &Path, kind: ArtifactKind, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = serialization::encode(kind, value)?;
    write_atomic(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), ?kind, "artifact saved");
    Ok(())
}

/// Write next to `path` and rename over it, so readers see either the old
/// file or the new one, never a partial write.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn load<T: DeserializeOwned>(path: &Path, kind: ArtifactKind) -> Result<T> {
    let bytes = fs::read(path)?;
    let name = path.display().to_string();
    serialization::decode(&name, kind, &bytes).map_err(|e| {
        error!(artifact = %name, error = %e, "artifact loading failed");
        e
    })
}
