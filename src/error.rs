//! Error types for the recommender

use thiserror::Error;

/// Result type alias for recommender operations
pub type Result<T> = std::result::Result<T, RecommenderError>;

/// Message shown whenever a stored artifact cannot be read back.
pub const RETRAIN_HINT: &str =
    "Serialized objects are incompatible with the current build. Please retrain the model.";

/// Error types that can occur while training or serving recommendations
#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "Serialized objects are incompatible with the current build. Please retrain the model. ({artifact}: {reason})"
    )]
    ArtifactIncompatible { artifact: String, reason: String },

    #[error("Book '{title}' not found in pivot index.")]
    NotFound { title: String },

    #[error("Invalid training data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error in [{context}]: {source}")]
    Unknown {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RecommenderError {
    /// Whether this error should be shown to the user as a retrain request.
    pub fn needs_retrain(&self) -> bool {
        matches!(self, RecommenderError::ArtifactIncompatible { .. })
    }

    /// Attach a call-site marker. Domain errors keep their variant so callers
    /// can still match on them; everything else becomes `Unknown`.
    pub fn context(self, context: impl Into<String>) -> Self {
        match self {
            e @ (RecommenderError::Configuration(_)
            | RecommenderError::ArtifactIncompatible { .. }
            | RecommenderError::NotFound { .. }
            | RecommenderError::InvalidData(_)
            | RecommenderError::Unknown { .. }) => e,
            other => RecommenderError::Unknown {
                context: context.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Extension for attaching call-site context at public boundaries.
pub trait ResultExt<T> {
    fn context(self, context: &str) -> Result<T>;
}

impl<T, E: Into<RecommenderError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_is_wrapped_with_context() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = res.context("Recommendation::recommend").unwrap_err();
        match &err {
            RecommenderError::Unknown { context, .. } => {
                assert_eq!(context, "Recommendation::recommend")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.source().is_some());
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_domain_errors_pass_through() {
        let err = RecommenderError::NotFound {
            title: "Zzz".to_string(),
        }
        .context("outer");
        assert!(matches!(err, RecommenderError::NotFound { .. }));
    }

    #[test]
    fn test_retrain_message() {
        let err = RecommenderError::ArtifactIncompatible {
            artifact: "model.bin".to_string(),
            reason: "bad magic".to_string(),
        };
        assert!(err.needs_retrain());
        assert!(err.to_string().contains("Please retrain the model."));
    }
}
