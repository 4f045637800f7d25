use thiserror::Error;

/// Engine-level error type.
///
/// Per-candidate failures (`Extraction`) are recovered by the batch engine by
/// excluding the candidate. `Configuration` errors are raised while building the
/// catalogs and registry and abort startup.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Extraction failed for {candidate}: {reason}")]
    Extraction { candidate: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl MatchError {
    pub fn extraction(candidate: impl Into<String>, reason: impl Into<String>) -> Self {
        MatchError::Extraction {
            candidate: candidate.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for the service layer.
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::Extraction { .. } => "EXTRACTION_FAILED",
            MatchError::Configuration(_) => "CONFIGURATION_ERROR",
            MatchError::Prediction(_) => "PREDICTION_ERROR",
            MatchError::Io(_) => "IO_ERROR",
            MatchError::Json(_) => "JSON_ERROR",
            MatchError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_names_candidate() {
        let err = MatchError::extraction("alice.txt", "file is not valid UTF-8");
        assert_eq!(
            err.to_string(),
            "Extraction failed for alice.txt: file is not valid UTF-8"
        );
        assert_eq!(err.code(), "EXTRACTION_FAILED");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MatchError = io.into();
        assert_eq!(err.code(), "IO_ERROR");
    }
}
