use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed edge file: {0}")]
    Csv(#[from] csv::Error),

    /// Header row has fewer than source, target and score columns.
    #[error("expected at least 3 columns (source, target, score), found {found}")]
    MissingColumns { found: usize },

    #[error("line {line}: confidence score {value:?} is not a number")]
    InvalidScore { line: u64, value: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("ILP solver failed: {0}")]
    Solver(#[from] good_lp::ResolutionError),

    #[error("solver returned a set that leaves {undominated} node(s) uncovered")]
    NotDominating { undominated: usize },

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("cannot serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn render(err: impl std::fmt::Display) -> Self {
        AnalysisError::Render(err.to_string())
    }

    /// Errors raised while reading the configuration or the edge list.
    /// These end the run with a message instead of a trace.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::Io { .. }
                | AnalysisError::Csv(_)
                | AnalysisError::MissingColumns { .. }
                | AnalysisError::InvalidScore { .. }
                | AnalysisError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
