use std::path::PathBuf;

use hcsolver_core::PointSetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PointFileError {
    #[error("line {line}: invalid identifier `{token}`; expected [A-Za-z0-9_]+")]
    InvalidIdentifier { line: usize, token: String },
    #[error("line {line}: point `{id}` has no coordinates")]
    MissingCoordinates { line: usize, id: String },
    #[error("line {line}: coordinate {position} of `{id}` is not a finite number: `{token}`")]
    InvalidCoordinate {
        line: usize,
        id: String,
        position: usize,
        token: String,
    },
    #[error("line {line}: point `{id}` has {actual} coordinates but expected {expected}")]
    DimensionMismatch {
        line: usize,
        id: String,
        expected: usize,
        actual: usize,
    },
    #[error("line {line}: identifier `{id}` was already defined on line {first_line}")]
    DuplicateIdentifier {
        line: usize,
        id: String,
        first_line: usize,
    },
    #[error("point set rejected: {0}")]
    Points(#[from] PointSetError),
    #[error("line {line}: read failed: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot open `{}`: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PointFileError {
    /// One-based line number the error refers to, when it has one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidIdentifier { line, .. }
            | Self::MissingCoordinates { line, .. }
            | Self::InvalidCoordinate { line, .. }
            | Self::DimensionMismatch { line, .. }
            | Self::DuplicateIdentifier { line, .. }
            | Self::Io { line, .. } => Some(*line),
            Self::Points(_) | Self::Open { .. } => None,
        }
    }
}
