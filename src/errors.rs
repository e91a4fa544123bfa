// ============================================================
// Workflow Errors
// ============================================================
// One error type shared by every layer. The three kinds that
// the split generator surfaces to callers are:
//
//   NotFound      — a required input file is missing
//   AlreadyExists — the outer split archive is already on disk
//   Validation    — an index overlap or an invalid input value
//
// The remaining variants wrap the third-party failures from
// SQLite, the .npz codec and the JSON config loader so that
// the offending path always travels with the message.
//
// The application layer returns anyhow::Result; callers that
// need the kind back use `err.downcast_ref::<WorkflowError>()`.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for missing inputs, clobber protection, invariant
/// violations and the underlying storage failures.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("missing {what}: {}", path.display())]
    NotFound { what: String, path: PathBuf },

    #[error(
        "outer splits already exist at {}. Please remove it to create new splits.",
        path.display()
    )]
    AlreadyExists { path: PathBuf },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("trajectory database '{}' could not be read: {source}", path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("cannot write split archive '{}': {source}", path.display())]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: ndarray_npy::WriteNpzError,
    },

    #[error("cannot read split archive '{}': {source}", path.display())]
    ArchiveRead {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpzError,
    },

    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid configuration in '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl WorkflowError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    /// True for the `NotFound` kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for the `AlreadyExists` kind.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// True for the `Validation` kind.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_message_names_the_path() {
        let err = WorkflowError::AlreadyExists {
            path: PathBuf::from("data/splits/T300_1/outer_splits.npz"),
        };
        let msg = err.to_string();
        assert!(msg.contains("data/splits/T300_1/outer_splits.npz"));
        assert!(msg.contains("Please remove it"));
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_kind_predicates() {
        assert!(WorkflowError::not_found("split file", "x.npz").is_not_found());
        assert!(WorkflowError::Validation("overlap".into()).is_validation());
        assert!(!WorkflowError::Validation("overlap".into()).is_not_found());
    }
}
