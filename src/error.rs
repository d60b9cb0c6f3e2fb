use std::path::PathBuf;
use thiserror::Error;

use crate::types::{Chain, Strictness};

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Required input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Malformed input {}:{line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "No valid chain exists in the available-edge subgraph (requested {limit}); \
         try --find-one-reuse or --allow-one-reuse to relax the uniqueness constraint"
    )]
    NoSolution { limit: usize },

    #[error("Generated chain fails {mode} validation: {}", format_chain(chain))]
    ValidationMismatch { chain: Chain, mode: Strictness },
}

impl ChainError {
    pub fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Map an IO failure, promoting "not found" to `MissingInput`
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingInput { path }
        } else {
            Self::Io { path, source }
        }
    }
}

fn format_chain(chain: &Chain) -> String {
    chain
        .iter()
        .map(|w| w.as_str())
        .collect::<Vec<_>>()
        .join(" → ")
}

pub type Result<T> = std::result::Result<T, ChainError>;
