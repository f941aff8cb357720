//! One-shot seeding of the store from a JSON file.
//!
//! The file is either a top-level array of todos or an object with a `todos`
//! array. Loading never aborts startup: the caller gets a [`SeedOutcome`]
//! describing what happened and logs it.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::TodoStore;
use crate::domain::TodoId;

/// A todo as it appears in a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedTodo {
    /// Optional explicit id; one is assigned when absent.
    #[serde(default)]
    pub id: Option<TodoId>,
    #[serde(default, alias = "title")]
    pub text: String,
    #[serde(default, alias = "completed")]
    pub done: bool,
}

/// Accepted seed file layouts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeedDocument {
    /// `[ {...}, {...} ]`
    List(Vec<SeedTodo>),
    /// `{ "todos": [ ... ] }`
    Wrapped {
        /// The seeded records.
        todos: Vec<SeedTodo>,
    },
}

impl SeedDocument {
    /// Unwrap into the list of records.
    pub fn into_todos(self) -> Vec<SeedTodo> {
        match self {
            Self::List(todos) | Self::Wrapped { todos } => todos,
        }
    }
}

/// Why a seed file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The file is missing or unreadable.
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid seed document.
    #[error("malformed seed file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Counts from a seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Records inserted.
    pub loaded: usize,
    /// Records dropped because their id was already taken.
    pub skipped: usize,
}

/// Result of the startup seeding step.
#[derive(Debug)]
pub enum SeedOutcome {
    /// No seed file configured.
    Disabled,
    /// The file was read and applied.
    Loaded {
        path: PathBuf,
        report: SeedReport,
    },
    /// The file could not be used; the store was left empty.
    Failed(SeedError),
}

impl SeedOutcome {
    /// Number of records loaded, zero unless seeding succeeded.
    pub fn loaded(&self) -> usize {
        match self {
            Self::Loaded { report, .. } => report.loaded,
            Self::Disabled | Self::Failed(_) => 0,
        }
    }
}

/// Read and parse a seed file.
pub fn load_seed_file(path: &Path) -> Result<Vec<SeedTodo>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: SeedDocument =
        serde_json::from_str(&raw).map_err(|source| SeedError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(document.into_todos())
}

/// Seed `store` from `path` when one is configured.
pub fn seed_store(store: &TodoStore, path: Option<&Path>) -> SeedOutcome {
    let Some(path) = path else {
        return SeedOutcome::Disabled;
    };

    match load_seed_file(path) {
        Ok(records) => SeedOutcome::Loaded {
            path: path.to_path_buf(),
            report: store.seed(records),
        },
        Err(e) => SeedOutcome::Failed(e),
    }
}
