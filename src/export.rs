//! Loading the traceability export.
//!
//! The export is a single JSON document of the form `{"items": [...]}`,
//! written by the issue-tracker sync into the build tree. Loading is
//! single-shot: any failure is fatal for the invocation and there is no
//! retry.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::domain::{DuplicateItemError, Item, TraceGraph};

/// Where the issue-tracker sync writes the export, relative to the project
/// root.
pub const DEFAULT_EXPORT_PATH: &str = "build/build/traceability.json";

/// The deserialized shape of the export document.
#[derive(Debug, serde::Deserialize)]
struct Export {
    items: Vec<Item>,
}

/// Errors that can occur while loading the export.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read traceability export at {path}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying io error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON, or an item is missing a required field.
    #[error("failed to parse traceability export at {path}")]
    Json {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Two items share an id.
    #[error(transparent)]
    Duplicate(#[from] DuplicateItemError),
}

/// Loads the export at `path` into a [`TraceGraph`].
///
/// # Errors
///
/// Returns [`LoadError`] if the file is absent or unreadable, is not a valid
/// export document, or contains duplicate item ids.
#[instrument]
pub fn load(path: &Path) -> Result<TraceGraph, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let export: Export = serde_json::from_str(&json).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let graph = collect(export.items)?;
    tracing::debug!(items = graph.len(), "loaded traceability export");
    Ok(graph)
}

fn collect(items: Vec<Item>) -> Result<TraceGraph, DuplicateItemError> {
    let mut graph = TraceGraph::new();
    for item in items {
        graph.insert(item)?;
    }
    Ok(graph)
}
