//! Domain models for the traceability export.
//!
//! This module contains the core types: traceability items, their
//! issue-style identifiers, and the in-memory graph they form.

/// Issue-style identifier types and parsing.
pub mod issue_id;
pub use issue_id::{Error as IssueIdError, IssueId};

/// Traceability item model.
pub mod item;
pub use item::{Item, ItemKind};

/// The in-memory traceability graph.
pub mod graph;
pub use graph::{DuplicateItemError, TraceGraph};
