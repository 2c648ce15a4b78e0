//! Traceability auditing for the AVB filter driver project.
//!
//! Loads the JSON traceability export produced by the issue-tracker sync and
//! classifies requirement → architecture-decision linkage. Also scans the
//! driver sources for IOCTL handlers, device implementations and test tools
//! to draft requirement issues from existing code.

pub mod domain;
pub use domain::{Item, ItemKind, IssueId, TraceGraph};

/// Loading the traceability export from disk.
pub mod export;
pub use export::LoadError;

pub mod linkage;
pub use linkage::{LinkageReport, Topic};

pub mod plan;
pub use plan::UpdatePlan;

pub mod scan;
