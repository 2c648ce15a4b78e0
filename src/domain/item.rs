use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use super::IssueId;

/// The declared kind of a traceability item.
///
/// The export writes kinds as strings (`"REQ-F"`, `"ADR"`, …). Kinds this
/// tool has no special handling for (`StR`, milestone markers, …) are carried
/// through verbatim rather than rejected, since the export mixes every issue
/// the tracker knows about.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    /// Functional requirement (`REQ-F`).
    Functional,
    /// Non-functional requirement (`REQ-NF`).
    NonFunctional,
    /// Architecture decision record (`ADR`).
    Adr,
    /// Architecture component (`ARC-C`).
    ArchComponent,
    /// Test item (`TEST`).
    Test,
    /// Any other kind string found in the export.
    Other(String),
}

impl ItemKind {
    /// The kind string as it appears in the export.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Functional => "REQ-F",
            Self::NonFunctional => "REQ-NF",
            Self::Adr => "ADR",
            Self::ArchComponent => "ARC-C",
            Self::Test => "TEST",
            Self::Other(s) => s,
        }
    }

    /// Whether this is a requirement kind (`REQ-F` or `REQ-NF`).
    #[must_use]
    pub const fn is_requirement(&self) -> bool {
        matches!(self, Self::Functional | Self::NonFunctional)
    }

    /// Whether this is an architecture-decision kind (`ADR` or `ARC-C`).
    ///
    /// Both kinds count as linkage targets: a requirement referencing an
    /// architecture component is covered the same as one referencing an ADR.
    #[must_use]
    pub const fn is_decision(&self) -> bool {
        matches!(self, Self::Adr | Self::ArchComponent)
    }
}

impl From<String> for ItemKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "REQ-F" => Self::Functional,
            "REQ-NF" => Self::NonFunctional,
            "ADR" => Self::Adr,
            "ARC-C" => Self::ArchComponent,
            "TEST" => Self::Test,
            _ => Self::Other(s),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One traceability node from the export.
///
/// Items are immutable once loaded; the whole set lives in memory for the
/// duration of a single invocation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    /// Unique issue-style identifier.
    pub id: IssueId,

    /// Declared kind of the item.
    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Issue title.
    pub title: String,

    /// Tracker labels. Absent in older exports, so defaults to empty.
    #[serde(default)]
    pub labels: BTreeSet<String>,

    /// Identifiers this item points at, in either direction of the
    /// traceability relation (the relation name is not recorded here).
    #[serde(default)]
    pub references: Vec<IssueId>,

    /// Typed links, keyed by relation name (`"ADR"`, `"REQ"`, …).
    ///
    /// Populated by newer exports only; the reference-based reports do not
    /// depend on it.
    #[serde(default)]
    pub link_details: BTreeMap<String, Vec<IssueId>>,
}

impl Item {
    /// The ids this item declares under the given relation name.
    ///
    /// Returns an empty slice when the relation is absent, which is the
    /// common case for exports that predate typed links.
    #[must_use]
    pub fn declared_links(&self, relation: &str) -> &[IssueId] {
        self.link_details.get(relation).map_or(&[], Vec::as_slice)
    }

    /// Whether the item carries the given tracker label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}
