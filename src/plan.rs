//! The hand-authored decision-linkage update plan.
//!
//! The plan is configuration data, not an algorithm: a table mapping
//! requirement ids to the decisions they should be linked to, authored by a
//! reviewer after reading the unlinked report. It lives in a TOML document
//! (the repository ships the driver project's table at
//! `plans/adr-backlog.toml`) and drives the `plan` subcommand's update
//! listing and coverage projection.

use std::{
    io,
    path::{Path, PathBuf},
};

use crate::{domain::IssueId, linkage};

/// Default coverage threshold the project CI enforces, in percent.
const DEFAULT_TARGET: f64 = 70.0;

const fn default_target() -> f64 {
    DEFAULT_TARGET
}

/// One row of the mapping table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Mapping {
    /// The requirement to update.
    pub requirement: IssueId,
    /// The decisions to add links to.
    pub decisions: Vec<IssueId>,
    /// Free-form annotation, usually the requirement's HRID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A hand-authored update plan.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UpdatePlan {
    /// Coverage threshold the projection is compared against, in percent.
    #[serde(default = "default_target")]
    pub target: f64,

    /// Decisions that do not exist yet and need to be authored before the
    /// remaining requirements can be linked.
    #[serde(default)]
    pub needed: Vec<String>,

    /// The mapping table.
    #[serde(default, rename = "mapping")]
    pub mappings: Vec<Mapping>,
}

/// Errors that can occur while loading a plan file.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The file could not be read.
    #[error("failed to read plan file at {path}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying io error.
        #[source]
        source: io::Error,
    },

    /// The file is not a valid plan document.
    #[error("failed to parse plan file at {path}")]
    Toml {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: toml::de::Error,
    },
}

impl UpdatePlan {
    /// Loads a plan from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] if the file is absent, unreadable, or not a
    /// valid plan document.
    pub fn from_path(path: &Path) -> Result<Self, PlanError> {
        let text = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| PlanError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of requirements the plan updates.
    #[must_use]
    pub fn mapped_count(&self) -> usize {
        self.mappings.len()
    }

    /// Total number of decision links the plan adds.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.mappings.iter().map(|m| m.decisions.len()).sum()
    }

    /// The mapping rows sorted by requirement id.
    #[must_use]
    pub fn sorted_mappings(&self) -> Vec<&Mapping> {
        let mut rows: Vec<&Mapping> = self.mappings.iter().collect();
        rows.sort_by_key(|m| m.requirement);
        rows
    }

    /// Projects coverage after hypothetically applying the plan.
    ///
    /// The projection is a naive linear estimate: every mapped requirement is
    /// added to the linked count without checking whether it is already in
    /// the linked set, so a mapping that overlaps existing linkage
    /// double-counts and the projection overstates coverage. That matches the
    /// CI dashboard this plan format was written against; treat the number as
    /// an upper bound.
    #[must_use]
    pub fn projection(&self, current_linked: usize, total: usize) -> Projection {
        Projection {
            current_linked,
            mapped: self.mappings.len(),
            total,
        }
    }
}

/// A naive linear coverage projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    /// Requirements currently linked.
    pub current_linked: usize,
    /// Requirements the plan maps.
    pub mapped: usize,
    /// Total requirements.
    pub total: usize,
}

impl Projection {
    /// Current coverage, percent rounded to one decimal.
    #[must_use]
    pub fn current(&self) -> f64 {
        linkage::percent(self.current_linked, self.total)
    }

    /// Projected coverage after the plan, percent rounded to one decimal.
    #[must_use]
    pub fn projected(&self) -> f64 {
        linkage::percent(self.current_linked + self.mapped, self.total)
    }

    /// Signed distance from the target threshold, in percentage points.
    /// Negative when the projection clears the target.
    #[must_use]
    pub fn gap(&self, target: f64) -> f64 {
        ((target - self.projected()) * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r##"
target = 70.0
needed = [
    "ADR-RECOVERY-001: Hardware Fault Recovery Strategy",
    "ADR-POWER-001: Power Management Strategy",
]

[[mapping]]
requirement = "#40"
decisions = ["#92", "#126"]
note = "REQ-F-DEVICE-ABS-003"

[[mapping]]
requirement = "#19"
decisions = ["#93", "#147"]
"##;

    #[test]
    fn parse_full_plan() {
        let plan: UpdatePlan = toml::from_str(PLAN).unwrap();
        assert!((plan.target - 70.0).abs() < f64::EPSILON);
        assert_eq!(plan.needed.len(), 2);
        assert_eq!(plan.mapped_count(), 2);
        assert_eq!(plan.link_count(), 4);
        assert_eq!(plan.mappings[0].note.as_deref(), Some("REQ-F-DEVICE-ABS-003"));
        assert_eq!(plan.mappings[1].note, None);
    }

    #[test]
    fn target_and_needed_default_when_absent() {
        let plan: UpdatePlan = toml::from_str(
            "[[mapping]]\nrequirement = \"#1\"\ndecisions = [\"#2\"]\n",
        )
        .unwrap();
        assert!((plan.target - 70.0).abs() < f64::EPSILON);
        assert!(plan.needed.is_empty());
    }

    #[test]
    fn sorted_mappings_orders_by_requirement_number() {
        let plan: UpdatePlan = toml::from_str(PLAN).unwrap();
        let order: Vec<u64> = plan
            .sorted_mappings()
            .iter()
            .map(|m| m.requirement.number())
            .collect();
        assert_eq!(order, vec![19, 40]);
    }

    #[test]
    fn projection_is_a_naive_linear_estimate() {
        let plan: UpdatePlan = toml::from_str(PLAN).unwrap();
        // 56 of 92 linked today, 2 mapped: (56 + 2) / 92 = 63.0%.
        let projection = plan.projection(56, 92);
        assert!((projection.current() - 60.9).abs() < f64::EPSILON);
        assert!((projection.projected() - 63.0).abs() < f64::EPSILON);
    }

    #[test]
    fn projection_double_counts_already_linked_requirements() {
        // The projection must not depend on whether the mapped requirements
        // are already in the linked set: 26 mapped rows always add 26.
        let mappings: Vec<Mapping> = (1..=26)
            .map(|n| Mapping {
                requirement: format!("#{n}").parse().unwrap(),
                decisions: vec!["#90".parse().unwrap()],
                note: None,
            })
            .collect();
        let plan = UpdatePlan {
            target: 70.0,
            needed: Vec::new(),
            mappings,
        };

        let projection = plan.projection(56, 92);
        assert!((projection.projected() - 89.1).abs() < f64::EPSILON);

        // Even when every mapped requirement is already linked, the estimate
        // is unchanged.
        let all_linked = plan.projection(92, 92);
        assert!((all_linked.projected() - 128.3).abs() < f64::EPSILON);
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = UpdatePlan::from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, PlanError::Io { .. }));
    }

    #[test]
    fn from_path_invalid_document_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.toml");
        std::fs::write(&path, "mapping = 3").unwrap();
        let err = UpdatePlan::from_path(&path).unwrap_err();
        assert!(matches!(err, PlanError::Toml { .. }));
    }
}
