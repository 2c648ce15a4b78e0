//! Requirement → decision linkage classification.
//!
//! A requirement is *linked* when it appears in the union of two edge sets:
//! decisions reached through the requirement's own references (forward), and
//! decisions whose references name the requirement (backward). Reports group
//! the unlinked remainder by declared kind and by topical keyword buckets so
//! a reviewer can see where coverage is missing.

use std::collections::{BTreeMap, BTreeSet};

use tracing::instrument;

use crate::domain::{Item, ItemKind, IssueId, TraceGraph};

/// Linkage classification for a single requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementLinkage {
    /// The requirement's id.
    pub id: IssueId,
    /// The requirement's declared kind (`REQ-F` or `REQ-NF`).
    pub kind: ItemKind,
    /// The requirement's title.
    pub title: String,
    /// Decisions the requirement references itself.
    pub forward: BTreeSet<IssueId>,
    /// Decisions whose references name the requirement.
    pub backward: BTreeSet<IssueId>,
}

impl RequirementLinkage {
    /// Whether the requirement has any decision linkage, in either direction.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        !self.forward.is_empty() || !self.backward.is_empty()
    }

    /// The union of forward and backward decision ids.
    #[must_use]
    pub fn decisions(&self) -> BTreeSet<IssueId> {
        self.forward.union(&self.backward).copied().collect()
    }
}

/// The classifier's output over a whole export.
#[derive(Debug, Default)]
pub struct LinkageReport {
    records: Vec<RequirementLinkage>,
}

impl LinkageReport {
    /// Classifies every requirement in the graph.
    ///
    /// Records are in numeric id order. Only references that land on a
    /// decision item (`ADR` / `ARC-C`) count in either direction; references
    /// to tests, other requirements, or ids absent from the export are
    /// ignored.
    #[instrument(skip(graph))]
    #[must_use]
    pub fn classify(graph: &TraceGraph) -> Self {
        let decisions = graph.decision_ids();

        let records = graph
            .requirements()
            .map(|req| {
                let forward = graph
                    .references_from(req.id)
                    .filter(|id| decisions.contains(id))
                    .collect();
                let backward = graph
                    .references_to(req.id)
                    .filter(|id| decisions.contains(id))
                    .collect();
                RequirementLinkage {
                    id: req.id,
                    kind: req.kind.clone(),
                    title: req.title.clone(),
                    forward,
                    backward,
                }
            })
            .collect();

        Self { records }
    }

    /// All per-requirement records, in numeric id order.
    #[must_use]
    pub fn records(&self) -> &[RequirementLinkage] {
        &self.records
    }

    /// Records with any linkage.
    pub fn linked(&self) -> impl Iterator<Item = &RequirementLinkage> {
        self.records.iter().filter(|r| r.is_linked())
    }

    /// Records with no linkage in either direction.
    pub fn unlinked(&self) -> impl Iterator<Item = &RequirementLinkage> {
        self.records.iter().filter(|r| !r.is_linked())
    }

    /// Total number of requirements.
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// Number of linked requirements.
    #[must_use]
    pub fn linked_count(&self) -> usize {
        self.linked().count()
    }

    /// Number of requirements with at least one forward link.
    #[must_use]
    pub fn forward_count(&self) -> usize {
        self.records.iter().filter(|r| !r.forward.is_empty()).count()
    }

    /// Number of requirements with at least one backward link.
    #[must_use]
    pub fn backward_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.backward.is_empty())
            .count()
    }

    /// Linkage coverage as a percentage, rounded to one decimal place.
    #[must_use]
    pub fn coverage(&self) -> f64 {
        percent(self.linked_count(), self.total())
    }

    /// Groups the unlinked requirements into topical buckets.
    ///
    /// Requirements whose id is somehow absent from the graph are skipped;
    /// this cannot happen for a report built from the same graph.
    #[must_use]
    pub fn unlinked_by_topic<'a>(&self, graph: &'a TraceGraph) -> BTreeMap<Topic, Vec<&'a Item>> {
        let mut buckets: BTreeMap<Topic, Vec<&Item>> = BTreeMap::new();
        for record in self.unlinked() {
            if let Some(item) = graph.get(record.id) {
                buckets.entry(Topic::classify(item)).or_default().push(item);
            }
        }
        buckets
    }
}

/// `part` out of `total` as a percentage rounded to one decimal place.
///
/// Returns `0.0` when `total` is zero; callers report the empty export
/// separately rather than printing a percentage.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

/// Topical bucket for an unlinked requirement.
///
/// Buckets are decided by keyword probes over the title (and one label
/// probe), checked in declaration order. Non-functional requirements always
/// land in [`Topic::NonFunctional`] regardless of title keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    /// Event subsystem (event ring, event log).
    Event,
    /// PTP, PHC and timestamping.
    Ptp,
    /// IOCTL surface.
    Ioctl,
    /// Device and hardware handling.
    Device,
    /// NDIS filter integration.
    Ndis,
    /// TSN shaping features (TAS, CBS, Qav/Qbv, FPE, VLAN).
    Tsn,
    /// Non-functional requirements.
    NonFunctional,
    /// Anything else.
    Other,
}

impl Topic {
    /// Decides the bucket for an item.
    #[must_use]
    pub fn classify(item: &Item) -> Self {
        let title = item.title.to_uppercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| title.contains(k));

        if item.kind == ItemKind::NonFunctional {
            Self::NonFunctional
        } else if title.contains("EVENT") || item.labels.iter().any(|l| l.contains("event")) {
            Self::Event
        } else if contains_any(&["PTP", "PHC", "TIMESTAMP"]) {
            Self::Ptp
        } else if title.contains("IOCTL") {
            Self::Ioctl
        } else if contains_any(&["DEVICE", "HARDWARE", "NIC"]) {
            Self::Device
        } else if contains_any(&["NDIS", "FILTER"]) {
            Self::Ndis
        } else if contains_any(&["TAS", "CBS", "QAV", "QBV", "FPE", "VLAN"]) {
            Self::Tsn
        } else {
            Self::Other
        }
    }

    /// The heading used for this bucket in reports.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Event => "EVENT-RELATED",
            Self::Ptp => "PTP/TIMESTAMPING",
            Self::Ioctl => "IOCTL-RELATED",
            Self::Device => "DEVICE/HARDWARE",
            Self::Ndis => "NDIS/FILTER",
            Self::Tsn => "TSN FEATURES",
            Self::NonFunctional => "NON-FUNCTIONAL",
            Self::Other => "OTHER FUNCTIONAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use test_case::test_case;

    use super::*;

    fn item(id: &str, kind: &str, title: &str, refs: &[&str]) -> Item {
        Item {
            id: id.parse().unwrap(),
            kind: ItemKind::from(kind.to_string()),
            title: title.to_string(),
            labels: BTreeSet::new(),
            references: refs.iter().map(|r| r.parse().unwrap()).collect(),
            link_details: BTreeMap::new(),
        }
    }

    fn graph(items: Vec<Item>) -> TraceGraph {
        let mut graph = TraceGraph::new();
        for i in items {
            graph.insert(i).unwrap();
        }
        graph
    }

    fn id(s: &str) -> IssueId {
        s.parse().unwrap()
    }

    #[test]
    fn one_adr_referencing_one_of_three_requirements() {
        let graph = graph(vec![
            item("#1", "REQ-F", "first", &[]),
            item("#2", "REQ-F", "second", &[]),
            item("#3", "REQ-NF", "third", &[]),
            item("#90", "ADR", "decision", &["#2"]),
        ]);

        let report = LinkageReport::classify(&graph);
        assert_eq!(report.total(), 3);
        assert_eq!(report.linked_count(), 1);
        assert_eq!(report.unlinked().count(), 2);
        assert_eq!(report.linked().next().unwrap().id, id("#2"));
    }

    #[test]
    fn forward_reference_links_a_requirement() {
        let graph = graph(vec![
            item("#1", "REQ-F", "req", &["#90"]),
            item("#90", "ADR", "decision", &[]),
        ]);

        let report = LinkageReport::classify(&graph);
        let record = &report.records()[0];
        assert_eq!(record.forward, BTreeSet::from([id("#90")]));
        assert!(record.backward.is_empty());
        assert!(record.is_linked());
    }

    #[test]
    fn backward_reference_links_a_requirement() {
        let graph = graph(vec![
            item("#1", "REQ-F", "req", &[]),
            item("#90", "ADR", "decision", &["#1"]),
        ]);

        let report = LinkageReport::classify(&graph);
        let record = &report.records()[0];
        assert!(record.forward.is_empty());
        assert_eq!(record.backward, BTreeSet::from([id("#90")]));
        assert!(record.is_linked());
    }

    #[test]
    fn linked_is_the_union_of_both_directions() {
        let graph = graph(vec![
            item("#1", "REQ-F", "forward only", &["#90"]),
            item("#2", "REQ-F", "backward only", &[]),
            item("#3", "REQ-F", "both", &["#92"]),
            item("#4", "REQ-F", "neither", &[]),
            item("#90", "ADR", "a", &["#2", "#3"]),
            item("#92", "ARC-C", "b", &[]),
        ]);

        let report = LinkageReport::classify(&graph);
        assert_eq!(report.forward_count(), 2);
        assert_eq!(report.backward_count(), 2);
        assert_eq!(report.linked_count(), 3);

        let both = &report.records()[2];
        assert_eq!(both.decisions(), BTreeSet::from([id("#90"), id("#92")]));

        let unlinked: Vec<IssueId> = report.unlinked().map(|r| r.id).collect();
        assert_eq!(unlinked, vec![id("#4")]);
    }

    #[test]
    fn references_to_non_decisions_do_not_count() {
        // A requirement referencing a TEST item and another requirement has
        // no linkage, and a TEST item referencing a requirement creates none.
        let graph = graph(vec![
            item("#1", "REQ-F", "req", &["#2", "#50"]),
            item("#2", "REQ-F", "other req", &[]),
            item("#50", "TEST", "test", &["#1"]),
        ]);

        let report = LinkageReport::classify(&graph);
        assert_eq!(report.linked_count(), 0);
    }

    #[test]
    fn references_to_ids_outside_the_export_are_ignored() {
        let graph = graph(vec![item("#1", "REQ-F", "req", &["#999"])]);
        let report = LinkageReport::classify(&graph);
        assert_eq!(report.linked_count(), 0);
    }

    #[test]
    fn records_are_in_numeric_id_order() {
        let graph = graph(vec![
            item("#12", "REQ-F", "b", &[]),
            item("#3", "REQ-F", "a", &[]),
            item("#100", "REQ-NF", "c", &[]),
        ]);
        let report = LinkageReport::classify(&graph);
        let order: Vec<u64> = report.records().iter().map(|r| r.id.number()).collect();
        assert_eq!(order, vec![3, 12, 100]);
    }

    #[test_case(1, 3, 33.3; "one third")]
    #[test_case(2, 3, 66.7; "two thirds")]
    #[test_case(56, 92, 60.9; "driver baseline")]
    #[test_case(0, 5, 0.0; "none")]
    #[test_case(5, 5, 100.0; "all")]
    #[test_case(0, 0, 0.0; "empty export")]
    fn percent_rounds_to_one_decimal(part: usize, total: usize, expected: f64) {
        assert!((percent(part, total) - expected).abs() < f64::EPSILON);
    }

    #[test_case("REQ-NF", "REQ-NF-PERF-IOCTL-001: fast IOCTL path", Topic::NonFunctional; "non functional wins over keywords")]
    #[test_case("REQ-F", "REQ-F-TSRING-001: Event ring buffer", Topic::Event; "event")]
    #[test_case("REQ-F", "REQ-F-PTP-001: PTP clock adjustment", Topic::Ptp; "ptp")]
    #[test_case("REQ-F", "REQ-F-PHC-002: Phc readout", Topic::Ptp; "phc case insensitive")]
    #[test_case("REQ-F", "REQ-F-IOCTL-BUFFER-001: Ioctl buffer validation", Topic::Ioctl; "ioctl")]
    #[test_case("REQ-F", "REQ-F-HW-DETECT-001: Hardware detection", Topic::Device; "hardware")]
    #[test_case("REQ-F", "REQ-F-MULTIPLE-NIC-001: Multi-NIC support", Topic::Device; "nic")]
    #[test_case("REQ-F", "REQ-F-NDIS-ATTACH-001: Ndis attach path", Topic::Ndis; "ndis")]
    #[test_case("REQ-F", "REQ-F-FPE-001: FPE negotiation", Topic::Tsn; "fpe")]
    #[test_case("REQ-F", "REQ-F-VLAN-001: Vlan tagging", Topic::Tsn; "vlan")]
    #[test_case("REQ-F", "REQ-F-GPTP-COMPAT-001: gPTP daemon compatibility", Topic::Ptp; "gptp contains ptp")]
    #[test_case("REQ-F", "REQ-F-MISC-001: Something else entirely", Topic::Other; "other")]
    fn topic_classification(kind: &str, title: &str, expected: Topic) {
        let item = item("#1", kind, title, &[]);
        assert_eq!(Topic::classify(&item), expected);
    }

    #[test]
    fn event_label_buckets_without_title_keyword() {
        let mut subject = item("#1", "REQ-F", "REQ-F-RING-001: ring buffer", &[]);
        subject.labels.insert("subsystem:event-ring".to_string());
        assert_eq!(Topic::classify(&subject), Topic::Event);
    }

    #[test]
    fn unlinked_buckets_group_in_display_order() {
        let graph = graph(vec![
            item("#1", "REQ-F", "REQ-F-IOCTL-001: Ioctl thing", &[]),
            item("#2", "REQ-NF", "REQ-NF-REL-001: reliability", &[]),
            item("#3", "REQ-F", "REQ-F-PTP-001: Ptp thing", &[]),
            item("#4", "REQ-F", "REQ-F-PTP-002: linked", &["#90"]),
            item("#90", "ADR", "decision", &[]),
        ]);

        let report = LinkageReport::classify(&graph);
        let buckets = report.unlinked_by_topic(&graph);

        let topics: Vec<Topic> = buckets.keys().copied().collect();
        assert_eq!(topics, vec![Topic::Ptp, Topic::Ioctl, Topic::NonFunctional]);
        assert_eq!(buckets[&Topic::Ptp].len(), 1);
        assert_eq!(buckets[&Topic::Ptp][0].id, id("#3"));
    }
}
