//! The in-memory traceability graph.
//!
//! The [`TraceGraph`] knows nothing about the export file on disk. It is a
//! simple in-memory representation of the items and the directed reference
//! edges between them.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::{graphmap::DiGraphMap, Direction};

use super::{Item, IssueId};

/// The loaded set of traceability items and their reference edges.
///
/// Items are keyed by [`IssueId`], so iteration is always in numeric id
/// order. The reference graph has one node per item and one directed edge per
/// entry in an item's `references` list, pointing from the referencing item
/// to the referenced one. Reference targets that are not themselves items in
/// the export still appear as graph nodes; membership questions go through
/// the item map.
#[derive(Debug, Default)]
pub struct TraceGraph {
    /// Items keyed by id. `BTreeMap` so iteration is numerically sorted.
    items: BTreeMap<IssueId, Item>,

    /// Directed reference edges, item → referenced id.
    graph: DiGraphMap<IssueId, ()>,
}

/// Error returned when an export contains two items with the same id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("duplicate item id {0} in export")]
pub struct DuplicateItemError(IssueId);

impl DuplicateItemError {
    /// The offending id.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.0
    }
}

impl TraceGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item and its reference edges.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateItemError`] if an item with the same id has already
    /// been inserted. Ids are unique in a well-formed export, so this is
    /// treated as a malformed input, not a merge.
    pub fn insert(&mut self, item: Item) -> Result<(), DuplicateItemError> {
        if self.items.contains_key(&item.id) {
            return Err(DuplicateItemError(item.id));
        }

        self.graph.add_node(item.id);
        for &target in &item.references {
            self.graph.add_edge(item.id, target, ());
        }
        self.items.insert(item.id, item);
        Ok(())
    }

    /// Retrieves an item by id.
    #[must_use]
    pub fn get(&self, id: IssueId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// The title of an item, if the id is present in the export.
    #[must_use]
    pub fn title(&self, id: IssueId) -> Option<&str> {
        self.items.get(&id).map(|item| item.title.as_str())
    }

    /// All items, in numeric id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// All requirement items (`REQ-F` / `REQ-NF`), in numeric id order.
    pub fn requirements(&self) -> impl Iterator<Item = &Item> {
        self.items().filter(|item| item.kind.is_requirement())
    }

    /// All decision items (`ADR` / `ARC-C`), in numeric id order.
    pub fn decisions(&self) -> impl Iterator<Item = &Item> {
        self.items().filter(|item| item.kind.is_decision())
    }

    /// The ids of all decision items.
    #[must_use]
    pub fn decision_ids(&self) -> BTreeSet<IssueId> {
        self.decisions().map(|item| item.id).collect()
    }

    /// Ids reached by following the item's own references outward.
    pub fn references_from(&self, id: IssueId) -> impl Iterator<Item = IssueId> + '_ {
        self.graph.neighbors_directed(id, Direction::Outgoing)
    }

    /// Ids of items whose references name the given id.
    pub fn references_to(&self, id: IssueId) -> impl Iterator<Item = IssueId> + '_ {
        self.graph.neighbors_directed(id, Direction::Incoming)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the graph holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemKind;

    fn item(id: &str, kind: &str, refs: &[&str]) -> Item {
        Item {
            id: id.parse().unwrap(),
            kind: ItemKind::from(kind.to_string()),
            title: format!("{kind} {id}"),
            labels: BTreeSet::new(),
            references: refs.iter().map(|r| r.parse().unwrap()).collect(),
            link_details: BTreeMap::new(),
        }
    }

    fn id(s: &str) -> IssueId {
        s.parse().unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let mut graph = TraceGraph::new();
        graph.insert(item("#1", "REQ-F", &[])).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(id("#1")).unwrap().kind, ItemKind::Functional);
        assert!(graph.get(id("#2")).is_none());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut graph = TraceGraph::new();
        graph.insert(item("#1", "REQ-F", &[])).unwrap();
        let err = graph.insert(item("#1", "ADR", &[])).unwrap_err();
        assert_eq!(err, DuplicateItemError(id("#1")));
    }

    #[test]
    fn iteration_is_numeric_id_order() {
        let mut graph = TraceGraph::new();
        graph.insert(item("#10", "REQ-F", &[])).unwrap();
        graph.insert(item("#9", "REQ-F", &[])).unwrap();
        graph.insert(item("#100", "ADR", &[])).unwrap();
        let order: Vec<u64> = graph.items().map(|i| i.id.number()).collect();
        assert_eq!(order, vec![9, 10, 100]);
    }

    #[test]
    fn forward_and_backward_reference_walks() {
        let mut graph = TraceGraph::new();
        graph.insert(item("#1", "REQ-F", &["#90"])).unwrap();
        graph.insert(item("#90", "ADR", &["#2"])).unwrap();
        graph.insert(item("#2", "REQ-F", &[])).unwrap();

        let forward: Vec<IssueId> = graph.references_from(id("#1")).collect();
        assert_eq!(forward, vec![id("#90")]);

        let backward: Vec<IssueId> = graph.references_to(id("#2")).collect();
        assert_eq!(backward, vec![id("#90")]);

        assert_eq!(graph.references_from(id("#2")).count(), 0);
    }

    #[test]
    fn decision_ids_cover_adr_and_arc_c() {
        let mut graph = TraceGraph::new();
        graph.insert(item("#90", "ADR", &[])).unwrap();
        graph.insert(item("#92", "ARC-C", &[])).unwrap();
        graph.insert(item("#1", "REQ-F", &[])).unwrap();
        let ids = graph.decision_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&id("#90")));
        assert!(ids.contains(&id("#92")));
    }

    #[test]
    fn references_to_unreferenced_item_is_empty() {
        let mut graph = TraceGraph::new();
        graph.insert(item("#1", "REQ-F", &[])).unwrap();
        assert_eq!(graph.references_to(id("#1")).count(), 0);
    }
}
