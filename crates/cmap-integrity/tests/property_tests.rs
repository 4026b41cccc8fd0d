//! Property tests for reference sets, cycle detection and repair

use cmap_integrity::prelude::*;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeSet;

fn name(i: usize) -> String {
    format!("n{i}")
}

fn build(defined: &[usize], edges: &[(usize, usize)]) -> Value {
    let nodes: Vec<Value> = defined
        .iter()
        .map(|&i| json!({"id": name(i), "name": name(i), "group": "concept"}))
        .collect();
    let links: Vec<Value> = edges
        .iter()
        .map(|&(s, t)| json!({"source": name(s), "target": name(t), "type": "prerequisite"}))
        .collect();
    json!({"metadata": {}, "nodes": nodes, "links": links})
}

proptest! {
    #[test]
    fn prop_cycle_detection_matches_petgraph(
        edges in proptest::collection::vec((0..12usize, 0..12usize), 0..40)
    ) {
        let mut reference = DiGraph::<(), ()>::new();
        let idx: Vec<_> = (0..12).map(|_| reference.add_node(())).collect();
        for &(s, t) in &edges {
            reference.add_edge(idx[s], idx[t], ());
        }

        let names: Vec<(String, String)> = edges.iter().map(|&(s, t)| (name(s), name(t))).collect();
        let graph = DependencyGraph::from_edges(names.iter().map(|(s, t)| (s.as_str(), t.as_str())));

        prop_assert_eq!(graph.has_cycle(), is_cyclic_directed(&reference));
        if let Some(walk) = graph.find_cycle() {
            prop_assert_eq!(walk.first(), walk.last());
            for pair in walk.windows(2) {
                prop_assert!(graph.preceding(&pair[0]).contains(&pair[1].as_str()));
            }
        }
    }

    #[test]
    fn prop_missing_and_orphans_are_set_differences(
        defined in proptest::collection::btree_set(0..15usize, 0..10),
        edges in proptest::collection::vec((0..15usize, 0..15usize), 0..20)
    ) {
        let defined: Vec<usize> = defined.into_iter().collect();
        let doc = Document::from_value(build(&defined, &edges));

        let defined_ids: BTreeSet<String> = defined.iter().map(|&i| name(i)).collect();
        let referenced: BTreeSet<String> =
            edges.iter().flat_map(|&(s, t)| [name(s), name(t)]).collect();

        let missing: BTreeSet<String> = referenced.difference(&defined_ids).cloned().collect();
        let orphans: BTreeSet<String> = defined_ids.difference(&referenced).cloned().collect();
        prop_assert_eq!(doc.missing_ids(), missing.clone());
        prop_assert_eq!(doc.orphaned_ids(), orphans);
        prop_assert_eq!(check_references(&doc), missing.is_empty());
    }

    #[test]
    fn prop_repair_appends_and_is_idempotent(
        defined in proptest::collection::btree_set(0..15usize, 0..10),
        edges in proptest::collection::vec((0..15usize, 0..15usize), 0..20)
    ) {
        let defined: Vec<usize> = defined.into_iter().collect();
        let doc = Document::from_value(build(&defined, &edges));
        let before = doc.nodes().to_vec();
        let missing = doc.missing_ids();
        let engine = RepairEngine::new();
        let now = chrono::Utc::now();

        let first = engine.repair_document(doc, now).unwrap();
        prop_assert_eq!(&first.document.nodes()[..before.len()], &before[..]);
        prop_assert_eq!(first.document.nodes().len(), before.len() + missing.len());
        prop_assert_eq!(first.created.iter().cloned().collect::<BTreeSet<_>>(), missing);
        prop_assert!(check_references(&first.document));

        let second = engine.repair_document(first.document.clone(), now).unwrap();
        prop_assert!(second.is_noop());
        prop_assert_eq!(second.document, first.document);
    }
}
