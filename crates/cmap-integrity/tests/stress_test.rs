//! Stress tests - large documents and deep ordering chains

use cmap_integrity::prelude::*;
use cmap_test_utils::{chain_document, write_document};
use serde_json::json;
use std::time::Instant;

const LARGE: usize = 20_000;

#[test]
fn test_large_chain_validates() {
    let doc = Document::from_value(chain_document(LARGE));
    let start = Instant::now();
    let report = Validator::new().validate(&doc);
    let elapsed = start.elapsed();

    assert!(report.valid, "{:?}", &report.errors[..report.errors.len().min(5)]);
    assert_eq!(report.stats.total_nodes, LARGE);
    assert_eq!(report.stats.total_links, LARGE - 1);
    println!("validated {LARGE} nodes in {elapsed:?}");
}

#[test]
fn test_large_chain_closed_into_cycle() {
    let mut value = chain_document(LARGE);
    value["links"].as_array_mut().unwrap().push(json!({
        "source": format!("node-{}", LARGE - 1),
        "target": "node-0",
        "type": "prerequisite"
    }));
    let doc = Document::from_value(value);

    let graph = DependencyGraph::from_links(doc.links(), RelationshipType::Prerequisite);
    let cycle = graph.find_cycle().unwrap();
    assert_eq!(cycle.len(), LARGE + 1);
    assert!(!Validator::new().validate(&doc).valid);
}

#[test]
fn test_repair_many_missing() {
    let links: Vec<_> = (0..5_000)
        .map(|i| json!({"source": "hub", "target": format!("spoke-{i}"), "type": "uses"}))
        .collect();
    let value = json!({
        "metadata": {"version": "1.0", "created": "2024-01-15", "description": "hub"},
        "nodes": [{"id": "hub", "name": "Hub", "group": "concept"}],
        "links": links
    });
    let file = write_document(&value);

    let outcome = RepairEngine::new().repair_file(&file.path, false).unwrap();
    assert_eq!(outcome.created.len(), 5_000);
    assert!(check_references_file(&file.path));
    assert!(orphaned_nodes(&file.path).is_empty());
}
