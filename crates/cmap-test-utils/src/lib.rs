//! Testing utilities for the concept-map workspace
//!
//! Shared fixtures and file helpers.

#![allow(missing_docs)]

use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Conventional file name used inside fixture directories
pub const MAP_FILE: &str = "concept-map.json";

pub fn metadata() -> Value {
    json!({
        "version": "1.0",
        "created": "2024-01-15",
        "description": "Introductory programming course"
    })
}

pub fn node(id: &str, group: &str, level: u8) -> Value {
    json!({
        "id": id,
        "name": title(id),
        "group": group,
        "level": level,
        "size": 10
    })
}

pub fn link(source: &str, target: &str, kind: &str) -> Value {
    json!({"source": source, "target": target, "type": kind, "strength": 0.8})
}

pub fn document(nodes: Vec<Value>, links: Vec<Value>) -> Value {
    json!({"metadata": metadata(), "nodes": nodes, "links": links})
}

/// Schema-valid map with a prerequisite diamond and one orphan
pub fn valid_document() -> Value {
    document(
        vec![
            node("programming-basics", "course", 0),
            node("variables", "concept", 1),
            node("control-flow", "concept", 1),
            node("functions", "skill", 2),
            node("python", "language", 1),
        ],
        vec![
            link("variables", "control-flow", "prerequisite"),
            link("variables", "functions", "prerequisite"),
            link("control-flow", "functions", "prerequisite"),
            link("functions", "programming-basics", "part-of"),
        ],
    )
}

/// Nodes `n1`, `n2` and a link `n1 -> missing`
pub fn document_with_missing() -> Value {
    document(
        vec![node("n1", "concept", 1), node("n2", "concept", 1)],
        vec![link("n1", "missing", "prerequisite")],
    )
}

/// Prerequisite chain A -> B -> C -> A
pub fn document_with_cycle() -> Value {
    document(
        vec![
            node("a", "concept", 1),
            node("b", "concept", 1),
            node("c", "concept", 1),
        ],
        vec![
            link("a", "b", "prerequisite"),
            link("b", "c", "prerequisite"),
            link("c", "a", "prerequisite"),
        ],
    )
}

/// `n` nodes chained by prerequisite links
pub fn chain_document(n: usize) -> Value {
    let ids: Vec<String> = (0..n).map(|i| format!("node-{i}")).collect();
    let nodes = ids.iter().map(|id| node(id, "concept", 1)).collect();
    let links = ids
        .windows(2)
        .map(|w| link(&w[0], &w[1], "prerequisite"))
        .collect();
    document(nodes, links)
}

/// Temporary directory holding one concept-map file
pub struct MapFile {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl MapFile {
    pub fn contents(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.contents()).unwrap()
    }

    /// Backup siblings created next to the map file
    pub fn backups(&self) -> Vec<PathBuf> {
        let prefix = format!("{MAP_FILE}.backup.");
        let mut found: Vec<PathBuf> = fs::read_dir(self.dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        found.sort();
        found
    }
}

pub fn write_document(value: &Value) -> MapFile {
    write_raw(&serde_json::to_string_pretty(value).unwrap())
}

pub fn write_raw(contents: &str) -> MapFile {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(MAP_FILE);
    fs::write(&path, contents).unwrap();
    MapFile { dir, path }
}

pub fn missing_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    (dir, path)
}

pub fn ids(value: &Value) -> Vec<String> {
    value["nodes"]
        .as_array()
        .map(|nodes| {
            nodes
                .iter()
                .filter_map(|n| n["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn title(id: &str) -> String {
    id.split('-')
        .map(|w| {
            let mut c = w.chars();
            c.next()
                .map(|f| f.to_uppercase().chain(c).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
