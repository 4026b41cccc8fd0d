//! Validation report and graph statistics

use super::Findings;
use crate::error::{Fault, IntegrityError, IntegrityResult};
use crate::model::Document;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

/// Level key used for nodes without an integer `level`
pub const UNSET_LEVEL: i64 = -1;

/// Group key used for nodes without a string `group`
pub const UNKNOWN_GROUP: &str = "unknown";

/// Outcome of schema validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// No faults were found
    pub valid: bool,
    /// Faults, in discovery order
    pub errors: Vec<Fault>,
    /// Non-fatal observations
    pub warnings: Vec<String>,
    /// Counts over the document as read
    pub stats: GraphStats,
}

impl ValidationReport {
    pub(crate) fn from_findings(findings: Findings, doc: &Document) -> Self {
        Self {
            valid: findings.errors.is_empty(),
            errors: findings.errors,
            warnings: findings.warnings,
            stats: GraphStats::compute(doc),
        }
    }

    /// Report for a document that could not be loaded
    #[must_use]
    pub fn unreadable(err: &IntegrityError) -> Self {
        Self {
            valid: false,
            errors: vec![Fault::Unreadable {
                reason: err.to_string(),
            }],
            warnings: Vec::new(),
            stats: GraphStats::default(),
        }
    }

    /// Fault messages as plain strings
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Human-readable rendering
    #[must_use]
    pub fn render_text(&self, path: &Path) -> String {
        let mut out = String::new();
        let verdict = if self.valid { "PASS" } else { "FAIL" };
        let _ = writeln!(out, "Validation of {}: {verdict}", path.display());

        if !self.errors.is_empty() {
            let _ = writeln!(out, "Errors ({}):", self.errors.len());
            for fault in &self.errors {
                let _ = writeln!(out, "  - {fault}");
            }
        }
        if !self.warnings.is_empty() {
            let _ = writeln!(out, "Warnings ({}):", self.warnings.len());
            for warning in &self.warnings {
                let _ = writeln!(out, "  - {warning}");
            }
        }

        let s = &self.stats;
        let _ = writeln!(out, "Nodes: {}  Links: {}", s.total_nodes, s.total_links);
        let _ = writeln!(out, "Average connections: {:.2}", s.avg_connections);
        if !s.groups.is_empty() {
            let groups: Vec<String> = s.groups.iter().map(|(g, n)| format!("{g}={n}")).collect();
            let _ = writeln!(out, "Groups: {}", groups.join(", "));
        }
        if !s.levels.is_empty() {
            let levels: Vec<String> = s
                .levels
                .iter()
                .map(|(l, n)| {
                    if *l == UNSET_LEVEL {
                        format!("unset={n}")
                    } else {
                        format!("{l}={n}")
                    }
                })
                .collect();
            let _ = writeln!(out, "Levels: {}", levels.join(", "));
        }
        out
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> IntegrityResult<String> {
        serde_json::to_string_pretty(self).map_err(IntegrityError::Serialize)
    }
}

/// Counts over a document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStats {
    /// Node records, valid or not
    pub total_nodes: usize,
    /// Link records, valid or not
    pub total_links: usize,
    /// Nodes per group
    pub groups: BTreeMap<String, usize>,
    /// Nodes per level
    pub levels: BTreeMap<i64, usize>,
    /// Links per node, 0 for an empty document
    pub avg_connections: f64,
}

impl GraphStats {
    /// Compute over every node and link record, valid or not
    #[must_use]
    pub fn compute(doc: &Document) -> Self {
        let nodes = doc.nodes();
        let links = doc.links();

        let mut groups = BTreeMap::new();
        let mut levels = BTreeMap::new();
        for node in nodes {
            let group = node
                .get("group")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_GROUP);
            *groups.entry(group.to_string()).or_insert(0) += 1;

            let level = node
                .get("level")
                .and_then(Value::as_i64)
                .unwrap_or(UNSET_LEVEL);
            *levels.entry(level).or_insert(0) += 1;
        }

        #[allow(clippy::cast_precision_loss)]
        let avg_connections = if nodes.is_empty() {
            0.0
        } else {
            links.len() as f64 / nodes.len() as f64
        };

        Self {
            total_nodes: nodes.len(),
            total_links: links.len(),
            groups,
            levels,
            avg_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_histograms() {
        let doc = Document::from_value(json!({
            "nodes": [
                {"id": "a", "group": "concept", "level": 1},
                {"id": "b", "group": "concept", "level": 1},
                {"id": "c", "group": "tool"},
                {"id": "d", "group": 4, "level": "high"}
            ],
            "links": [
                {"source": "a", "target": "b", "type": "uses"},
                {"source": "a", "target": "c", "type": "uses"}
            ]
        }));
        let stats = GraphStats::compute(&doc);
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.total_links, 2);
        assert_eq!(stats.groups["concept"], 2);
        assert_eq!(stats.groups[UNKNOWN_GROUP], 1);
        assert_eq!(stats.levels[&1], 2);
        assert_eq!(stats.levels[&UNSET_LEVEL], 2);
        assert!((stats.avg_connections - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_document_has_zero_average() {
        let stats = GraphStats::compute(&Document::from_value(json!({"links": [{}]})));
        assert_eq!(stats.total_links, 1);
        assert!(stats.avg_connections.abs() < f64::EPSILON);
    }

    #[test]
    fn json_rendering_uses_messages() {
        let report = ValidationReport {
            valid: false,
            errors: vec![Fault::NoNodes],
            warnings: vec![],
            stats: GraphStats::default(),
        };
        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["errors"][0], "Must contain at least one node");
        assert_eq!(value["stats"]["avg_connections"], 0.0);
    }

    #[test]
    fn text_rendering() {
        let report = ValidationReport {
            valid: false,
            errors: vec![Fault::NoNodes],
            warnings: vec!["Node x: auto-generated placeholder awaiting review".into()],
            stats: GraphStats::default(),
        };
        let text = report.render_text(Path::new("map.json"));
        assert!(text.starts_with("Validation of map.json: FAIL"));
        assert!(text.contains("  - Must contain at least one node"));
        assert!(text.contains("Warnings (1):"));
    }
}
