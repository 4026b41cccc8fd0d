//! Ordering-constraint analysis
//!
//! Links of the ordering relationship (by default `prerequisite`) say "source
//! must come before target". They are indexed in reverse, target to sources,
//! and searched depth-first for a node that leads back to itself.

use crate::types::RelationshipType;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the current exploration path
    Grey,
    /// Fully explored
    Black,
}

/// Reverse adjacency over one relationship type
#[derive(Debug, Default)]
pub struct DependencyGraph<'a> {
    preceding: IndexMap<&'a str, Vec<&'a str>>,
    edge_count: usize,
}

impl<'a> DependencyGraph<'a> {
    /// Build from `(source, target)` pairs
    pub fn from_edges(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut graph = Self::default();
        for (source, target) in edges {
            graph.preceding.entry(target).or_default().push(source);
            graph.edge_count += 1;
        }
        graph
    }

    /// Build from raw link records, keeping only links of `relationship`
    ///
    /// Links without string endpoints are ignored; they are reported by link
    /// validation instead.
    #[must_use]
    pub fn from_links(links: &'a [Value], relationship: RelationshipType) -> Self {
        Self::from_edges(links.iter().filter_map(|link| {
            if link.get("type").and_then(Value::as_str) != Some(relationship.as_str()) {
                return None;
            }
            let source = link.get("source").and_then(Value::as_str)?;
            let target = link.get("target").and_then(Value::as_str)?;
            Some((source, target))
        }))
    }

    /// Number of indexed edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Nodes that must precede `node`
    #[must_use]
    pub fn preceding(&self, node: &str) -> &[&'a str] {
        self.preceding.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether any ordering chain loops back on itself
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// First cycle found, as a walk that starts and ends on the same node
    ///
    /// The walk follows the reverse direction: each element must precede the
    /// one before it. Runs in O(V + E) with an explicit stack.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut color: HashMap<&str, Color> = HashMap::with_capacity(self.preceding.len());
        // (node, index of the next predecessor to visit)
        let mut stack: Vec<(&str, usize)> = Vec::new();

        for &root in self.preceding.keys() {
            if color.contains_key(root) {
                continue;
            }
            color.insert(root, Color::Grey);
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                let Some(&child) = self.preceding(node).get(next) else {
                    color.insert(node, Color::Black);
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match color.get(child) {
                    Some(Color::Black) => {}
                    Some(Color::Grey) => {
                        let start = stack.iter().position(|(n, _)| *n == child).unwrap_or(0);
                        let mut walk: Vec<String> =
                            stack[start..].iter().map(|(n, _)| (*n).to_string()).collect();
                        walk.push(child.to_string());
                        return Some(walk);
                    }
                    None => {
                        color.insert(child, Color::Grey);
                        stack.push((child, 0));
                    }
                }
            }
        }

        None
    }
}
