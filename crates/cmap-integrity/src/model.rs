//! Document model
//!
//! A concept-map document is kept as the parsed JSON tree so that records the
//! engine never touches are written back exactly as they were read (field
//! order included, via `serde_json`'s `preserve_order`). Typed structs exist
//! only for the records the engine itself produces: placeholder nodes and
//! fix-history entries.

use crate::error::{IntegrityError, IntegrityResult};
use crate::types::Group;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;

/// Action label recorded in `fix_history` by the repair engine.
pub const FIX_ACTION_MISSING_NODES: &str = "auto_fix_missing_nodes";

/// Status given to synthesized nodes.
pub const PLACEHOLDER_STATUS: &str = "placeholder";

/// ISO-8601 UTC timestamp with a `Z` suffix and microsecond precision.
#[must_use]
pub fn iso8601_utc(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// In-memory concept-map document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Wrap an already parsed JSON value
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse a document from JSON text; `origin` is used in error messages
    pub fn parse(text: &str, origin: &Path) -> IntegrityResult<Self> {
        serde_json::from_str(text)
            .map(Self::from_value)
            .map_err(|source| IntegrityError::Parse {
                path: origin.to_path_buf(),
                source,
            })
    }

    /// Read and parse a document file
    pub fn load(path: impl AsRef<Path>) -> IntegrityResult<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| IntegrityError::read_error(path, e))?;
        Self::parse(&text, path)
    }

    /// Raw JSON tree
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Give up the model and return the JSON tree
    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Root as an object, if it is one
    #[must_use]
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.root.as_object()
    }

    /// Node records; empty when `nodes` is absent or not an array
    #[must_use]
    pub fn nodes(&self) -> &[Value] {
        self.array("nodes")
    }

    /// Link records; empty when `links` is absent or not an array
    #[must_use]
    pub fn links(&self) -> &[Value] {
        self.array("links")
    }

    fn array(&self, key: &str) -> &[Value] {
        self.root
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Metadata record, if present and an object
    #[must_use]
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.root.get("metadata").and_then(Value::as_object)
    }

    /// Mutable metadata record, if present and an object
    pub fn metadata_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.root.get_mut("metadata").and_then(Value::as_object_mut)
    }

    /// Ids of every node record carrying a string `id`
    #[must_use]
    pub fn defined_ids(&self) -> BTreeSet<String> {
        self.nodes()
            .iter()
            .filter_map(node_id)
            .map(str::to_string)
            .collect()
    }

    /// Every string `source` and `target` appearing on a link
    #[must_use]
    pub fn referenced_ids(&self) -> BTreeSet<String> {
        self.links()
            .iter()
            .flat_map(|link| [link.get("source"), link.get("target")])
            .filter_map(|v| v.and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    /// Referenced but not defined
    #[must_use]
    pub fn missing_ids(&self) -> BTreeSet<String> {
        let defined = self.defined_ids();
        self.referenced_ids()
            .into_iter()
            .filter(|id| !defined.contains(id))
            .collect()
    }

    /// Defined but never referenced
    #[must_use]
    pub fn orphaned_ids(&self) -> BTreeSet<String> {
        let referenced = self.referenced_ids();
        self.defined_ids()
            .into_iter()
            .filter(|id| !referenced.contains(id))
            .collect()
    }

    /// Append a node record, creating the `nodes` array when absent
    pub fn push_node(&mut self, node: Value) -> IntegrityResult<()> {
        let root = self
            .root
            .as_object_mut()
            .ok_or_else(|| IntegrityError::Malformed("document root is not an object".into()))?;
        match root
            .entry("nodes")
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(nodes) => {
                nodes.push(node);
                Ok(())
            }
            _ => Err(IntegrityError::Malformed("'nodes' is not an array".into())),
        }
    }

    /// Pretty-printed JSON with two-space indentation
    pub fn to_pretty_json(&self) -> IntegrityResult<String> {
        serde_json::to_string_pretty(&self.root).map_err(IntegrityError::Serialize)
    }
}

/// String id of a node record
#[must_use]
pub fn node_id(node: &Value) -> Option<&str> {
    node.get("id").and_then(Value::as_str)
}

/// Minimal node synthesized for a dangling reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderNode {
    /// The dangling id being resolved
    pub id: String,
    /// Display name derived from the id
    pub name: String,
    /// Fixed note asking for manual review
    pub description: String,
    /// Always the `auto-generated` sentinel
    pub group: Group,
    /// Configured placeholder level
    pub level: u8,
    /// Configured placeholder size
    pub size: u32,
    /// Always `true`; marks the record as synthesized
    pub auto_generated: bool,
    /// ISO-8601 UTC creation time
    pub creation_timestamp: String,
    /// Always `placeholder`
    pub status: String,
}

impl PlaceholderNode {
    /// Placeholder for `id` with the given level and size
    #[must_use]
    pub fn new(id: &str, level: u8, size: u32, created_at: DateTime<Utc>) -> Self {
        let name = display_name_from_id(id);
        Self {
            id: id.to_string(),
            description: format!(
                "Auto-generated placeholder node for {name}. This node was created automatically \
                 to resolve missing references and should be manually updated with proper content."
            ),
            name,
            group: Group::AutoGenerated,
            level,
            size,
            auto_generated: true,
            creation_timestamp: iso8601_utc(created_at),
            status: PLACEHOLDER_STATUS.to_string(),
        }
    }
}

/// Human-readable label for an id: separators become spaces, words are capitalized
///
/// `"linked-list_basics"` becomes `"Linked List Basics"`.
#[must_use]
pub fn display_name_from_id(id: &str) -> String {
    id.replace(['-', '_'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Audit entry appended to `metadata.fix_history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRecord {
    /// ISO-8601 UTC time of the repair
    pub timestamp: String,
    /// Kind of repair, e.g. `auto_fix_missing_nodes`
    pub action: String,
    /// Ids of the nodes appended
    pub nodes_created: Vec<String>,
    /// Length of `nodes_created`
    pub total_created: usize,
}

impl FixRecord {
    /// Record for a missing-node repair
    #[must_use]
    pub fn missing_nodes(created: &[String], at: DateTime<Utc>) -> Self {
        Self {
            timestamp: iso8601_utc(at),
            action: FIX_ACTION_MISSING_NODES.to_string(),
            nodes_created: created.to_vec(),
            total_created: created.len(),
        }
    }
}
