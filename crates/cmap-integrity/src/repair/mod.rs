//! Auto-repair of dangling references
//!
//! Every id that links reference but no node defines gets a placeholder node
//! appended. Existing records are never modified; only `metadata` is stamped
//! with the new node count and an audit entry.
//!
//! [`RepairEngine::repair_document`] is pure; [`RepairEngine::repair_file`]
//! adds the optional backup and the write-back.

mod persist;

pub use persist::{backup_path_for, create_backup, write_document, BACKUP_STAMP_FORMAT};

use crate::config::IntegrityConfig;
use crate::error::{IntegrityError, IntegrityResult};
use crate::model::{iso8601_utc, Document, FixRecord, PlaceholderNode};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of a repair
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    /// Document after repair
    pub document: Document,
    /// Ids of synthesized nodes, sorted
    pub created: Vec<String>,
    /// Backup written before the original was replaced
    pub backup: Option<PathBuf>,
}

impl RepairOutcome {
    /// Nothing was missing, so nothing was changed
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
    }
}

/// Synthesizes placeholders for missing nodes
#[derive(Debug, Clone, Default)]
pub struct RepairEngine {
    config: IntegrityConfig,
}

impl RepairEngine {
    /// Engine with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the given configuration
    #[must_use]
    pub fn with_config(config: IntegrityConfig) -> Self {
        Self { config }
    }

    /// Repair in memory, stamping records with `now`
    pub fn repair_document(
        &self,
        mut doc: Document,
        now: DateTime<Utc>,
    ) -> IntegrityResult<RepairOutcome> {
        let missing = doc.missing_ids();
        if missing.is_empty() {
            debug!("no missing nodes");
            return Ok(RepairOutcome {
                document: doc,
                created: Vec::new(),
                backup: None,
            });
        }

        let mut created = Vec::with_capacity(missing.len());
        for id in missing {
            let node = PlaceholderNode::new(
                &id,
                self.config.placeholder_level,
                self.config.placeholder_size,
                now,
            );
            doc.push_node(serde_json::to_value(&node).map_err(IntegrityError::Serialize)?)?;
            info!(id = %id, name = %node.name, "created placeholder node");
            created.push(id);
        }

        stamp_metadata(&mut doc, &created, now)?;

        Ok(RepairOutcome {
            document: doc,
            created,
            backup: None,
        })
    }

    /// Repair the document at `path` in place
    ///
    /// With `backup` (or `backup_before_fix` in the configuration) the file is
    /// copied aside and flushed before it is overwritten. A document with
    /// nothing missing is left untouched and no backup is made.
    pub fn repair_file(&self, path: impl AsRef<Path>, backup: bool) -> IntegrityResult<RepairOutcome> {
        let path = path.as_ref();
        let now = Utc::now();
        let doc = Document::load(path)?;
        let mut outcome = self.repair_document(doc, now)?;
        if outcome.is_noop() {
            return Ok(outcome);
        }

        let contents = outcome.document.to_pretty_json()?;
        if backup || self.config.backup_before_fix {
            let backup = create_backup(path, now)?;
            info!(backup = %backup.display(), "backup created");
            outcome.backup = Some(backup);
        }

        if let Err(err) = write_document(path, &contents) {
            warn!(
                path = %path.display(),
                backup = ?outcome.backup,
                error = %err,
                "failed to write repaired document"
            );
            return Err(err);
        }
        info!(
            path = %path.display(),
            created = outcome.created.len(),
            "repaired document written"
        );
        Ok(outcome)
    }
}

/// Update `total_nodes`, `last_updated` and `fix_history` when metadata exists
fn stamp_metadata(doc: &mut Document, created: &[String], now: DateTime<Utc>) -> IntegrityResult<()> {
    let total = doc.nodes().len();
    let Some(metadata) = doc.metadata_mut() else {
        debug!("no metadata object to stamp");
        return Ok(());
    };

    let record = serde_json::to_value(FixRecord::missing_nodes(created, now))
        .map_err(IntegrityError::Serialize)?;
    match metadata
        .entry("fix_history")
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(history) => history.push(record),
        _ => {
            return Err(IntegrityError::Malformed(
                "'metadata.fix_history' is not an array".into(),
            ))
        }
    }
    metadata.insert("total_nodes".into(), Value::from(total));
    metadata.insert("last_updated".into(), Value::String(iso8601_utc(now)));
    Ok(())
}

/// Repair a file with the given configuration
pub fn repair_file(
    path: impl AsRef<Path>,
    backup: bool,
    config: &IntegrityConfig,
) -> IntegrityResult<RepairOutcome> {
    RepairEngine::with_config(config.clone()).repair_file(path, backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    fn broken() -> Document {
        Document::from_value(json!({
            "metadata": {"version": "1.0", "created": "2024-01-15", "description": "x"},
            "nodes": [{"id": "n1", "name": "N1", "group": "concept"}],
            "links": [
                {"source": "n1", "target": "zeta-node", "type": "prerequisite"},
                {"source": "alpha_node", "target": "n1", "type": "uses"}
            ]
        }))
    }

    #[test]
    fn synthesizes_sorted_placeholders() {
        let out = RepairEngine::new().repair_document(broken(), at()).unwrap();
        assert_eq!(out.created, vec!["alpha_node", "zeta-node"]);
        let nodes = out.document.nodes();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0]["id"], "n1");
        assert_eq!(nodes[1]["name"], "Alpha Node");
        assert_eq!(nodes[2]["level"], 1);
        assert_eq!(nodes[2]["size"], 8);
        assert!(out.document.missing_ids().is_empty());
    }

    #[test]
    fn metadata_stamped() {
        let out = RepairEngine::new().repair_document(broken(), at()).unwrap();
        let meta = out.document.metadata().unwrap();
        assert_eq!(meta["total_nodes"], 3);
        assert_eq!(meta["last_updated"], "2025-01-02T03:04:05.000000Z");
        let history = meta["fix_history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["action"], "auto_fix_missing_nodes");
        assert_eq!(history[0]["total_created"], 2);
    }

    #[test]
    fn history_is_appended() {
        let mut value = broken().into_value();
        value["metadata"]["fix_history"] = json!([{"action": "manual"}]);
        let out = RepairEngine::new()
            .repair_document(Document::from_value(value), at())
            .unwrap();
        assert_eq!(out.document.metadata().unwrap()["fix_history"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn no_metadata_no_stamp() {
        let doc = Document::from_value(json!({
            "nodes": [],
            "links": [{"source": "a", "target": "b", "type": "uses"}]
        }));
        let out = RepairEngine::new().repair_document(doc, at()).unwrap();
        assert_eq!(out.created.len(), 2);
        assert!(out.document.metadata().is_none());
    }

    #[test]
    fn nothing_missing_is_noop() {
        let doc = Document::from_value(json!({"metadata": {}, "nodes": [{"id": "a"}], "links": []}));
        let out = RepairEngine::new().repair_document(doc.clone(), at()).unwrap();
        assert!(out.is_noop());
        assert_eq!(out.document, doc);
    }

    #[test]
    fn configured_placeholder_shape() {
        let config = IntegrityConfig {
            placeholder_level: 3,
            placeholder_size: 20,
            ..IntegrityConfig::default()
        };
        let out = RepairEngine::with_config(config)
            .repair_document(broken(), at())
            .unwrap();
        assert_eq!(out.document.nodes()[1]["level"], 3);
        assert_eq!(out.document.nodes()[1]["size"], 20);
    }

    #[test]
    fn non_array_history_rejected() {
        let mut value = broken().into_value();
        value["metadata"]["fix_history"] = json!("none");
        let err = RepairEngine::new()
            .repair_document(Document::from_value(value), at())
            .unwrap_err();
        assert!(matches!(err, IntegrityError::Malformed(_)));
    }
}
