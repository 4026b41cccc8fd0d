//! Read-only reference queries over document files
//!
//! These helpers never fail: a file that cannot be loaded is treated as
//! defining and referencing nothing, and the failure is logged.

use crate::model::Document;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

fn load_or_log(path: &Path) -> Option<Document> {
    Document::load(path)
        .map_err(|err| warn!(error = %err, "cannot load document"))
        .ok()
}

/// Ids referenced by links but not defined by any node
#[must_use]
pub fn missing_nodes(path: impl AsRef<Path>) -> BTreeSet<String> {
    load_or_log(path.as_ref())
        .map(|doc| doc.missing_ids())
        .unwrap_or_default()
}

/// Ids defined by nodes but referenced by no link
#[must_use]
pub fn orphaned_nodes(path: impl AsRef<Path>) -> BTreeSet<String> {
    load_or_log(path.as_ref())
        .map(|doc| doc.orphaned_ids())
        .unwrap_or_default()
}

/// Reference check: every link endpoint names a defined node
///
/// Node fields are not inspected; see [`crate::validation::Validator`] for the
/// full schema.
#[must_use]
pub fn check_references(doc: &Document) -> bool {
    doc.missing_ids().is_empty()
}

/// Reference check over a file; unreadable input fails
#[must_use]
pub fn check_references_file(path: impl AsRef<Path>) -> bool {
    load_or_log(path.as_ref()).is_some_and(|doc| check_references(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn references_ignore_schema() {
        let doc = Document::from_value(json!({"nodes": [{"id": "n1"}]}));
        assert!(check_references(&doc));

        let doc = Document::from_value(json!({
            "nodes": [{"id": "n1"}, {"id": "n2"}],
            "links": [{"source": "n1", "target": "missing", "type": "prerequisite"}]
        }));
        assert!(!check_references(&doc));
    }

    #[test]
    fn unreadable_file_queries_are_empty() {
        let path = Path::new("/no/such/concept-map.json");
        assert!(missing_nodes(path).is_empty());
        assert!(orphaned_nodes(path).is_empty());
        assert!(!check_references_file(path));
    }
}
