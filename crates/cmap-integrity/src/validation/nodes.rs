//! Per-node checks

use super::Findings;
use crate::config::IntegrityConfig;
use crate::error::Fault;
use crate::types::{
    is_well_formed_id, Group, ID_MAX_LEN, LEVEL_RANGE, NAME_LEN, NODE_DESCRIPTION_MAX, SIZE_RANGE,
};
use serde_json::{Map, Value};
use std::collections::HashSet;

const REQUIRED: [&str; 3] = ["id", "name", "group"];

/// Check every node record, collecting all faults
pub(crate) fn check_nodes(nodes: &[Value], config: &IntegrityConfig, findings: &mut Findings) {
    if nodes.is_empty() {
        findings.fault(Fault::NoNodes);
        return;
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        match node.as_object() {
            Some(node) => check_node(index, node, &mut seen, config, findings),
            None => findings.fault(Fault::NodeNotObject { index }),
        }
    }
}

fn check_node(
    index: usize,
    node: &Map<String, Value>,
    seen: &mut HashSet<String>,
    config: &IntegrityConfig,
    findings: &mut Findings,
) {
    let mut missing: Vec<String> = REQUIRED
        .iter()
        .filter(|k| !node.contains_key(**k))
        .map(|k| (*k).to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        findings.fault(Fault::NodeMissingFields {
            index,
            fields: missing,
        });
        return;
    }

    // Non-string ids are reported by their JSON rendering but never count
    // as duplicates of a string id.
    let id = match &node["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let id_chars = id.chars().count();
    if !node["id"].is_string() || !is_well_formed_id(&id) {
        findings.fault(Fault::InvalidIdFormat {
            index,
            id: id.clone(),
        });
    }
    if id_chars > ID_MAX_LEN {
        findings.fault(Fault::IdTooLong {
            index,
            id: id.clone(),
        });
    }
    if node["id"].is_string() && !seen.insert(id.clone()) {
        findings.fault(Fault::DuplicateId {
            index,
            id: id.clone(),
        });
    }

    match &node["name"] {
        Value::String(name) => {
            if !NAME_LEN.contains(&name.chars().count()) {
                findings.fault(Fault::NameLength { node: id.clone() });
            }
        }
        _ => findings.fault(Fault::NodeFieldType {
            node: id.clone(),
            field: "name",
        }),
    }

    let placeholder = node.get("auto_generated") == Some(&Value::Bool(true));
    match &node["group"] {
        Value::String(group) => {
            // The sentinel group belongs to synthesized nodes only
            let accepted = group.parse::<Group>().is_ok_and(|g| {
                !g.is_sentinel() || (config.allow_placeholder_group && placeholder)
            });
            if !accepted {
                findings.fault(Fault::InvalidGroup {
                    node: id.clone(),
                    group: group.clone(),
                });
            }
        }
        other => findings.fault(Fault::InvalidGroup {
            node: id.clone(),
            group: other.to_string(),
        }),
    }

    match node.get("description") {
        None => {}
        Some(Value::String(desc)) => {
            if desc.chars().count() > NODE_DESCRIPTION_MAX {
                findings.fault(Fault::NodeDescriptionTooLong { node: id.clone() });
            }
        }
        Some(_) => findings.fault(Fault::NodeFieldType {
            node: id.clone(),
            field: "description",
        }),
    }

    if let Some(level) = node.get("level") {
        let in_range = level.as_i64().is_some_and(|l| LEVEL_RANGE.contains(&l));
        if !in_range {
            findings.fault(Fault::LevelOutOfRange { node: id.clone() });
        }
    }

    if let Some(size) = node.get("size") {
        let in_range = size.as_f64().is_some_and(|s| SIZE_RANGE.contains(&s));
        if !in_range {
            findings.fault(Fault::SizeOutOfRange { node: id.clone() });
        }
    }

    if config.warn_on_placeholders && placeholder {
        findings.warn(format!(
            "Node {id}: auto-generated placeholder awaiting review"
        ));
    }
}
