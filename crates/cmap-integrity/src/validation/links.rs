//! Per-link checks

use super::Findings;
use crate::error::Fault;
use crate::types::{RelationshipType, LINK_DESCRIPTION_MAX, STRENGTH_RANGE};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

const REQUIRED: [&str; 3] = ["source", "target", "type"];

/// Check every link record against the defined node ids
pub(crate) fn check_links(links: &[Value], defined: &BTreeSet<String>, findings: &mut Findings) {
    let mut signatures: HashSet<(&str, &str, &str)> = HashSet::with_capacity(links.len());
    for (index, link) in links.iter().enumerate() {
        match link.as_object() {
            Some(link) => check_link(index, link, defined, &mut signatures, findings),
            None => findings.fault(Fault::LinkNotObject { index }),
        }
    }
}

fn check_link<'a>(
    index: usize,
    link: &'a Map<String, Value>,
    defined: &BTreeSet<String>,
    signatures: &mut HashSet<(&'a str, &'a str, &'a str)>,
    findings: &mut Findings,
) {
    let mut missing: Vec<String> = REQUIRED
        .iter()
        .filter(|k| !link.contains_key(**k))
        .map(|k| (*k).to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        findings.fault(Fault::LinkMissingFields {
            index,
            fields: missing,
        });
        return;
    }

    let mut fields = [("source", ""), ("target", ""), ("type", "")];
    for (field, slot) in &mut fields {
        match link[*field].as_str() {
            Some(s) => *slot = s,
            None => {
                findings.fault(Fault::LinkFieldType { index, field });
                return;
            }
        }
    }
    let [(_, source), (_, target), (_, kind)] = fields;

    if !defined.contains(source) {
        findings.fault(Fault::UnknownSource {
            index,
            id: source.to_string(),
        });
    }
    if !defined.contains(target) {
        findings.fault(Fault::UnknownTarget {
            index,
            id: target.to_string(),
        });
    }

    if source == target {
        findings.fault(Fault::SelfReference {
            index,
            id: source.to_string(),
        });
    }

    if kind.parse::<RelationshipType>().is_err() {
        findings.fault(Fault::InvalidLinkType {
            index,
            kind: kind.to_string(),
        });
    }

    if !signatures.insert((source, target, kind)) {
        findings.fault(Fault::DuplicateLink {
            index,
            signature: format!("{source}:{target}:{kind}"),
        });
    }

    if let Some(strength) = link.get("strength") {
        let in_range = strength
            .as_f64()
            .is_some_and(|s| STRENGTH_RANGE.contains(&s));
        if !in_range {
            findings.fault(Fault::StrengthOutOfRange { index });
        }
    }

    match link.get("description") {
        None => {}
        Some(Value::String(desc)) => {
            if desc.chars().count() > LINK_DESCRIPTION_MAX {
                findings.fault(Fault::LinkDescriptionTooLong { index });
            }
        }
        Some(_) => findings.fault(Fault::LinkFieldType {
            index,
            field: "description",
        }),
    }
}
