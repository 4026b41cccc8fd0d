//! Schema validation
//!
//! Runs every check in one pass and collects all faults instead of stopping
//! at the first. Stages, in report order:
//!
//! 1. root shape and metadata
//! 2. node records
//! 3. link records, against the ids defined by well-formed nodes
//! 4. cycles over the ordering relationship
//!
//! Only a non-object root short-circuits, since nothing else can be inspected.

mod links;
mod nodes;
mod report;
mod structure;

pub use report::{GraphStats, ValidationReport, UNKNOWN_GROUP, UNSET_LEVEL};

use crate::config::IntegrityConfig;
use crate::dag::DependencyGraph;
use crate::error::Fault;
use crate::model::Document;
use std::path::Path;
use tracing::debug;

/// Faults and warnings accumulated by the check stages
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub(crate) errors: Vec<Fault>,
    pub(crate) warnings: Vec<String>,
}

impl Findings {
    pub(crate) fn fault(&mut self, fault: Fault) {
        self.errors.push(fault);
    }

    pub(crate) fn warn(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Full schema validator
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: IntegrityConfig,
}

impl Validator {
    /// Validator with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with the given configuration
    #[must_use]
    pub fn with_config(config: IntegrityConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &IntegrityConfig {
        &self.config
    }

    /// Validate an in-memory document
    #[must_use]
    pub fn validate(&self, doc: &Document) -> ValidationReport {
        let mut findings = Findings::default();

        let Some(root) = doc.as_object() else {
            findings.fault(Fault::RootNotObject);
            return ValidationReport::from_findings(findings, doc);
        };

        structure::check_root(root, &mut findings);
        structure::check_metadata(root.get("metadata"), &mut findings);
        debug!(faults = findings.errors.len(), "structure checked");

        nodes::check_nodes(doc.nodes(), &self.config, &mut findings);
        debug!(nodes = doc.nodes().len(), faults = findings.errors.len(), "nodes checked");

        links::check_links(doc.links(), &doc.defined_ids(), &mut findings);
        debug!(links = doc.links().len(), faults = findings.errors.len(), "links checked");

        let relationship = self.config.ordering_relationship;
        let graph = DependencyGraph::from_links(doc.links(), relationship);
        if let Some(chain) = graph.find_cycle() {
            debug!(%relationship, chain = %chain.join(" <- "), "ordering cycle");
            findings.fault(Fault::CircularDependency { relationship });
        }

        ValidationReport::from_findings(findings, doc)
    }

    /// Load and validate a file
    ///
    /// A file that cannot be read or parsed yields an invalid report with a
    /// single fault describing why.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> ValidationReport {
        match Document::load(path) {
            Ok(doc) => self.validate(&doc),
            Err(err) => {
                debug!(error = %err, "document unreadable");
                ValidationReport::unreadable(&err)
            }
        }
    }
}

/// Validate a file with the given configuration
pub fn validate_file(path: impl AsRef<Path>, config: &IntegrityConfig) -> ValidationReport {
    Validator::with_config(config.clone()).validate_file(path)
}
