//! Integrity engine for JSON concept maps
//!
//! A concept map is a JSON document with `metadata`, `nodes` and `links`.
//! This crate:
//!
//! - checks that every link endpoint names a defined node ([`query`])
//! - validates the full schema and reports every fault found ([`validation`])
//! - detects cycles among ordering links ([`dag`])
//! - repairs dangling references by appending placeholder nodes ([`repair`])
//!
//! ```no_run
//! use cmap_integrity::prelude::*;
//!
//! let report = Validator::new().validate_file("concept-map.json");
//! if !report.valid {
//!     let outcome = RepairEngine::new().repair_file("concept-map.json", true)?;
//!     println!("created {:?}", outcome.created);
//! }
//! # Ok::<(), cmap_integrity::IntegrityError>(())
//! ```

pub mod config;
pub mod dag;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod repair;
pub mod types;
pub mod validation;

pub use config::IntegrityConfig;
pub use error::{Fault, FaultCategory, IntegrityError, IntegrityResult};
pub use model::Document;
pub use query::{check_references, check_references_file, missing_nodes, orphaned_nodes};
pub use repair::{RepairEngine, RepairOutcome};
pub use types::{Group, RelationshipType};
pub use validation::{validate_file, GraphStats, ValidationReport, Validator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::config::IntegrityConfig;
    pub use crate::dag::DependencyGraph;
    pub use crate::error::{Fault, IntegrityError, IntegrityResult};
    pub use crate::model::Document;
    pub use crate::query::{check_references, check_references_file, missing_nodes, orphaned_nodes};
    pub use crate::repair::{RepairEngine, RepairOutcome};
    pub use crate::types::{Group, RelationshipType};
    pub use crate::validation::{ValidationReport, Validator};
}
