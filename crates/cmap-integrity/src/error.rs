//! Error types for the integrity engine
//!
//! Two families live here:
//! - [`IntegrityError`]: operations that could not run (unreadable input,
//!   bad configuration, failed backup or write)
//! - [`Fault`]: findings about a document that *was* read; these are
//!   collected into a report and never abort validation

use crate::types::RelationshipType;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// Failure to carry out a load, repair or configuration operation
#[derive(Debug, thiserror::Error)]
pub enum IntegrityError {
    /// Input file does not exist
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Input file exists but could not be read
    #[error("io error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input is not well-formed JSON
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Document parsed but its shape prevents the requested mutation
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Configuration file unreadable or invalid
    #[error("configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Document could not be rendered back to JSON
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Backup copy could not be created
    #[error("backup of {path} to {backup} failed: {source}")]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Repaired document could not be written
    #[error("Error writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IntegrityError {
    /// Build a read error, mapping `NotFound` to its own variant
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Read { path, source }
        }
    }

    /// Build a write error for path
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Input could not be loaded at all (I/O or parse)
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Read { .. } | Self::Parse { .. }
        )
    }

    /// Failure happened while persisting a repair
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Backup { .. } | Self::Write { .. } | Self::Serialize(_)
        )
    }
}

/// Result type alias for integrity operations
pub type IntegrityResult<T> = Result<T, IntegrityError>;

/// Broad class of a validation fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultCategory {
    /// Document could not be read or parsed
    Input,
    /// Root or metadata shape
    Structural,
    /// Per-record field presence, format, range or vocabulary
    Field,
    /// Dangling references, duplicates, self-references
    Relational,
    /// Circular ordering constraints
    Topological,
}

/// One finding reported by validation
///
/// `Display` renders the human-readable message carried in reports.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Fault {
    /// Document could not be read or parsed
    #[error("{reason}")]
    Unreadable { reason: String },

    /// Root value is not a JSON object
    #[error("Document root must be a JSON object")]
    RootNotObject,

    /// One or more of `metadata`, `nodes`, `links` absent
    #[error("Missing required root keys: {keys:?}")]
    MissingRootKeys { keys: Vec<String> },

    /// `nodes` or `links` is not an array
    #[error("'{key}' must be an array")]
    NotAnArray { key: &'static str },

    /// `metadata` is present but not an object
    #[error("'metadata' must be an object")]
    MetadataNotObject,

    /// One or more of `version`, `created`, `description` absent
    #[error("Missing required metadata keys: {keys:?}")]
    MissingMetadataKeys { keys: Vec<String> },

    /// `created` is not an ISO-8601 date or date-time
    #[error("Invalid created date format: {value}")]
    InvalidCreatedDate { value: String },

    /// Metadata description over 200 characters
    #[error("Description too long: {len} > 200 chars")]
    MetadataDescriptionTooLong { len: usize },

    /// Metadata field of the wrong JSON type
    #[error("Metadata '{field}' must be a string")]
    MetadataFieldType { field: &'static str },

    /// Node collection is empty
    #[error("Must contain at least one node")]
    NoNodes,

    /// Node record is not an object
    #[error("Node {index}: must be an object")]
    NodeNotObject { index: usize },

    /// Node lacks `id`, `name` or `group`
    #[error("Node {index}: Missing required fields {fields:?}")]
    NodeMissingFields { index: usize, fields: Vec<String> },

    /// Id is not lowercase alphanumerics with inner hyphens
    #[error("Node {index}: Invalid ID format '{id}'")]
    InvalidIdFormat { index: usize, id: String },

    /// Id over 30 characters
    #[error("Node {index}: ID too long '{id}'")]
    IdTooLong { index: usize, id: String },

    /// Id already used by an earlier node
    #[error("Node {index}: Duplicate ID '{id}'")]
    DuplicateId { index: usize, id: String },

    /// Node field of the wrong JSON type
    #[error("Node {node}: '{field}' must be a string")]
    NodeFieldType { node: String, field: &'static str },

    /// Name outside 1-50 characters
    #[error("Node {node}: Name length must be 1-50 chars")]
    NameLength { node: String },

    /// Group outside the fixed vocabulary
    #[error("Node {node}: Invalid group '{group}'")]
    InvalidGroup { node: String, group: String },

    /// Node description over 200 characters
    #[error("Node {node}: Description too long")]
    NodeDescriptionTooLong { node: String },

    /// Level not an integer in 0-5
    #[error("Node {node}: Level must be 0-5")]
    LevelOutOfRange { node: String },

    /// Size not a number in 5-30
    #[error("Node {node}: Size must be 5-30")]
    SizeOutOfRange { node: String },

    /// Link record is not an object
    #[error("Link {index}: must be an object")]
    LinkNotObject { index: usize },

    /// Link lacks `source`, `target` or `type`
    #[error("Link {index}: Missing required fields {fields:?}")]
    LinkMissingFields { index: usize, fields: Vec<String> },

    /// Link field of the wrong JSON type
    #[error("Link {index}: '{field}' must be a string")]
    LinkFieldType { index: usize, field: &'static str },

    /// Source names no defined node
    #[error("Link {index}: Unknown source node '{id}'")]
    UnknownSource { index: usize, id: String },

    /// Target names no defined node
    #[error("Link {index}: Unknown target node '{id}'")]
    UnknownTarget { index: usize, id: String },

    /// Source and target are the same node
    #[error("Link {index}: Self-referencing link '{id}'")]
    SelfReference { index: usize, id: String },

    /// Type outside the fixed vocabulary
    #[error("Link {index}: Invalid type '{kind}'")]
    InvalidLinkType { index: usize, kind: String },

    /// Same source, target and type as an earlier link
    #[error("Link {index}: Duplicate link {signature}")]
    DuplicateLink { index: usize, signature: String },

    /// Strength not a number in 0.1-1.0
    #[error("Link {index}: Strength must be 0.1-1.0")]
    StrengthOutOfRange { index: usize },

    /// Link description over 100 characters
    #[error("Link {index}: Description too long")]
    LinkDescriptionTooLong { index: usize },

    /// Ordering links form a cycle
    #[error("Circular {relationship} dependencies detected")]
    CircularDependency { relationship: RelationshipType },
}

impl Fault {
    /// Classify the fault
    #[must_use]
    pub fn category(&self) -> FaultCategory {
        match self {
            Fault::Unreadable { .. } => FaultCategory::Input,
            Fault::RootNotObject
            | Fault::MissingRootKeys { .. }
            | Fault::NotAnArray { .. }
            | Fault::MetadataNotObject
            | Fault::MissingMetadataKeys { .. }
            | Fault::InvalidCreatedDate { .. }
            | Fault::MetadataDescriptionTooLong { .. }
            | Fault::MetadataFieldType { .. }
            | Fault::NoNodes => FaultCategory::Structural,
            Fault::UnknownSource { .. }
            | Fault::UnknownTarget { .. }
            | Fault::SelfReference { .. }
            | Fault::DuplicateId { .. }
            | Fault::DuplicateLink { .. } => FaultCategory::Relational,
            Fault::CircularDependency { .. } => FaultCategory::Topological,
            _ => FaultCategory::Field,
        }
    }
}

impl Serialize for Fault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn fault_messages_carry_location() {
        let f = Fault::UnknownTarget {
            index: 3,
            id: "missing".to_string(),
        };
        assert_eq!(f.to_string(), "Link 3: Unknown target node 'missing'");

        let f = Fault::NodeMissingFields {
            index: 0,
            fields: vec!["group".to_string(), "name".to_string()],
        };
        assert_eq!(f.to_string(), r#"Node 0: Missing required fields ["group", "name"]"#);

        let f = Fault::CircularDependency {
            relationship: RelationshipType::Prerequisite,
        };
        assert_eq!(f.to_string(), "Circular prerequisite dependencies detected");
    }

    #[test]
    fn fault_serializes_as_message() {
        let json = serde_json::to_value(Fault::NoNodes).unwrap();
        assert_eq!(json, serde_json::json!("Must contain at least one node"));
    }

    #[test]
    fn fault_categories() {
        assert_eq!(Fault::RootNotObject.category(), FaultCategory::Structural);
        assert_eq!(
            Fault::SelfReference { index: 0, id: "a".into() }.category(),
            FaultCategory::Relational
        );
        assert_eq!(
            Fault::LevelOutOfRange { node: "a".into() }.category(),
            FaultCategory::Field
        );
    }

    #[test]
    fn read_error_maps_not_found() {
        let err = IntegrityError::read_error("x.json", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, IntegrityError::NotFound { .. }));
        assert!(err.is_unreadable());
        assert_eq!(err.to_string(), "File not found: x.json");

        let err = IntegrityError::write_error("x.json", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(err.is_persistence());
        assert!(!err.is_unreadable());
    }
}
