//! Engine configuration
//!
//! Every field has a default, so an empty TOML file (or none at all) yields
//! the stock behavior:
//!
//! ```toml
//! ordering_relationship = "prerequisite"
//! allow_placeholder_group = true
//! warn_on_placeholders = true
//! backup_before_fix = false
//! placeholder_level = 1
//! placeholder_size = 8
//! ```

use crate::error::{IntegrityError, IntegrityResult};
use crate::types::RelationshipType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration shared by validation and repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrityConfig {
    /// Link type whose chains must stay acyclic
    pub ordering_relationship: RelationshipType,
    /// Accept the `auto-generated` sentinel group on nodes flagged `auto_generated`
    pub allow_placeholder_group: bool,
    /// Emit a warning for every placeholder node still present
    pub warn_on_placeholders: bool,
    /// Copy the document aside before a repair overwrites it
    pub backup_before_fix: bool,
    /// `level` given to synthesized nodes
    pub placeholder_level: u8,
    /// `size` given to synthesized nodes
    pub placeholder_size: u32,
}

impl IntegrityConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With ordering relationship
    #[inline]
    #[must_use]
    pub fn with_ordering_relationship(mut self, relationship: RelationshipType) -> Self {
        self.ordering_relationship = relationship;
        self
    }

    /// With placeholder group acceptance
    #[inline]
    #[must_use]
    pub fn with_placeholder_group(mut self, allow: bool) -> Self {
        self.allow_placeholder_group = allow;
        self
    }

    /// With placeholder warnings
    #[inline]
    #[must_use]
    pub fn with_placeholder_warnings(mut self, warn: bool) -> Self {
        self.warn_on_placeholders = warn;
        self
    }

    /// With backup before repair
    #[inline]
    #[must_use]
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup_before_fix = backup;
        self
    }

    /// Parse TOML text; `origin` is used in error messages
    pub fn from_toml_str(text: &str, origin: &Path) -> IntegrityResult<Self> {
        toml::from_str(text).map_err(|e| IntegrityError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> IntegrityResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| IntegrityError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text, path)
    }
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            ordering_relationship: RelationshipType::Prerequisite,
            allow_placeholder_group: true,
            warn_on_placeholders: true,
            backup_before_fix: false,
            placeholder_level: 1,
            placeholder_size: 8,
        }
    }
}
