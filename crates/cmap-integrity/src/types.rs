//! Fixed vocabularies and field bounds of the concept-map schema.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Longest accepted node identifier, in characters.
pub const ID_MAX_LEN: usize = 30;
/// Accepted node display-name lengths.
pub const NAME_LEN: RangeInclusive<usize> = 1..=50;
/// Longest node description.
pub const NODE_DESCRIPTION_MAX: usize = 200;
/// Longest link description.
pub const LINK_DESCRIPTION_MAX: usize = 100;
/// Longest metadata description.
pub const METADATA_DESCRIPTION_MAX: usize = 200;
/// Accepted node levels.
pub const LEVEL_RANGE: RangeInclusive<i64> = 0..=5;
/// Accepted node sizes.
pub const SIZE_RANGE: RangeInclusive<f64> = 5.0..=30.0;
/// Accepted link strengths.
pub const STRENGTH_RANGE: RangeInclusive<f64> = 0.1..=1.0;

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("identifier pattern is a valid regex")
});

/// Lowercase alphanumerics, inner hyphens only. Length is checked separately.
#[must_use]
pub fn is_well_formed_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

/// A value that is not part of one of the fixed vocabularies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    /// Vocabulary that was searched
    pub kind: &'static str,
    /// Offending value
    pub value: String,
}

/// Node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Group {
    /// A whole course or curriculum
    Course,
    Concept,
    Skill,
    /// Programming language
    Language,
    Tool,
    /// Programming paradigm
    Paradigm,
    /// Data structure
    Structure,
    Algorithm,
    /// Sentinel assigned to synthesized placeholder nodes
    AutoGenerated,
}

impl Group {
    /// Categories an author may assign.
    pub const AUTHORED: [Group; 8] = [
        Group::Course,
        Group::Concept,
        Group::Skill,
        Group::Language,
        Group::Tool,
        Group::Paradigm,
        Group::Structure,
        Group::Algorithm,
    ];

    /// Wire name of the category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Group::Course => "course",
            Group::Concept => "concept",
            Group::Skill => "skill",
            Group::Language => "language",
            Group::Tool => "tool",
            Group::Paradigm => "paradigm",
            Group::Structure => "structure",
            Group::Algorithm => "algorithm",
            Group::AutoGenerated => "auto-generated",
        }
    }

    /// Whether this is the placeholder sentinel.
    #[must_use]
    pub fn is_sentinel(self) -> bool {
        matches!(self, Group::AutoGenerated)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Group::AUTHORED
            .into_iter()
            .chain([Group::AutoGenerated])
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "group",
                value: s.to_string(),
            })
    }
}

/// Link type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    /// Ordering constraint: source must come before target
    #[default]
    Prerequisite,
    /// Source makes target possible
    Enables,
    /// Loose association
    Related,
    /// Source is a component of target
    PartOf,
    /// Source realizes target
    Implements,
    /// Source depends on target
    Uses,
}

impl RelationshipType {
    /// Every accepted link type.
    pub const ALL: [RelationshipType; 6] = [
        RelationshipType::Prerequisite,
        RelationshipType::Enables,
        RelationshipType::Related,
        RelationshipType::PartOf,
        RelationshipType::Implements,
        RelationshipType::Uses,
    ];

    /// Wire name of the link type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::Prerequisite => "prerequisite",
            RelationshipType::Enables => "enables",
            RelationshipType::Related => "related",
            RelationshipType::PartOf => "part-of",
            RelationshipType::Implements => "implements",
            RelationshipType::Uses => "uses",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationshipType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "relationship type",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_pattern() {
        assert!(is_well_formed_id("a"));
        assert!(is_well_formed_id("data-structures-101"));
        assert!(!is_well_formed_id("-leading"));
        assert!(!is_well_formed_id("trailing-"));
        assert!(!is_well_formed_id("Upper"));
        assert!(!is_well_formed_id("under_score"));
        assert!(!is_well_formed_id(""));
    }

    #[test]
    fn group_round_trips_through_wire_name() {
        for g in Group::AUTHORED {
            assert_eq!(g.as_str().parse::<Group>().unwrap(), g);
        }
        assert_eq!("auto-generated".parse::<Group>().unwrap(), Group::AutoGenerated);
        assert!("widget".parse::<Group>().is_err());
    }

    #[test]
    fn relationship_wire_names() {
        assert_eq!("part-of".parse::<RelationshipType>().unwrap(), RelationshipType::PartOf);
        assert_eq!(RelationshipType::default(), RelationshipType::Prerequisite);
        let err = "builds_on".parse::<RelationshipType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown relationship type 'builds_on'");
    }
}
