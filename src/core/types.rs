//! Strongly-typed wrappers for combat concepts
//!
//! Newtypes keep status identifiers and display names from being mixed up
//! with each other or with arbitrary strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status effect identifier (e.g., "poison", "strength", "vulnerable")
///
/// Ordered so that status bags iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatusId(String);

impl StatusId {
    pub fn new(s: impl Into<String>) -> Self {
        StatusId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    // Common statuses understood by the standard rules
    pub fn poison() -> Self {
        StatusId("poison".to_string())
    }

    pub fn strength() -> Self {
        StatusId("strength".to_string())
    }

    pub fn dexterity() -> Self {
        StatusId("dexterity".to_string())
    }

    pub fn weak() -> Self {
        StatusId("weak".to_string())
    }

    pub fn vulnerable() -> Self {
        StatusId("vulnerable".to_string())
    }

    pub fn frail() -> Self {
        StatusId("frail".to_string())
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StatusId {
    fn from(s: String) -> Self {
        StatusId(s)
    }
}

impl From<&str> for StatusId {
    fn from(s: &str) -> Self {
        StatusId(s.to_string())
    }
}

/// Handle of a card owned by the external deck component
///
/// The combat core never looks inside a card; it only passes the handle
/// back to the deck hooks for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    pub const fn new(id: u32) -> Self {
        CardId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Enemy name (e.g., "Cultist", "Jaw Worm")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyName(String);

impl EnemyName {
    pub fn new(s: impl Into<String>) -> Self {
        EnemyName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnemyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EnemyName {
    fn from(s: String) -> Self {
        EnemyName(s)
    }
}

impl From<&str> for EnemyName {
    fn from(s: &str) -> Self {
        EnemyName(s.to_string())
    }
}

/// Player name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlayerName {
    fn from(s: String) -> Self {
        PlayerName(s)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        PlayerName(s.to_string())
    }
}
