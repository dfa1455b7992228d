//! Core combat types and entities

pub mod combatant;
pub mod enemy;
pub mod entity;
pub mod player;
pub mod rules;
pub mod status;
pub mod types;

pub use combatant::{Combatant, CombatantRef, DamageReport, Vitals};
pub use enemy::{Enemy, EnemyDefinition, EnemyId, Intent};
pub use entity::{EntityId, GameEntity};
pub use player::{Player, PlayerId};
pub use rules::{CombatRules, StandardRules, DEFAULT_MAX_BLOCK};
pub use status::StatusEffects;
pub use types::{CardId, EnemyName, PlayerName, StatusId};
