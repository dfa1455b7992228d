//! Spire Combat - turn-based combat engine for deckbuilder games
//!
//! Drives a single encounter from setup through alternating player and
//! enemy turns to victory, defeat or escape. Card handling and enemy AI
//! plug in through hook traits; the engine owns turn order, entity
//! lifecycles and death/removal semantics.

pub mod core;
pub mod error;
pub mod game;

pub use error::{CombatError, Result};
