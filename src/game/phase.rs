//! Turn phases, the enemy-turn cursor and encounter results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatResult {
    #[default]
    InProgress,
    Victory,
    Defeat,
    Escape,
}

impl CombatResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CombatResult::InProgress)
    }
}

impl fmt::Display for CombatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CombatResult::InProgress => "in progress",
            CombatResult::Victory => "victory",
            CombatResult::Defeat => "defeat",
            CombatResult::Escape => "escape",
        };
        write!(f, "{s}")
    }
}

/// Whose turn it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No encounter running
    #[default]
    OutOfCombat,
    PlayerTurn,
    EnemyTurn,
}

/// Resumable position in the enemy-turn pass
///
/// `Idle` is `enemy_turns_complete == true`; `Stepping(i)` is
/// `enemy_turns_complete == false` with `current_enemy_index == i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTurnCursor {
    pub current_enemy_index: usize,
    pub enemy_turns_complete: bool,
}

impl EnemyTurnCursor {
    /// A cursor with no pass in progress
    pub fn idle() -> Self {
        EnemyTurnCursor {
            current_enemy_index: 0,
            enemy_turns_complete: true,
        }
    }

    /// Rewind to the first enemy for a fresh pass
    pub fn begin_pass(&mut self) {
        self.current_enemy_index = 0;
        self.enemy_turns_complete = false;
    }

    pub fn is_stepping(&self) -> bool {
        !self.enemy_turns_complete
    }

    /// Move past the enemy just processed
    pub fn advance(&mut self) {
        self.current_enemy_index += 1;
    }

    pub fn finish(&mut self) {
        self.enemy_turns_complete = true;
    }

    /// Keep pointing at the same logical enemy after `removed_index` left the list
    pub fn on_enemy_removed(&mut self, removed_index: usize) {
        if self.is_stepping() && removed_index < self.current_enemy_index {
            self.current_enemy_index -= 1;
        }
    }
}

impl Default for EnemyTurnCursor {
    fn default() -> Self {
        Self::idle()
    }
}
