//! Encounter runner
//!
//! Drives a whole encounter for headless hosts (CLI, benchmarks, tests):
//! each turn the player driver acts, the player turn ends, then the enemy
//! pass is pumped until it reports completion.

use crate::game::{CombatOrchestrator, CombatResult, TurnPhase};
use crate::{CombatError, Result};
use serde::{Deserialize, Serialize};

/// Makes the player's decisions during each player turn
pub trait PlayerDriver {
    /// Act for the current player turn (play cards, gain block, ...)
    ///
    /// The runner ends the turn after this returns, unless the encounter
    /// already finished.
    fn take_turn(&mut self, combat: &mut CombatOrchestrator);
}

/// A driver that never acts
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveDriver;

impl PlayerDriver for PassiveDriver {
    fn take_turn(&mut self, _combat: &mut CombatOrchestrator) {}
}

/// Outcome of a completed encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub result: CombatResult,
    /// Player turns started
    pub turns: u32,
    /// Cards played across the encounter
    pub cards_played: u32,
    /// Enemy-turn steps taken (dead enemies stepped over included)
    pub steps: u32,
}

/// Runs an encounter to completion
pub struct EncounterRunner<'a> {
    combat: &'a mut CombatOrchestrator,
    /// Turns after which the player escapes
    max_turns: u32,
}

impl<'a> EncounterRunner<'a> {
    pub fn new(combat: &'a mut CombatOrchestrator) -> Self {
        EncounterRunner {
            combat,
            max_turns: 100,
        }
    }

    /// Set the turn limit (the encounter ends as `Escape` when reached)
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Run the active encounter until it ends or hits the turn limit
    ///
    /// The runner never drains the event log: events pile up until the host
    /// calls `drain_events`. Hosts that only want the summary should build
    /// the orchestrator with `EventLog::disabled()`.
    pub fn run<D: PlayerDriver + ?Sized>(&mut self, driver: &mut D) -> Result<EncounterSummary> {
        if !self.combat.in_combat() {
            return Err(CombatError::NotInCombat);
        }

        let mut steps = 0;
        let mut cards_played = 0;

        while self.combat.in_combat() {
            if self.combat.turn_number() > self.max_turns {
                self.combat.end_combat(CombatResult::Escape);
                break;
            }

            if self.combat.phase() == TurnPhase::PlayerTurn {
                let turn = self.combat.turn_number();
                log_if_verbose!(self.combat.logger(), "--- Turn {} ---", turn);
                driver.take_turn(self.combat);
                cards_played = self.combat.cards_played();

                // The driver may have finished the fight
                if self.combat.check_combat_end().is_terminal() {
                    break;
                }
                self.combat.end_player_turn();
            }

            while !self.combat.process_enemy_turns() {
                steps += 1;
            }
        }

        Ok(EncounterSummary {
            result: self.combat.combat_result(),
            turns: self.combat.turn_number(),
            cards_played,
            steps,
        })
    }
}
