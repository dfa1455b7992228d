//! Player representation

use crate::core::{Combatant, CombatantRef, EntityId, GameEntity, PlayerName, Vitals};
use serde::{Deserialize, Serialize};

pub type PlayerId = EntityId<Player>;

/// The player combatant
///
/// Owned by the orchestrator and persists across encounters, so health
/// lost in one fight carries into the next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique ID for this player
    pub id: PlayerId,

    /// Player name
    pub name: PlayerName,

    /// Health, block and statuses
    pub vitals: Vitals,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, max_health: i32) -> Self {
        Player {
            id,
            name: name.into(),
            vitals: Vitals::new(max_health),
        }
    }

    /// Clear encounter-scoped state (block and statuses), keep health
    pub fn reset_for_encounter(&mut self) {
        self.vitals.clear_block();
        self.vitals.statuses_mut().clear();
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl Combatant for Player {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn combatant_ref(&self) -> CombatantRef {
        CombatantRef::Player
    }

    fn display_name(&self) -> &str {
        self.name.as_str()
    }
}
