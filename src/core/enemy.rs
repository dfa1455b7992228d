//! Enemy combatants, their definitions and intents

use crate::core::{Combatant, CombatantRef, EnemyName, EntityId, GameEntity, StatusId, Vitals};
use crate::{CombatError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

pub type EnemyId = EntityId<Enemy>;

/// An enemy's declared upcoming action
///
/// Intents are chosen outside the combat core; the core only stores the
/// current one and hands the enemy to an intent executor on its turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Attack the player `hits` times
    Attack { damage: i32, hits: u8 },
    /// Gain block
    Defend { block: i32 },
    /// Apply a status to itself
    Buff { status: StatusId, stacks: i32 },
    /// Apply a status to the player
    Debuff { status: StatusId, stacks: i32 },
    /// Attack once and gain block
    AttackDefend { damage: i32, block: i32 },
    /// Do nothing
    Idle,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Attack { damage, hits } if *hits > 1 => write!(f, "attack {damage}x{hits}"),
            Intent::Attack { damage, .. } => write!(f, "attack {damage}"),
            Intent::Defend { block } => write!(f, "defend {block}"),
            Intent::Buff { status, stacks } => write!(f, "buff {status} {stacks:+}"),
            Intent::Debuff { status, stacks } => write!(f, "debuff {status} {stacks:+}"),
            Intent::AttackDefend { damage, block } => write!(f, "attack {damage} + defend {block}"),
            Intent::Idle => write!(f, "idle"),
        }
    }
}

/// Template an enemy is spawned from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub name: EnemyName,
    pub max_health: i32,
    #[serde(default)]
    pub starting_block: i32,
    #[serde(default)]
    pub statuses: Vec<(StatusId, i32)>,
    /// Move list cycled through by scripted intent execution
    #[serde(default)]
    pub moves: Vec<Intent>,
}

impl EnemyDefinition {
    pub fn new(name: impl Into<EnemyName>, max_health: i32) -> Self {
        EnemyDefinition {
            name: name.into(),
            max_health,
            starting_block: 0,
            statuses: Vec::new(),
            moves: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: i32) -> Self {
        self.starting_block = block;
        self
    }

    pub fn with_status(mut self, status: impl Into<StatusId>, stacks: i32) -> Self {
        self.statuses.push((status.into(), stacks));
        self
    }

    pub fn with_move(mut self, intent: Intent) -> Self {
        self.moves.push(intent);
        self
    }

    /// Check the definition can produce a valid enemy
    pub fn validate(&self) -> Result<()> {
        if self.name.as_str().trim().is_empty() {
            return Err(CombatError::InvalidDefinition(
                "enemy name is empty".to_string(),
            ));
        }
        if self.max_health < 1 {
            return Err(CombatError::InvalidDefinition(format!(
                "{}: max health must be at least 1 (got {})",
                self.name, self.max_health
            )));
        }
        if self.starting_block < 0 {
            return Err(CombatError::InvalidDefinition(format!(
                "{}: starting block cannot be negative (got {})",
                self.name, self.starting_block
            )));
        }
        if let Some((status, _)) = self.statuses.iter().find(|(status, _)| status.is_empty()) {
            return Err(CombatError::InvalidDefinition(format!(
                "{}: invalid status id '{}'",
                self.name, status
            )));
        }
        Ok(())
    }
}

/// An enemy spawned into the current encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique ID within the encounter
    pub id: EnemyId,

    /// Enemy name
    pub name: EnemyName,

    /// Health, block and statuses
    pub vitals: Vitals,

    /// Intent to execute on the next enemy turn
    pub intent: Option<Intent>,

    /// Move list from the definition
    moves: SmallVec<[Intent; 4]>,

    /// Next position in `moves`
    move_index: usize,
}

impl Enemy {
    /// Spawn an enemy from its definition
    ///
    /// Statuses from the definition are stored as-is; the first move (if
    /// any) becomes the initial intent.
    pub fn from_definition(id: EnemyId, definition: &EnemyDefinition) -> Result<Self> {
        definition.validate()?;

        let mut vitals = Vitals::new(definition.max_health);
        for (status, stacks) in &definition.statuses {
            let total = vitals.statuses().stacks(status).saturating_add(*stacks);
            vitals.statuses_mut().set(status.clone(), total);
        }

        let mut enemy = Enemy {
            id,
            name: definition.name.clone(),
            vitals,
            intent: None,
            moves: definition.moves.iter().cloned().collect(),
            move_index: 0,
        };
        enemy.vitals.set_block(definition.starting_block);
        enemy.advance_move();
        Ok(enemy)
    }

    pub fn moves(&self) -> &[Intent] {
        &self.moves
    }

    /// Load the next move from the move list as the current intent
    ///
    /// Cycles back to the first move at the end of the list. Without a
    /// move list the intent is left untouched.
    pub fn advance_move(&mut self) -> Option<&Intent> {
        if self.moves.is_empty() {
            return self.intent.as_ref();
        }
        let next = self.moves[self.move_index % self.moves.len()].clone();
        self.move_index = (self.move_index + 1) % self.moves.len();
        self.intent = Some(next);
        self.intent.as_ref()
    }

    pub fn set_intent(&mut self, intent: Option<Intent>) {
        self.intent = intent;
    }
}

impl GameEntity<Enemy> for Enemy {
    fn id(&self) -> EnemyId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl Combatant for Enemy {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn combatant_ref(&self) -> CombatantRef {
        CombatantRef::Enemy(self.id)
    }

    fn display_name(&self) -> &str {
        self.name.as_str()
    }
}
