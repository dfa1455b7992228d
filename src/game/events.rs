//! Change notifications emitted by the combat core
//!
//! Every observable state change is recorded as a `CombatEvent` in an
//! `EventLog`. Hosts drain the log after each call to bind UI, play
//! animations or collect statistics; the core never waits on a listener.

use crate::core::{CombatantRef, EnemyId, StatusId};
use crate::game::CombatResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single observable state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum CombatEvent {
    CombatStarted,
    CombatEnded { result: CombatResult },
    PlayerTurnStarted { turn: u32 },
    PlayerTurnEnded { turn: u32 },
    EnemyTurnsStarted,
    EnemyActed { enemy: EnemyId },
    HealthChanged { target: CombatantRef, old: i32, new: i32 },
    BlockChanged { target: CombatantRef, old: i32, new: i32 },
    StatusChanged { target: CombatantRef, status: StatusId, stacks: i32 },
    EnemyAdded { enemy: EnemyId },
    EnemyDied { enemy: EnemyId },
    EnemyRemoved { enemy: EnemyId },
    TargetChanged { enemy: Option<EnemyId> },
    CardPlayed { total: u32 },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::CombatStarted => write!(f, "Combat started"),
            CombatEvent::CombatEnded { result } => write!(f, "Combat ended: {result}"),
            CombatEvent::PlayerTurnStarted { turn } => write!(f, "Player turn {turn} started"),
            CombatEvent::PlayerTurnEnded { turn } => write!(f, "Player turn {turn} ended"),
            CombatEvent::EnemyTurnsStarted => write!(f, "Enemy turns started"),
            CombatEvent::EnemyActed { enemy } => write!(f, "enemy#{enemy} acted"),
            CombatEvent::HealthChanged { target, old, new } => {
                write!(f, "{target} health {old} -> {new}")
            }
            CombatEvent::BlockChanged { target, old, new } => {
                write!(f, "{target} block {old} -> {new}")
            }
            CombatEvent::StatusChanged {
                target,
                status,
                stacks,
            } => write!(f, "{target} {status} now {stacks}"),
            CombatEvent::EnemyAdded { enemy } => write!(f, "enemy#{enemy} joined"),
            CombatEvent::EnemyDied { enemy } => write!(f, "enemy#{enemy} died"),
            CombatEvent::EnemyRemoved { enemy } => write!(f, "enemy#{enemy} removed"),
            CombatEvent::TargetChanged { enemy: Some(enemy) } => {
                write!(f, "Target set to enemy#{enemy}")
            }
            CombatEvent::TargetChanged { enemy: None } => write!(f, "Target cleared"),
            CombatEvent::CardPlayed { total } => write!(f, "Card played ({total} this combat)"),
        }
    }
}

/// Buffer of events the host has not drained yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    /// Pending events (oldest first)
    events: Vec<CombatEvent>,

    /// Is recording enabled? (disabled for benchmarks)
    enabled: bool,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            events: Vec::new(),
            enabled: true,
        }
    }

    /// Create a disabled event log (for benchmarking)
    pub fn disabled() -> Self {
        EventLog {
            events: Vec::new(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record an event
    pub fn log(&mut self, event: CombatEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    /// Get pending events without removing them
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
