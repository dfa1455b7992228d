//! Scripted intent executor
//!
//! Executes each enemy's stored intent and then loads the next move from
//! its definition's move list, cycling like a replayed script. Useful for
//! tests, benchmarks and the CLI where no external AI is attached.

use crate::core::{CombatantRef, EnemyId, Intent};
use crate::game::{ActionScope, IntentExecutor};

/// An intent executor that plays back enemy move lists
#[derive(Debug, Clone, Default)]
pub struct ScriptedIntents {
    executed: usize,
}

impl ScriptedIntents {
    pub fn new() -> Self {
        ScriptedIntents { executed: 0 }
    }

    /// Number of intents carried out so far
    pub fn executed(&self) -> usize {
        self.executed
    }

    fn perform(intent: &Intent, enemy: EnemyId, scope: &mut ActionScope<'_>) {
        let me = CombatantRef::Enemy(enemy);
        match intent {
            Intent::Attack { damage, hits } => {
                for _ in 0..*hits {
                    if !scope.is_alive(CombatantRef::Player) {
                        break;
                    }
                    scope.attack(CombatantRef::Player, *damage);
                }
            }
            Intent::Defend { block } => {
                scope.add_block(me, *block);
            }
            Intent::Buff { status, stacks } => {
                scope.apply_status(me, status, *stacks);
            }
            Intent::Debuff { status, stacks } => {
                scope.apply_status(CombatantRef::Player, status, *stacks);
            }
            Intent::AttackDefend { damage, block } => {
                scope.attack(CombatantRef::Player, *damage);
                scope.add_block(me, *block);
            }
            Intent::Idle => {}
        }
    }
}

impl IntentExecutor for ScriptedIntents {
    fn execute_intent(&mut self, enemy: EnemyId, scope: &mut ActionScope<'_>) {
        let Some(intent) = scope.enemy(enemy).and_then(|e| e.intent.clone()) else {
            return;
        };

        Self::perform(&intent, enemy, scope);
        self.executed += 1;

        if let Some(actor) = scope.enemy_mut(enemy) {
            actor.advance_move();
        }
    }
}
