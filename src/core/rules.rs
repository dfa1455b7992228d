//! Combat rules policy
//!
//! Damage formulas, block mechanics and status eligibility live behind the
//! `CombatRules` trait so the engine can be driven by different rule sets.
//! Combatant operations consult the policy; they never hard-code it.

use crate::core::{StatusEffects, StatusId, Vitals};

/// Policy object consulted by combatant operations
pub trait CombatRules {
    /// Damage an attacker deals before the defender's modifiers apply
    fn outgoing_damage(&self, base: i32, attacker: &StatusEffects) -> i32;

    /// Damage that actually hits a defender (before block absorption)
    fn incoming_damage(&self, amount: i32, defender: &StatusEffects) -> i32;

    /// Block actually gained when `amount` block is requested
    fn block_gain(&self, current_block: i32, amount: i32, statuses: &StatusEffects) -> i32;

    /// Whether `stacks` of `status` may be applied to `target`
    fn can_apply_status(&self, target: &Vitals, status: &StatusId, stacks: i32) -> bool;

    /// Final stack count stored after merging; 0 removes the status
    fn normalize_stacks(&self, status: &StatusId, total: i32) -> i32;

    /// Start-of-turn status processing; returns health to lose (bypasses block)
    fn turn_start(&self, _statuses: &mut StatusEffects) -> i32 {
        0
    }

    /// End-of-turn status processing (duration decay)
    fn turn_end(&self, _statuses: &mut StatusEffects) {}
}

/// Block can never exceed this total under the standard rules
pub const DEFAULT_MAX_BLOCK: i32 = 999;

/// Deckbuilder rules: strength, weak, vulnerable, dexterity, frail, poison
#[derive(Debug, Clone)]
pub struct StandardRules {
    max_block: i32,
}

impl StandardRules {
    pub fn new() -> Self {
        StandardRules {
            max_block: DEFAULT_MAX_BLOCK,
        }
    }

    pub fn with_max_block(max_block: i32) -> Self {
        StandardRules {
            max_block: max_block.max(0),
        }
    }

    pub fn max_block(&self) -> i32 {
        self.max_block
    }

    fn allows_negative(status: &StatusId) -> bool {
        *status == StatusId::strength() || *status == StatusId::dexterity()
    }
}

/// `value * numerator / denominator`, computed wide and clamped back to `i32`
fn scale(value: i32, numerator: i64, denominator: i64) -> i32 {
    let scaled = i64::from(value) * numerator / denominator;
    scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Default for StandardRules {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatRules for StandardRules {
    fn outgoing_damage(&self, base: i32, attacker: &StatusEffects) -> i32 {
        let mut damage = base
            .saturating_add(attacker.stacks(&StatusId::strength()))
            .max(0);
        if attacker.has(&StatusId::weak()) {
            damage = scale(damage, 3, 4);
        }
        damage
    }

    fn incoming_damage(&self, amount: i32, defender: &StatusEffects) -> i32 {
        let mut damage = amount.max(0);
        if defender.has(&StatusId::vulnerable()) {
            damage = scale(damage, 3, 2);
        }
        damage
    }

    fn block_gain(&self, current_block: i32, amount: i32, statuses: &StatusEffects) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let mut gain = amount
            .saturating_add(statuses.stacks(&StatusId::dexterity()))
            .max(0);
        if statuses.has(&StatusId::frail()) {
            gain = scale(gain, 3, 4);
        }
        gain.min(self.max_block.saturating_sub(current_block).max(0))
    }

    fn can_apply_status(&self, target: &Vitals, status: &StatusId, stacks: i32) -> bool {
        target.is_alive() && !status.is_empty() && stacks != 0
    }

    fn normalize_stacks(&self, status: &StatusId, total: i32) -> i32 {
        if Self::allows_negative(status) {
            total
        } else {
            total.max(0)
        }
    }

    fn turn_start(&self, statuses: &mut StatusEffects) -> i32 {
        let poison = StatusId::poison();
        let stacks = statuses.stacks(&poison);
        if stacks <= 0 {
            return 0;
        }
        statuses.decay(&poison);
        stacks
    }

    fn turn_end(&self, statuses: &mut StatusEffects) {
        for status in [StatusId::weak(), StatusId::vulnerable(), StatusId::frail()] {
            statuses.decay(&status);
        }
    }
}
