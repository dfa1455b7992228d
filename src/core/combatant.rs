//! Health, block and status mechanics shared by every combatant
//!
//! `Vitals` holds the numbers; the `Combatant` trait is the small capability
//! surface both the player and enemies expose on top of it.

use crate::core::{CombatRules, EnemyId, StatusEffects, StatusId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which combatant an event or action refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantRef {
    Player,
    Enemy(EnemyId),
}

impl fmt::Display for CombatantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatantRef::Player => write!(f, "player"),
            CombatantRef::Enemy(id) => write!(f, "enemy#{id}"),
        }
    }
}

/// Breakdown of a single damage application
///
/// `total()` is what `take_damage` reports: block and health consumed
/// together, i.e. `min(modified_amount, block + health)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    /// Damage absorbed by block
    pub blocked: i32,
    /// Damage that reached health
    pub health_lost: i32,
}

impl DamageReport {
    pub fn total(&self) -> i32 {
        self.blocked.saturating_add(self.health_lost)
    }
}

/// Health, block and status bag of one combatant
///
/// Invariants: `0 <= current_health <= max_health`, `max_health >= 1`,
/// `block >= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    current_health: i32,
    max_health: i32,
    block: i32,
    statuses: StatusEffects,
}

impl Vitals {
    /// Full health, no block, no statuses
    pub fn new(max_health: i32) -> Self {
        let max_health = max_health.max(1);
        Vitals {
            current_health: max_health,
            max_health,
            block: 0,
            statuses: StatusEffects::new(),
        }
    }

    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn block(&self) -> i32 {
        self.block
    }

    pub fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    pub fn statuses_mut(&mut self) -> &mut StatusEffects {
        &mut self.statuses
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Change max health, pulling current health down if it no longer fits
    pub fn set_max_health(&mut self, max_health: i32) {
        self.max_health = max_health.max(1);
        self.current_health = self.current_health.min(self.max_health);
    }

    /// Set current health directly (clamped to `0..=max_health`)
    pub fn set_current_health(&mut self, health: i32) {
        self.current_health = health.clamp(0, self.max_health);
    }

    /// Set block directly, bypassing the rules (spawn templates)
    pub fn set_block(&mut self, block: i32) {
        self.block = block.max(0);
    }

    /// Apply damage: rules modify it, block absorbs first, health takes the rest
    pub fn take_damage_detailed(&mut self, amount: i32, rules: &dyn CombatRules) -> DamageReport {
        if !self.is_alive() {
            return DamageReport::default();
        }
        let amount = rules.incoming_damage(amount, &self.statuses).max(0);

        let blocked = amount.min(self.block);
        self.block -= blocked;

        let health_lost = (amount - blocked).min(self.current_health);
        self.current_health -= health_lost;

        DamageReport {
            blocked,
            health_lost,
        }
    }

    /// Apply damage and report block + health consumed
    pub fn take_damage(&mut self, amount: i32, rules: &dyn CombatRules) -> i32 {
        self.take_damage_detailed(amount, rules).total()
    }

    /// Lose health directly, ignoring block (poison, self-damage)
    pub fn lose_health(&mut self, amount: i32) -> i32 {
        if amount <= 0 || !self.is_alive() {
            return 0;
        }
        let lost = amount.min(self.current_health);
        self.current_health -= lost;
        lost
    }

    /// Restore health toward max; returns the amount actually healed
    ///
    /// A dead combatant stays dead: healing at 0 health does nothing.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 || !self.is_alive() {
            return 0;
        }
        let healed = amount.min(self.max_health - self.current_health);
        self.current_health += healed;
        healed
    }

    /// Gain block as allowed by the rules; returns the block actually gained
    pub fn add_block(&mut self, amount: i32, rules: &dyn CombatRules) -> i32 {
        let gained = rules.block_gain(self.block, amount, &self.statuses).max(0);
        self.block = self.block.saturating_add(gained);
        gained
    }

    /// Drop all block; returns the block that was removed
    pub fn clear_block(&mut self) -> i32 {
        std::mem::take(&mut self.block)
    }

    /// Merge stacks into the status bag if the rules allow it
    pub fn apply_status(
        &mut self,
        status: &StatusId,
        stacks: i32,
        rules: &dyn CombatRules,
    ) -> bool {
        if !rules.can_apply_status(self, status, stacks) {
            return false;
        }
        let merged = self.statuses.stacks(status).saturating_add(stacks);
        let total = rules.normalize_stacks(status, merged);
        self.statuses.set(status.clone(), total);
        true
    }
}

/// Flat capability interface shared by the player and enemies
pub trait Combatant {
    fn vitals(&self) -> &Vitals;
    fn vitals_mut(&mut self) -> &mut Vitals;
    fn combatant_ref(&self) -> CombatantRef;
    fn display_name(&self) -> &str;

    fn current_health(&self) -> i32 {
        self.vitals().current_health()
    }

    fn max_health(&self) -> i32 {
        self.vitals().max_health()
    }

    fn block(&self) -> i32 {
        self.vitals().block()
    }

    fn statuses(&self) -> &StatusEffects {
        self.vitals().statuses()
    }

    fn is_alive(&self) -> bool {
        self.vitals().is_alive()
    }

    fn take_damage(&mut self, amount: i32, rules: &dyn CombatRules) -> i32 {
        self.vitals_mut().take_damage(amount, rules)
    }

    fn heal(&mut self, amount: i32) -> i32 {
        self.vitals_mut().heal(amount)
    }

    fn add_block(&mut self, amount: i32, rules: &dyn CombatRules) -> i32 {
        self.vitals_mut().add_block(amount, rules)
    }

    fn clear_block(&mut self) -> i32 {
        self.vitals_mut().clear_block()
    }

    fn apply_status(&mut self, status: &StatusId, stacks: i32, rules: &dyn CombatRules) -> bool {
        self.vitals_mut().apply_status(status, stacks, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StandardRules, DEFAULT_MAX_BLOCK};

    #[test]
    fn test_block_absorbs_first() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(50);
        vitals.add_block(10, &rules);

        let taken = vitals.take_damage(4, &rules);
        assert_eq!(taken, 4);
        assert_eq!(vitals.block(), 6);
        assert_eq!(vitals.current_health(), 50);
    }

    #[test]
    fn test_damage_spills_into_health() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(50);
        vitals.add_block(5, &rules);

        let report = vitals.take_damage_detailed(12, &rules);
        assert_eq!(report.blocked, 5);
        assert_eq!(report.health_lost, 7);
        assert_eq!(report.total(), 12);
        assert_eq!(vitals.block(), 0);
        assert_eq!(vitals.current_health(), 43);
    }

    #[test]
    fn test_overkill_reports_consumed_only() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(10);
        vitals.set_current_health(3);
        vitals.add_block(2, &rules);

        assert_eq!(vitals.take_damage(100, &rules), 5);
        assert_eq!(vitals.current_health(), 0);
        assert!(!vitals.is_alive());

        // Dead combatants ignore further damage
        assert_eq!(vitals.take_damage(5, &rules), 0);
    }

    #[test]
    fn test_heal_is_bounded() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(20);
        assert_eq!(vitals.heal(5), 0);

        vitals.take_damage(8, &rules);
        assert_eq!(vitals.heal(5), 5);
        assert_eq!(vitals.heal(10), 3);
        assert_eq!(vitals.current_health(), 20);
        assert_eq!(vitals.heal(-4), 0);
    }

    #[test]
    fn test_health_stays_in_bounds() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(30);
        let sequence = [(7, 0), (0, 12), (40, 0), (0, 100), (3, 3), (-5, -5)];
        for (damage, heal) in sequence {
            vitals.take_damage(damage, &rules);
            assert!(vitals.current_health() >= 0);
            assert!(vitals.current_health() <= vitals.max_health());
            vitals.heal(heal);
            assert!(vitals.current_health() >= 0);
            assert!(vitals.current_health() <= vitals.max_health());
        }
    }

    #[test]
    fn test_dead_combatant_cannot_heal() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(20);
        vitals.take_damage(25, &rules);
        assert!(!vitals.is_alive());

        assert_eq!(vitals.heal(5), 0);
        assert_eq!(vitals.current_health(), 0);
        assert!(!vitals.is_alive());
    }

    #[test]
    fn test_huge_values_saturate() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(i32::MAX);

        let ritual = StatusId::new("ritual");
        assert!(vitals.apply_status(&ritual, i32::MAX, &rules));
        assert!(vitals.apply_status(&ritual, 1, &rules));
        assert_eq!(vitals.statuses().stacks(&ritual), i32::MAX);

        assert!(vitals.apply_status(&StatusId::dexterity(), 5, &rules));
        assert_eq!(vitals.add_block(i32::MAX, &rules), DEFAULT_MAX_BLOCK);

        assert!(vitals.apply_status(&StatusId::vulnerable(), 1, &rules));
        let taken = vitals.take_damage(1_000_000_000, &rules);
        assert_eq!(taken, 1_500_000_000);
        assert_eq!(vitals.block(), 0);
        assert_eq!(
            vitals.current_health(),
            i32::MAX - (1_500_000_000 - DEFAULT_MAX_BLOCK)
        );
    }

    #[test]
    fn test_clear_block() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(10);
        vitals.add_block(7, &rules);
        assert_eq!(vitals.clear_block(), 7);
        assert_eq!(vitals.block(), 0);
    }

    #[test]
    fn test_apply_status_merges() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(10);
        assert!(vitals.apply_status(&StatusId::poison(), 3, &rules));
        assert!(vitals.apply_status(&StatusId::poison(), 2, &rules));
        assert_eq!(vitals.statuses().stacks(&StatusId::poison()), 5);

        // Removing more than present clears the status
        assert!(vitals.apply_status(&StatusId::poison(), -9, &rules));
        assert!(!vitals.statuses().has(&StatusId::poison()));
    }

    #[test]
    fn test_apply_status_rejected() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(10);
        assert!(!vitals.apply_status(&StatusId::new(""), 1, &rules));
        assert!(!vitals.apply_status(&StatusId::weak(), 0, &rules));

        vitals.set_current_health(0);
        assert!(!vitals.apply_status(&StatusId::weak(), 1, &rules));
    }

    #[test]
    fn test_lose_health_ignores_block() {
        let rules = StandardRules::new();
        let mut vitals = Vitals::new(10);
        vitals.add_block(5, &rules);
        assert_eq!(vitals.lose_health(4), 4);
        assert_eq!(vitals.block(), 5);
        assert_eq!(vitals.current_health(), 6);
    }

    #[test]
    fn test_set_max_health_clamps() {
        let mut vitals = Vitals::new(80);
        vitals.set_max_health(50);
        assert_eq!(vitals.current_health(), 50);
        vitals.set_max_health(0);
        assert_eq!(vitals.max_health(), 1);
    }
}
