//! Mutable view of an encounter handed to hooks
//!
//! An `ActionScope` bundles the player, the combat context, the rules and the
//! event sink for the duration of one action. Intent executors and card
//! resolution act through it, so every change they make is run through the
//! rules and reported as an event. The scope can damage, heal and buff any
//! combatant but cannot add or remove enemies: membership changes are the
//! orchestrator's job.

use crate::core::{
    Combatant, CombatRules, CombatantRef, Enemy, EnemyId, Player, StatusEffects, StatusId,
};
use crate::game::{CombatContext, CombatEvent, CombatLogger, EventLog};

/// Where state-change notifications go: the event buffer and the logger
pub(crate) struct Notifier<'a> {
    pub(crate) events: &'a mut EventLog,
    pub(crate) logger: &'a CombatLogger,
}

impl<'a> Notifier<'a> {
    pub(crate) fn emit(&mut self, event: CombatEvent) {
        self.logger.event(&event);
        self.events.log(event);
    }

    fn health_change(&mut self, target: CombatantRef, old: i32, new: i32) {
        if old != new {
            self.emit(CombatEvent::HealthChanged { target, old, new });
        }
    }

    fn block_change(&mut self, target: CombatantRef, old: i32, new: i32) {
        if old != new {
            self.emit(CombatEvent::BlockChanged { target, old, new });
        }
    }

    /// Report every status whose stack count differs between two bags
    fn status_changes(
        &mut self,
        target: CombatantRef,
        before: &StatusEffects,
        after: &StatusEffects,
    ) {
        for (status, old) in before.iter() {
            let new = after.stacks(status);
            if new != old {
                self.emit(CombatEvent::StatusChanged {
                    target,
                    status: status.clone(),
                    stacks: new,
                });
            }
        }
        for (status, new) in after.iter() {
            if !before.has(status) {
                self.emit(CombatEvent::StatusChanged {
                    target,
                    status: status.clone(),
                    stacks: new,
                });
            }
        }
    }
}

// Combatant-level operations shared by the scope and the orchestrator.
// Each one mutates through the `Combatant` capability and reports the
// observable difference.

pub(crate) fn damage(
    target: &mut dyn Combatant,
    amount: i32,
    rules: &dyn CombatRules,
    notifier: &mut Notifier<'_>,
) -> i32 {
    let who = target.combatant_ref();
    let (old_hp, old_block) = (target.current_health(), target.block());
    let taken = target.take_damage(amount, rules);
    notifier.block_change(who, old_block, target.block());
    notifier.health_change(who, old_hp, target.current_health());
    taken
}

pub(crate) fn lose_health(
    target: &mut dyn Combatant,
    amount: i32,
    notifier: &mut Notifier<'_>,
) -> i32 {
    let who = target.combatant_ref();
    let old_hp = target.current_health();
    let lost = target.vitals_mut().lose_health(amount);
    notifier.health_change(who, old_hp, target.current_health());
    lost
}

pub(crate) fn heal(target: &mut dyn Combatant, amount: i32, notifier: &mut Notifier<'_>) -> i32 {
    let who = target.combatant_ref();
    let old_hp = target.current_health();
    let healed = target.heal(amount);
    notifier.health_change(who, old_hp, target.current_health());
    healed
}

pub(crate) fn add_block(
    target: &mut dyn Combatant,
    amount: i32,
    rules: &dyn CombatRules,
    notifier: &mut Notifier<'_>,
) -> i32 {
    let who = target.combatant_ref();
    let old_block = target.block();
    let gained = target.add_block(amount, rules);
    notifier.block_change(who, old_block, target.block());
    gained
}

pub(crate) fn clear_block(target: &mut dyn Combatant, notifier: &mut Notifier<'_>) -> i32 {
    let who = target.combatant_ref();
    let cleared = target.clear_block();
    notifier.block_change(who, cleared, 0);
    cleared
}

pub(crate) fn apply_status(
    target: &mut dyn Combatant,
    status: &StatusId,
    stacks: i32,
    rules: &dyn CombatRules,
    notifier: &mut Notifier<'_>,
) -> bool {
    let applied = target.apply_status(status, stacks, rules);
    if applied {
        notifier.emit(CombatEvent::StatusChanged {
            target: target.combatant_ref(),
            status: status.clone(),
            stacks: target.statuses().stacks(status),
        });
    }
    applied
}

/// Start-of-turn status processing; returns health lost
pub(crate) fn tick_turn_start(
    target: &mut dyn Combatant,
    rules: &dyn CombatRules,
    notifier: &mut Notifier<'_>,
) -> i32 {
    if !target.is_alive() {
        return 0;
    }
    let who = target.combatant_ref();
    let before = target.statuses().clone();
    let loss = rules.turn_start(target.vitals_mut().statuses_mut());
    notifier.status_changes(who, &before, target.statuses());
    lose_health(target, loss, notifier)
}

/// End-of-turn status processing
pub(crate) fn tick_turn_end(
    target: &mut dyn Combatant,
    rules: &dyn CombatRules,
    notifier: &mut Notifier<'_>,
) {
    if !target.is_alive() {
        return;
    }
    let who = target.combatant_ref();
    let before = target.statuses().clone();
    rules.turn_end(target.vitals_mut().statuses_mut());
    notifier.status_changes(who, &before, target.statuses());
}

fn combatant_mut<'s>(
    player: &'s mut Player,
    context: &'s mut CombatContext,
    target: CombatantRef,
) -> Option<&'s mut dyn Combatant> {
    match target {
        CombatantRef::Player => Some(player as &mut dyn Combatant),
        CombatantRef::Enemy(id) => context
            .find_enemy_mut(id)
            .map(|enemy| enemy as &mut dyn Combatant),
    }
}

/// Mutable view of the encounter for one acting combatant
pub struct ActionScope<'a> {
    actor: CombatantRef,
    player: &'a mut Player,
    context: &'a mut CombatContext,
    rules: &'a dyn CombatRules,
    notifier: Notifier<'a>,
}

impl<'a> ActionScope<'a> {
    pub(crate) fn new(
        actor: CombatantRef,
        player: &'a mut Player,
        context: &'a mut CombatContext,
        rules: &'a dyn CombatRules,
        events: &'a mut EventLog,
        logger: &'a CombatLogger,
    ) -> Self {
        ActionScope {
            actor,
            player,
            context,
            rules,
            notifier: Notifier { events, logger },
        }
    }

    /// The combatant this action belongs to
    pub fn actor(&self) -> CombatantRef {
        self.actor
    }

    pub fn player(&self) -> &Player {
        &*self.player
    }

    pub fn context(&self) -> &CombatContext {
        &*self.context
    }

    pub fn rules(&self) -> &dyn CombatRules {
        self.rules
    }

    pub fn logger(&self) -> &CombatLogger {
        self.notifier.logger
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.context.find_enemy(id)
    }

    /// Raw access to an enemy's bookkeeping (intent, move list)
    ///
    /// Changes made through this reference bypass the rules and emit no
    /// events; use the scope's combat methods for health, block and status.
    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.context.find_enemy_mut(id)
    }

    /// The acting enemy, if the actor is one
    pub fn actor_enemy(&self) -> Option<&Enemy> {
        match self.actor {
            CombatantRef::Enemy(id) => self.context.find_enemy(id),
            CombatantRef::Player => None,
        }
    }

    /// Random living enemy from the context RNG
    pub fn random_enemy(&self) -> Option<EnemyId> {
        self.context.random_alive_enemy()
    }

    pub fn is_alive(&self, target: CombatantRef) -> bool {
        match target {
            CombatantRef::Player => self.player.is_alive(),
            CombatantRef::Enemy(id) => self.context.find_enemy(id).is_some_and(|e| e.is_alive()),
        }
    }

    fn actor_statuses(&self) -> Option<StatusEffects> {
        match self.actor {
            CombatantRef::Player => Some(self.player.statuses().clone()),
            CombatantRef::Enemy(id) => self.context.find_enemy(id).map(|e| e.statuses().clone()),
        }
    }

    /// Damage from the actor: its outgoing modifiers apply, then the target's
    pub fn attack(&mut self, target: CombatantRef, base: i32) -> i32 {
        let amount = match self.actor_statuses() {
            Some(statuses) => self.rules.outgoing_damage(base, &statuses),
            None => base,
        };
        self.damage(target, amount)
    }

    /// Damage without the actor's modifiers (the target's still apply)
    pub fn damage(&mut self, target: CombatantRef, amount: i32) -> i32 {
        let Some(combatant) = combatant_mut(&mut *self.player, &mut *self.context, target) else {
            return 0;
        };
        damage(combatant, amount, self.rules, &mut self.notifier)
    }

    /// Attack every living enemy; returns the total damage dealt
    ///
    /// Enemies killed here stay in the context until the next purge.
    pub fn attack_all_enemies(&mut self, base: i32) -> i32 {
        self.context
            .alive_enemy_ids()
            .into_iter()
            .map(|id| self.attack(CombatantRef::Enemy(id), base))
            .fold(0, i32::saturating_add)
    }

    /// Lose health ignoring block
    pub fn lose_health(&mut self, target: CombatantRef, amount: i32) -> i32 {
        let Some(combatant) = combatant_mut(&mut *self.player, &mut *self.context, target) else {
            return 0;
        };
        lose_health(combatant, amount, &mut self.notifier)
    }

    pub fn heal(&mut self, target: CombatantRef, amount: i32) -> i32 {
        let Some(combatant) = combatant_mut(&mut *self.player, &mut *self.context, target) else {
            return 0;
        };
        heal(combatant, amount, &mut self.notifier)
    }

    pub fn add_block(&mut self, target: CombatantRef, amount: i32) -> i32 {
        let Some(combatant) = combatant_mut(&mut *self.player, &mut *self.context, target) else {
            return 0;
        };
        add_block(combatant, amount, self.rules, &mut self.notifier)
    }

    pub fn apply_status(&mut self, target: CombatantRef, status: &StatusId, stacks: i32) -> bool {
        let Some(combatant) = combatant_mut(&mut *self.player, &mut *self.context, target) else {
            return false;
        };
        apply_status(combatant, status, stacks, self.rules, &mut self.notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EnemyDefinition, PlayerId, StandardRules};

    struct Fixture {
        player: Player,
        context: CombatContext,
        rules: StandardRules,
        events: EventLog,
        logger: CombatLogger,
    }

    impl Fixture {
        fn new(enemy_hp: &[i32]) -> (Self, Vec<EnemyId>) {
            let mut context = CombatContext::new(1);
            let ids = enemy_hp
                .iter()
                .map(|&hp| context.spawn_enemy(&EnemyDefinition::new("Louse", hp)).unwrap())
                .collect();
            let fixture = Fixture {
                player: Player::new(PlayerId::new(0), "Defect", 75),
                context,
                rules: StandardRules::new(),
                events: EventLog::new(),
                logger: CombatLogger::with_verbosity(crate::game::VerbosityLevel::Silent),
            };
            (fixture, ids)
        }

        fn scope(&mut self, actor: CombatantRef) -> ActionScope<'_> {
            ActionScope::new(
                actor,
                &mut self.player,
                &mut self.context,
                &self.rules,
                &mut self.events,
                &self.logger,
            )
        }
    }

    #[test]
    fn test_attack_uses_actor_strength() {
        let (mut fx, ids) = Fixture::new(&[30]);
        fx.player.vitals.statuses_mut().set(StatusId::strength(), 2);

        let dealt = fx
            .scope(CombatantRef::Player)
            .attack(CombatantRef::Enemy(ids[0]), 6);
        assert_eq!(dealt, 8);
        assert_eq!(fx.context.get_enemy(ids[0]).unwrap().current_health(), 22);

        // Raw damage ignores the actor's strength
        let dealt = fx
            .scope(CombatantRef::Player)
            .damage(CombatantRef::Enemy(ids[0]), 6);
        assert_eq!(dealt, 6);
    }

    #[test]
    fn test_enemy_attack_reports_events() {
        let (mut fx, ids) = Fixture::new(&[30]);
        {
            let mut scope = fx.scope(CombatantRef::Enemy(ids[0]));
            scope.add_block(CombatantRef::Player, 0);
            scope.attack(CombatantRef::Player, 7);
        }
        let events = fx.events.drain();
        assert_eq!(
            events,
            vec![CombatEvent::HealthChanged {
                target: CombatantRef::Player,
                old: 75,
                new: 68
            }]
        );
    }

    #[test]
    fn test_missing_target_is_noop() {
        let (mut fx, _) = Fixture::new(&[10]);
        let ghost = CombatantRef::Enemy(EnemyId::new(42));
        let mut scope = fx.scope(CombatantRef::Player);
        assert_eq!(scope.damage(ghost, 5), 0);
        assert_eq!(scope.heal(ghost, 5), 0);
        assert_eq!(scope.add_block(ghost, 5), 0);
        assert!(!scope.apply_status(ghost, &StatusId::weak(), 1));
        assert!(!scope.is_alive(ghost));
    }

    #[test]
    fn test_heal_does_not_revive_dead_enemy() {
        let (mut fx, ids) = Fixture::new(&[5, 5]);
        {
            let mut scope = fx.scope(CombatantRef::Enemy(ids[1]));
            scope.damage(CombatantRef::Enemy(ids[0]), 5);
            assert_eq!(scope.heal(CombatantRef::Enemy(ids[0]), 5), 0);
        }
        let corpse = fx.context.get_enemy(ids[0]).unwrap();
        assert!(!corpse.is_alive());
        assert_eq!(corpse.current_health(), 0);
    }

    #[test]
    fn test_attack_all_keeps_dead_enemies() {
        let (mut fx, ids) = Fixture::new(&[3, 20, 3]);
        let total = fx.scope(CombatantRef::Player).attack_all_enemies(5);
        assert_eq!(total, 3 + 5 + 3);
        assert_eq!(fx.context.enemy_count(), 3);
        assert_eq!(fx.context.alive_enemy_count(), 1);
        assert!(fx.context.get_enemy(ids[1]).unwrap().is_alive());
    }

    #[test]
    fn test_poison_tick_reports_status_and_health() {
        let (mut fx, _) = Fixture::new(&[]);
        fx.player.vitals.statuses_mut().set(StatusId::poison(), 2);

        let mut notifier = Notifier {
            events: &mut fx.events,
            logger: &fx.logger,
        };
        let lost = tick_turn_start(&mut fx.player, &fx.rules, &mut notifier);
        assert_eq!(lost, 2);
        assert_eq!(fx.player.current_health(), 73);

        let events = fx.events.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            CombatEvent::StatusChanged { stacks: 1, .. }
        ));
    }
}
