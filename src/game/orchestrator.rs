//! Combat orchestrator
//!
//! Owns the player, the per-encounter `CombatContext` and the turn state
//! machine. Hosts drive it with explicit calls: setup, player-facing
//! mutators during the player turn, `end_player_turn`, then
//! `process_enemy_turns` once per frame until it reports completion.
//!
//! Every encounter-scoped operation is a no-op with a neutral result
//! outside combat, so host code never needs to guard its calls.

use crate::core::{
    CardId, Combatant, CombatRules, CombatantRef, Enemy, EnemyDefinition, EnemyId, Player,
    PlayerId, StandardRules, StatusId,
};
use crate::game::scope::{self, Notifier};
use crate::game::{
    ActionScope, CombatContext, CombatEvent, CombatLogger, CombatResult, DeckHooks,
    EnemyTurnCursor, EventLog, IntentExecutor, NoDeck, NoIntents, OutputFormat, TurnPhase,
    VerbosityLevel,
};
use crate::{CombatError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Settings for an orchestrator and the encounters it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Display name of the player combatant
    pub player_name: String,

    /// Maximum health the player starts with
    pub player_max_health: i32,

    /// Base seed for each encounter's RNG (None = seed from entropy)
    ///
    /// Encounter `n` (0-based) is seeded with `seed + n`, so a fixed seed
    /// replays the same sequence of encounters.
    pub seed: Option<u64>,

    pub verbosity: VerbosityLevel,
    pub output_format: OutputFormat,
}

impl CombatConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_player_max_health(mut self, max_health: i32) -> Self {
        self.player_max_health = max_health;
        self
    }

    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        CombatConfig {
            player_name: "Ironclad".to_string(),
            player_max_health: 80,
            seed: None,
            verbosity: VerbosityLevel::default(),
            output_format: OutputFormat::default(),
        }
    }
}

/// Root of the combat core: drives one encounter at a time
pub struct CombatOrchestrator {
    /// Player combatant (persists across encounters)
    player: Player,

    /// Live encounter state; present exactly while in combat
    context: Option<CombatContext>,

    /// Result of the current or most recent encounter
    result: CombatResult,

    /// UI target selection (non-owning; cleared when the enemy leaves)
    selected_target: Option<EnemyId>,

    /// Position in the current enemy-turn pass
    cursor: EnemyTurnCursor,

    phase: TurnPhase,

    /// Player turns started in the current encounter (1-based)
    turn_number: u32,

    /// Encounters started so far (used to derive per-encounter seeds)
    encounters_started: u64,

    rules: Box<dyn CombatRules>,
    intents: Box<dyn IntentExecutor>,
    deck: Box<dyn DeckHooks>,

    /// Change notifications not yet drained by the host
    events: EventLog,

    logger: CombatLogger,
    config: CombatConfig,
}

impl CombatOrchestrator {
    /// Create an orchestrator with standard rules and no-op hooks
    pub fn new(config: CombatConfig) -> Self {
        let mut logger = CombatLogger::with_verbosity(config.verbosity);
        logger.set_output_format(config.output_format);

        CombatOrchestrator {
            player: Player::new(
                PlayerId::new(0),
                config.player_name.as_str(),
                config.player_max_health,
            ),
            context: None,
            result: CombatResult::InProgress,
            selected_target: None,
            cursor: EnemyTurnCursor::idle(),
            phase: TurnPhase::OutOfCombat,
            turn_number: 0,
            encounters_started: 0,
            rules: Box::new(StandardRules::new()),
            intents: Box::new(NoIntents),
            deck: Box::new(NoDeck),
            events: EventLog::new(),
            logger,
            config,
        }
    }

    /// Replace the combat rules policy
    pub fn with_rules<R: CombatRules + 'static>(mut self, rules: R) -> Self {
        self.rules = Box::new(rules);
        self
    }

    /// Replace the enemy intent executor
    pub fn with_intents<I: IntentExecutor + 'static>(mut self, intents: I) -> Self {
        self.intents = Box::new(intents);
        self
    }

    /// Attach the deck/hand component
    pub fn with_deck<D: DeckHooks + 'static>(mut self, deck: D) -> Self {
        self.deck = Box::new(deck);
        self
    }

    /// Replace the event log (e.g. `EventLog::disabled()` for benchmarks)
    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    fn emit(&mut self, event: CombatEvent) {
        self.logger.event(&event);
        self.events.log(event);
    }

    fn next_seed(&mut self) -> u64 {
        let index = self.encounters_started;
        self.encounters_started += 1;
        match self.config.seed {
            Some(seed) => seed.wrapping_add(index),
            None => rand::random(),
        }
    }

    // ---------------------------------------------------------------------
    // Encounter lifecycle
    // ---------------------------------------------------------------------

    /// Start a new encounter with no enemies and begin the first player turn
    ///
    /// Calling this while already in combat discards the running encounter.
    pub fn start_combat(&mut self) {
        self.open_encounter(CombatContext::new(0));
        self.begin_player_turn();
    }

    /// Start a new encounter populated from enemy definitions
    ///
    /// The roster is built off to the side first, so an invalid definition
    /// leaves the orchestrator untouched.
    pub fn start_encounter(&mut self, definitions: &[EnemyDefinition]) -> Result<Vec<EnemyId>> {
        let mut context = CombatContext::new(0);
        let ids = definitions
            .iter()
            .map(|definition| context.spawn_enemy(definition))
            .collect::<Result<Vec<_>>>()?;

        self.open_encounter(context);
        for (&id, definition) in ids.iter().zip(definitions) {
            self.announce_enemy(id, definition);
        }
        self.begin_player_turn();
        Ok(ids)
    }

    fn open_encounter(&mut self, mut context: CombatContext) {
        if self.context.is_some() {
            log_if_verbose!(self.logger, "Discarding running encounter");
        }

        let seed = self.next_seed();
        context.seed_rng(seed);
        self.context = Some(context);
        self.result = CombatResult::InProgress;
        self.selected_target = None;
        self.cursor = EnemyTurnCursor::idle();
        self.phase = TurnPhase::PlayerTurn;
        self.turn_number = 0;

        let old_block = self.player.block();
        self.player.reset_for_encounter();
        if old_block != 0 {
            self.emit(CombatEvent::BlockChanged {
                target: CombatantRef::Player,
                old: old_block,
                new: 0,
            });
        }

        log_if_verbose!(self.logger, "Encounter seeded with {}", seed);
        self.emit(CombatEvent::CombatStarted);
        self.deck.on_combat_start();
    }

    /// Add an enemy to the running encounter at the end of the turn order
    pub fn spawn_enemy(&mut self, definition: &EnemyDefinition) -> Result<EnemyId> {
        let context = self.context.as_mut().ok_or(CombatError::NotInCombat)?;
        let id = context.spawn_enemy(definition)?;
        self.announce_enemy(id, definition);
        Ok(id)
    }

    fn announce_enemy(&mut self, id: EnemyId, definition: &EnemyDefinition) {
        log_if_verbose!(
            self.logger,
            "{} joins as enemy#{} ({} HP)",
            definition.name,
            id,
            definition.max_health
        );
        self.emit(CombatEvent::EnemyAdded { enemy: id });
    }

    /// End the running encounter with `result`
    ///
    /// Safe at any point, including mid enemy-turn pass. Tears down the
    /// context and clears the selection; the result stays queryable until
    /// the next encounter starts.
    pub fn end_combat(&mut self, result: CombatResult) {
        if self.context.take().is_none() {
            return;
        }

        self.result = result;
        self.phase = TurnPhase::OutOfCombat;
        self.cursor.finish();
        if self.selected_target.take().is_some() {
            self.emit(CombatEvent::TargetChanged { enemy: None });
        }

        self.logger.minimal(&format!(
            "{} - {} after {} turn(s)",
            self.player.name, result, self.turn_number
        ));
        self.emit(CombatEvent::CombatEnded { result });
        self.deck.on_combat_end(result);
    }

    /// Evaluate the encounter outcome and end combat if it is decided
    ///
    /// Defeat takes precedence over victory. Outside combat this returns the
    /// stored result of the last encounter.
    pub fn check_combat_end(&mut self) -> CombatResult {
        let Some(context) = self.context.as_ref() else {
            return self.result;
        };

        let result = if !self.player.is_alive() {
            CombatResult::Defeat
        } else if context.alive_enemy_count() == 0 {
            CombatResult::Victory
        } else {
            CombatResult::InProgress
        };

        if result.is_terminal() {
            self.end_combat(result);
        }
        result
    }

    pub fn in_combat(&self) -> bool {
        self.context.is_some()
    }

    pub fn combat_result(&self) -> CombatResult {
        self.result
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    // ---------------------------------------------------------------------
    // Turn flow
    // ---------------------------------------------------------------------

    /// Finish the player turn and arm the enemy-turn pass
    ///
    /// Returns false (and does nothing) unless it is the player's turn.
    pub fn end_player_turn(&mut self) -> bool {
        if self.context.is_none() || self.phase != TurnPhase::PlayerTurn {
            return false;
        }

        let turn = self.turn_number;
        self.emit(CombatEvent::PlayerTurnEnded { turn });
        self.deck.on_turn_end(turn);

        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        scope::tick_turn_end(&mut self.player, &*self.rules, &mut notifier);

        self.phase = TurnPhase::EnemyTurn;
        self.cursor.begin_pass();
        self.emit(CombatEvent::EnemyTurnsStarted);
        true
    }

    /// Advance the enemy-turn pass by one step
    ///
    /// Each call either processes exactly one enemy (returning false) or
    /// performs the end-of-pass bookkeeping (returning true): purge the
    /// dead, check for the end of combat and, if the encounter goes on,
    /// start the next player turn. Once the pass is complete, further calls
    /// return true without changing anything.
    pub fn process_enemy_turns(&mut self) -> bool {
        let enemy_count = match &self.context {
            Some(context) => context.enemy_count(),
            None => return true,
        };
        if !self.cursor.is_stepping() {
            return true;
        }

        let index = self.cursor.current_enemy_index;
        if index >= enemy_count {
            self.cursor.finish();
            self.purge_dead();
            if self.check_combat_end() == CombatResult::InProgress {
                self.begin_player_turn();
            }
            return true;
        }

        self.step_enemy(index);
        self.cursor.advance();
        false
    }

    /// One enemy's turn: start-of-turn tick, intent, end-of-turn tick
    fn step_enemy(&mut self, index: usize) {
        let Some(context) = self.context.as_mut() else {
            return;
        };
        let Some(enemy) = context.enemy_at_mut(index) else {
            return;
        };
        let id = enemy.id;
        if !enemy.is_alive() {
            log_if_verbose!(self.logger, "enemy#{} is dead, skipping", id);
            return;
        }

        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        scope::tick_turn_start(enemy, &*self.rules, &mut notifier);
        if !enemy.is_alive() {
            log_if_verbose!(self.logger, "enemy#{} succumbed before acting", id);
            return;
        }
        if let Some(intent) = &enemy.intent {
            log_if_verbose!(self.logger, "{} (enemy#{}) intends to {}", enemy.name, id, intent);
        }

        {
            let mut action = ActionScope::new(
                CombatantRef::Enemy(id),
                &mut self.player,
                context,
                &*self.rules,
                &mut self.events,
                &self.logger,
            );
            self.intents.execute_intent(id, &mut action);
        }

        if let Some(enemy) = context.find_enemy_mut(id) {
            let mut notifier = Notifier {
                events: &mut self.events,
                logger: &self.logger,
            };
            scope::tick_turn_end(enemy, &*self.rules, &mut notifier);
        }
        self.emit(CombatEvent::EnemyActed { enemy: id });
    }

    /// Remove every dead enemy, notifying each death before removal
    fn purge_dead(&mut self) -> usize {
        let Some(context) = self.context.as_mut() else {
            return 0;
        };
        let selected = &mut self.selected_target;
        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };

        context.purge_dead(|enemy| {
            log_if_verbose!(notifier.logger, "{} (enemy#{}) dies", enemy.name, enemy.id);
            notifier.emit(CombatEvent::EnemyDied { enemy: enemy.id });
            notifier.emit(CombatEvent::EnemyRemoved { enemy: enemy.id });
            if *selected == Some(enemy.id) {
                *selected = None;
                notifier.emit(CombatEvent::TargetChanged { enemy: None });
            }
        })
    }

    /// Begin a player turn: clear block, reset turn counters, run hooks
    fn begin_player_turn(&mut self) {
        let Some(context) = self.context.as_mut() else {
            return;
        };
        context.reset_turn_counters();
        self.phase = TurnPhase::PlayerTurn;
        self.turn_number += 1;
        let turn = self.turn_number;

        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        notifier.emit(CombatEvent::PlayerTurnStarted { turn });
        scope::clear_block(&mut self.player, &mut notifier);
        scope::tick_turn_start(&mut self.player, &*self.rules, &mut notifier);

        self.deck.on_turn_start(turn);

        if !self.player.is_alive() {
            self.check_combat_end();
        }
    }

    /// Index of the next enemy to act in the current pass
    pub fn current_enemy_index(&self) -> usize {
        self.cursor.current_enemy_index
    }

    pub fn enemy_turns_complete(&self) -> bool {
        self.cursor.enemy_turns_complete
    }

    pub fn cursor(&self) -> EnemyTurnCursor {
        self.cursor
    }

    // ---------------------------------------------------------------------
    // Player mutators
    // ---------------------------------------------------------------------

    /// Damage the player (block first); returns block + health consumed
    pub fn damage_player(&mut self, amount: i32) -> i32 {
        if self.context.is_none() {
            return 0;
        }
        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        scope::damage(&mut self.player, amount, &*self.rules, &mut notifier)
    }

    /// Heal the player; allowed between encounters as well
    pub fn heal_player(&mut self, amount: i32) -> i32 {
        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        scope::heal(&mut self.player, amount, &mut notifier)
    }

    pub fn add_player_block(&mut self, amount: i32) -> i32 {
        if self.context.is_none() {
            return 0;
        }
        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        scope::add_block(&mut self.player, amount, &*self.rules, &mut notifier)
    }

    pub fn apply_status_to_player(&mut self, status: &StatusId, stacks: i32) -> bool {
        if self.context.is_none() {
            return false;
        }
        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        scope::apply_status(&mut self.player, status, stacks, &*self.rules, &mut notifier)
    }

    /// Change the player's maximum health (current health is clamped)
    pub fn set_player_max_health(&mut self, max_health: i32) {
        let old_hp = self.player.current_health();
        self.player.vitals.set_max_health(max_health);
        let new_hp = self.player.current_health();
        if old_hp != new_hp {
            self.emit(CombatEvent::HealthChanged {
                target: CombatantRef::Player,
                old: old_hp,
                new: new_hp,
            });
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_health(&self) -> i32 {
        self.player.current_health()
    }

    pub fn player_max_health(&self) -> i32 {
        self.player.max_health()
    }

    pub fn player_block(&self) -> i32 {
        self.player.block()
    }

    // ---------------------------------------------------------------------
    // Enemy mutators
    // ---------------------------------------------------------------------

    /// Damage one enemy (its block first); dead enemies stay until purged
    pub fn damage_enemy(&mut self, enemy: EnemyId, amount: i32) -> i32 {
        let Some(target) = self.context.as_mut().and_then(|c| c.find_enemy_mut(enemy)) else {
            return 0;
        };
        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        scope::damage(target, amount, &*self.rules, &mut notifier)
    }

    pub fn apply_status_to_enemy(
        &mut self,
        enemy: EnemyId,
        status: &StatusId,
        stacks: i32,
    ) -> bool {
        let Some(target) = self.context.as_mut().and_then(|c| c.find_enemy_mut(enemy)) else {
            return false;
        };
        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        scope::apply_status(target, status, stacks, &*self.rules, &mut notifier)
    }

    /// Damage every living enemy; returns the total damage dealt
    ///
    /// Enemies killed here are not removed until the next purge.
    pub fn damage_all_enemies(&mut self, amount: i32) -> i32 {
        let Some(context) = self.context.as_mut() else {
            return 0;
        };
        let mut notifier = Notifier {
            events: &mut self.events,
            logger: &self.logger,
        };
        context
            .enemies_mut()
            .iter_mut()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| scope::damage(enemy, amount, &*self.rules, &mut notifier))
            .fold(0, i32::saturating_add)
    }

    /// Remove an enemy from the encounter
    ///
    /// Clears the selection if it pointed at this enemy and keeps a running
    /// enemy-turn pass on the same logical enemy. Returns false if the enemy
    /// is not in the encounter.
    pub fn remove_enemy(&mut self, enemy: EnemyId) -> bool {
        let Some(context) = self.context.as_mut() else {
            return false;
        };
        let Some((index, removed)) = context.remove_enemy(enemy) else {
            return false;
        };

        self.cursor.on_enemy_removed(index);
        let was_selected = self.selected_target == Some(enemy);
        if was_selected {
            self.selected_target = None;
        }

        log_if_verbose!(self.logger, "{} (enemy#{}) removed", removed.name, enemy);
        if !removed.is_alive() {
            self.emit(CombatEvent::EnemyDied { enemy });
        }
        self.emit(CombatEvent::EnemyRemoved { enemy });
        if was_selected {
            self.emit(CombatEvent::TargetChanged { enemy: None });
        }
        true
    }

    pub fn enemies(&self) -> &[Enemy] {
        match &self.context {
            Some(context) => context.enemies(),
            None => &[],
        }
    }

    pub fn enemy(&self, enemy: EnemyId) -> Option<&Enemy> {
        self.context.as_ref()?.find_enemy(enemy)
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies().len()
    }

    pub fn alive_enemy_count(&self) -> usize {
        self.context
            .as_ref()
            .map_or(0, CombatContext::alive_enemy_count)
    }

    /// Living enemy IDs in turn order
    pub fn alive_enemy_ids(&self) -> SmallVec<[EnemyId; 8]> {
        self.context
            .as_ref()
            .map(CombatContext::alive_enemy_ids)
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Targeting
    // ---------------------------------------------------------------------

    /// Select (or clear) the UI target; ignored outside combat
    pub fn set_selected_target(&mut self, enemy: Option<EnemyId>) {
        if self.context.is_none() || self.selected_target == enemy {
            return;
        }
        self.selected_target = enemy;
        self.emit(CombatEvent::TargetChanged { enemy });
    }

    pub fn get_selected_target(&self) -> Option<EnemyId> {
        self.selected_target
    }

    /// Uniformly random living enemy from the encounter RNG
    pub fn get_random_enemy(&self) -> Option<EnemyId> {
        self.context.as_ref()?.random_alive_enemy()
    }

    // ---------------------------------------------------------------------
    // Cards
    // ---------------------------------------------------------------------

    /// Play a card through the deck hooks
    ///
    /// Only legal during a player turn with the player alive. Returns false
    /// if the play was illegal or the deck refused to resolve the card.
    pub fn play_card(&mut self, card: CardId, target: Option<EnemyId>) -> bool {
        if self.phase != TurnPhase::PlayerTurn || !self.player.is_alive() {
            return false;
        }
        let Some(context) = self.context.as_mut() else {
            return false;
        };

        log_if_verbose!(self.logger, "Playing {}", card);
        let resolved = {
            let mut action = ActionScope::new(
                CombatantRef::Player,
                &mut self.player,
                context,
                &*self.rules,
                &mut self.events,
                &self.logger,
            );
            self.deck.resolve_card(card, target, &mut action)
        };
        if !resolved {
            log_if_verbose!(self.logger, "{} could not be played", card);
            return false;
        }

        self.increment_cards_played();
        true
    }

    /// Count a played card and notify the deck; returns the combat total
    pub fn increment_cards_played(&mut self) -> u32 {
        let Some(context) = self.context.as_mut() else {
            return 0;
        };
        let total = context.increment_cards_played();
        self.emit(CombatEvent::CardPlayed { total });
        self.deck.on_card_played(total);
        total
    }

    pub fn cards_played(&self) -> u32 {
        self.context.as_ref().map_or(0, CombatContext::cards_played)
    }

    pub fn cards_played_this_turn(&self) -> u32 {
        self.context
            .as_ref()
            .map_or(0, CombatContext::cards_played_this_turn)
    }

    // ---------------------------------------------------------------------
    // Events, logging and configuration
    // ---------------------------------------------------------------------

    /// Take every change notification emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain()
    }

    pub fn events(&self) -> &[CombatEvent] {
        self.events.events()
    }

    pub fn logger(&self) -> &CombatLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut CombatLogger {
        &mut self.logger
    }

    pub fn context(&self) -> Option<&CombatContext> {
        self.context.as_ref()
    }

    pub fn rules(&self) -> &dyn CombatRules {
        &*self.rules
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }
}

impl Default for CombatOrchestrator {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}

impl std::fmt::Debug for CombatOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatOrchestrator")
            .field("player", &self.player)
            .field("context", &self.context)
            .field("result", &self.result)
            .field("selected_target", &self.selected_target)
            .field("cursor", &self.cursor)
            .field("phase", &self.phase)
            .field("turn_number", &self.turn_number)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every enemy hits the player for a fixed amount
    struct AttackPlayer(i32);

    impl IntentExecutor for AttackPlayer {
        fn execute_intent(&mut self, _enemy: EnemyId, scope: &mut ActionScope<'_>) {
            scope.attack(CombatantRef::Player, self.0);
        }
    }

    fn quiet_config() -> CombatConfig {
        CombatConfig::default()
            .with_seed(42)
            .with_verbosity(VerbosityLevel::Silent)
    }

    fn orchestrator_with(hp: &[i32], attack: i32) -> (CombatOrchestrator, Vec<EnemyId>) {
        let mut combat = CombatOrchestrator::new(quiet_config()).with_intents(AttackPlayer(attack));
        let roster: Vec<EnemyDefinition> = hp
            .iter()
            .map(|&h| EnemyDefinition::new("Jaw Worm", h))
            .collect();
        let ids = combat.start_encounter(&roster).unwrap();
        (combat, ids)
    }

    fn run_pass(combat: &mut CombatOrchestrator) -> usize {
        let mut steps = 0;
        while !combat.process_enemy_turns() {
            steps += 1;
        }
        steps
    }

    #[test]
    fn test_start_encounter() {
        let (combat, ids) = orchestrator_with(&[40, 12], 0);
        assert!(combat.in_combat());
        assert_eq!(combat.combat_result(), CombatResult::InProgress);
        assert_eq!(combat.phase(), TurnPhase::PlayerTurn);
        assert_eq!(combat.turn_number(), 1);
        assert_eq!(combat.enemy_count(), 2);
        assert_eq!(combat.enemy(ids[1]).unwrap().current_health(), 12);
        assert_eq!(combat.player_health(), 80);
    }

    #[test]
    fn test_invalid_roster_leaves_state_untouched() {
        let mut combat = CombatOrchestrator::new(quiet_config());
        let roster = vec![
            EnemyDefinition::new("Cultist", 48),
            EnemyDefinition::new("Broken", 0),
        ];
        assert!(matches!(
            combat.start_encounter(&roster),
            Err(CombatError::InvalidDefinition(_))
        ));
        assert!(!combat.in_combat());
        assert!(combat.drain_events().is_empty());
    }

    #[test]
    fn test_spawn_requires_combat() {
        let mut combat = CombatOrchestrator::new(quiet_config());
        assert!(matches!(
            combat.spawn_enemy(&EnemyDefinition::new("Louse", 10)),
            Err(CombatError::NotInCombat)
        ));
    }

    #[test]
    fn test_enemy_pass_steps_one_enemy_per_call() {
        let (mut combat, _) = orchestrator_with(&[20, 20, 20], 4);
        assert!(combat.end_player_turn());
        assert_eq!(combat.phase(), TurnPhase::EnemyTurn);

        assert!(!combat.process_enemy_turns());
        assert_eq!(combat.current_enemy_index(), 1);
        assert_eq!(combat.player_health(), 76);

        assert!(!combat.process_enemy_turns());
        assert!(!combat.process_enemy_turns());
        assert_eq!(combat.player_health(), 68);
        assert_eq!(combat.turn_number(), 1);

        // End-of-pass bookkeeping happens on its own call
        assert!(combat.process_enemy_turns());
        assert!(combat.enemy_turns_complete());
        assert_eq!(combat.turn_number(), 2);
        assert_eq!(combat.phase(), TurnPhase::PlayerTurn);
    }

    #[test]
    fn test_completion_is_idempotent() {
        let (mut combat, _) = orchestrator_with(&[20, 20], 1);
        combat.end_player_turn();
        run_pass(&mut combat);

        let index = combat.current_enemy_index();
        let hp = combat.player_health();
        for _ in 0..5 {
            assert!(combat.process_enemy_turns());
        }
        assert_eq!(combat.current_enemy_index(), index);
        assert_eq!(combat.player_health(), hp);
        assert_eq!(combat.turn_number(), 2);
    }

    #[test]
    fn test_end_player_turn_only_in_player_turn() {
        let (mut combat, _) = orchestrator_with(&[20], 1);
        assert!(combat.end_player_turn());
        assert!(!combat.end_player_turn());

        let mut idle = CombatOrchestrator::new(quiet_config());
        assert!(!idle.end_player_turn());
        assert!(idle.process_enemy_turns());
    }

    #[test]
    fn test_block_cleared_at_player_turn_start() {
        let (mut combat, _) = orchestrator_with(&[20, 20], 5);
        assert_eq!(combat.add_player_block(12), 12);
        combat.end_player_turn();
        run_pass(&mut combat);

        // Both attacks were absorbed, the leftover block is gone
        assert_eq!(combat.player_health(), 80);
        assert_eq!(combat.player_block(), 0);
    }

    #[test]
    fn test_victory_after_pass() {
        let (mut combat, ids) = orchestrator_with(&[1], 3);
        assert_eq!(combat.damage_enemy(ids[0], 5), 1);
        assert!(!combat.enemy(ids[0]).unwrap().is_alive());

        combat.end_player_turn();
        assert!(!combat.process_enemy_turns()); // dead enemy skipped
        assert!(combat.process_enemy_turns());

        assert_eq!(combat.combat_result(), CombatResult::Victory);
        assert!(!combat.in_combat());
        assert_eq!(combat.player_health(), 80);
        assert_eq!(combat.check_combat_end(), CombatResult::Victory);
    }

    #[test]
    fn test_defeat_wins_over_victory() {
        let (mut combat, ids) = orchestrator_with(&[5], 0);
        combat.damage_enemy(ids[0], 5);
        combat.damage_player(80);
        assert_eq!(combat.check_combat_end(), CombatResult::Defeat);
        assert!(!combat.in_combat());
    }

    #[test]
    fn test_end_combat_mid_pass() {
        let (mut combat, ids) = orchestrator_with(&[20, 20, 20], 1);
        combat.set_selected_target(Some(ids[2]));
        combat.end_player_turn();
        combat.process_enemy_turns();

        combat.end_combat(CombatResult::Escape);
        assert!(!combat.in_combat());
        assert_eq!(combat.get_selected_target(), None);
        assert_eq!(combat.combat_result(), CombatResult::Escape);
        assert!(combat.process_enemy_turns());
        assert_eq!(combat.enemy_count(), 0);

        // A new encounter resets the cursor and the result
        combat.start_encounter(&[EnemyDefinition::new("Louse", 10)]).unwrap();
        assert!(combat.enemy_turns_complete());
        assert_eq!(combat.combat_result(), CombatResult::InProgress);
        assert_eq!(combat.turn_number(), 1);
    }

    #[test]
    fn test_remove_enemy_during_pass_keeps_cursor() {
        let (mut combat, ids) = orchestrator_with(&[20, 20, 20], 2);
        combat.end_player_turn();
        combat.process_enemy_turns();
        combat.process_enemy_turns();
        assert_eq!(combat.current_enemy_index(), 2);

        // Removing an enemy that already acted keeps the third one next
        assert!(combat.remove_enemy(ids[0]));
        assert_eq!(combat.current_enemy_index(), 1);
        assert!(!combat.process_enemy_turns());
        assert_eq!(combat.player_health(), 74);
        assert!(combat.process_enemy_turns());
        assert_eq!(combat.enemy_count(), 2);
    }

    #[test]
    fn test_remove_clears_selection() {
        let (mut combat, ids) = orchestrator_with(&[20, 20], 0);
        combat.set_selected_target(Some(ids[1]));
        assert_eq!(combat.get_selected_target(), Some(ids[1]));

        assert!(combat.remove_enemy(ids[1]));
        assert_eq!(combat.get_selected_target(), None);
        assert!(!combat.remove_enemy(ids[1]));
    }

    #[test]
    fn test_poisoned_enemy_dies_before_acting() {
        let (mut combat, ids) = orchestrator_with(&[3, 20], 6);
        combat.apply_status_to_enemy(ids[0], &StatusId::poison(), 5);
        combat.end_player_turn();
        run_pass(&mut combat);

        assert_eq!(combat.player_health(), 74);
        assert_eq!(combat.enemy_count(), 1);
        assert_eq!(combat.enemies()[0].id, ids[1]);
    }

    #[test]
    fn test_purge_emits_death_then_removal() {
        let (mut combat, ids) = orchestrator_with(&[5, 20], 0);
        combat.set_selected_target(Some(ids[0]));
        combat.damage_enemy(ids[0], 10);
        combat.drain_events();

        combat.end_player_turn();
        run_pass(&mut combat);
        let events = combat.drain_events();

        let died = events
            .iter()
            .position(|e| *e == CombatEvent::EnemyDied { enemy: ids[0] })
            .unwrap();
        assert_eq!(events[died + 1], CombatEvent::EnemyRemoved { enemy: ids[0] });
        assert_eq!(events[died + 2], CombatEvent::TargetChanged { enemy: None });
        assert_eq!(combat.get_selected_target(), None);
    }

    #[test]
    fn test_noops_outside_combat() {
        let mut combat = CombatOrchestrator::new(quiet_config());
        let ghost = EnemyId::new(0);
        assert_eq!(combat.damage_enemy(ghost, 5), 0);
        assert_eq!(combat.damage_player(5), 0);
        assert_eq!(combat.add_player_block(5), 0);
        assert_eq!(combat.damage_all_enemies(5), 0);
        assert!(!combat.apply_status_to_player(&StatusId::weak(), 1));
        assert!(!combat.remove_enemy(ghost));
        assert!(!combat.play_card(CardId::new(1), None));
        assert_eq!(combat.increment_cards_played(), 0);
        assert_eq!(combat.get_random_enemy(), None);
        combat.set_selected_target(Some(ghost));
        assert_eq!(combat.get_selected_target(), None);
        assert_eq!(combat.player_health(), 80);
    }

    #[test]
    fn test_heal_between_encounters() {
        let (mut combat, _) = orchestrator_with(&[5], 0);
        combat.damage_player(30);
        combat.end_combat(CombatResult::Victory);
        assert_eq!(combat.heal_player(10), 10);
        assert_eq!(combat.player_health(), 60);
    }

    #[test]
    fn test_damage_all_enemies_skips_dead() {
        let (mut combat, ids) = orchestrator_with(&[4, 10, 4], 0);
        combat.damage_enemy(ids[0], 4);
        assert_eq!(combat.damage_all_enemies(6), 6 + 4);
        assert_eq!(combat.enemy_count(), 3);
        assert_eq!(combat.alive_enemy_count(), 1);
    }

    #[test]
    fn test_play_card_counts() {
        struct Strike;
        impl DeckHooks for Strike {
            fn resolve_card(
                &mut self,
                _card: CardId,
                target: Option<EnemyId>,
                scope: &mut ActionScope<'_>,
            ) -> bool {
                match target {
                    Some(enemy) => {
                        scope.attack(CombatantRef::Enemy(enemy), 6);
                        true
                    }
                    None => false,
                }
            }
        }

        let (combat, ids) = orchestrator_with(&[20], 0);
        let mut combat = combat.with_deck(Strike);
        assert!(combat.play_card(CardId::new(1), Some(ids[0])));
        assert!(!combat.play_card(CardId::new(2), None));
        assert_eq!(combat.enemy(ids[0]).unwrap().current_health(), 14);
        assert_eq!(combat.cards_played(), 1);
        assert_eq!(combat.cards_played_this_turn(), 1);

        combat.end_player_turn();
        assert!(!combat.play_card(CardId::new(3), Some(ids[0])));
        run_pass(&mut combat);
        assert_eq!(combat.cards_played_this_turn(), 0);
        assert_eq!(combat.cards_played(), 1);
    }

    #[test]
    fn test_seeded_encounters_repeat() {
        let picks = |combat: &CombatOrchestrator| -> Vec<Option<EnemyId>> {
            (0..12).map(|_| combat.get_random_enemy()).collect()
        };
        let (a, _) = orchestrator_with(&[5, 5, 5, 5], 0);
        let (b, _) = orchestrator_with(&[5, 5, 5, 5], 0);
        assert_eq!(picks(&a), picks(&b));
    }
}
