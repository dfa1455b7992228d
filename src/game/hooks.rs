//! Boundary traits for the components around the combat core
//!
//! The core decides *when* things happen; these hooks decide *what*
//! happens. An intent executor carries out an enemy's turn, and the deck
//! hooks own everything about cards (draw, energy, discard, effects).

use crate::core::{CardId, EnemyId};
use crate::game::{ActionScope, CombatResult};

/// Executes an enemy's intent on its turn
///
/// Called once per living enemy per enemy-turn pass. The executor may
/// damage, heal or buff any combatant through the scope, but has no way to
/// add or remove enemies; dead enemies are purged by the core after the
/// pass.
pub trait IntentExecutor {
    fn execute_intent(&mut self, enemy: EnemyId, scope: &mut ActionScope<'_>);
}

/// Intent executor that does nothing (enemies skip their turns)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIntents;

impl IntentExecutor for NoIntents {
    fn execute_intent(&mut self, _enemy: EnemyId, _scope: &mut ActionScope<'_>) {}
}

/// Callbacks into the external deck/hand component
///
/// All methods have empty defaults so an implementation only overrides
/// the turn boundaries it cares about.
pub trait DeckHooks {
    /// A new encounter started (build the draw pile)
    fn on_combat_start(&mut self) {}

    /// A player turn began (draw, reset energy)
    fn on_turn_start(&mut self, _turn: u32) {}

    /// The player ended their turn (discard hand)
    fn on_turn_end(&mut self, _turn: u32) {}

    /// Resolve a card's effects; return false if the card cannot be played
    fn resolve_card(
        &mut self,
        _card: CardId,
        _target: Option<EnemyId>,
        _scope: &mut ActionScope<'_>,
    ) -> bool {
        true
    }

    /// A card was counted as played; `total` is the combat-wide count
    fn on_card_played(&mut self, _total: u32) {}

    /// The encounter finished with `result`
    fn on_combat_end(&mut self, _result: CombatResult) {}
}

/// Deck hooks that ignore every callback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeck;

impl DeckHooks for NoDeck {}
