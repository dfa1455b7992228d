//! Live encounter state
//!
//! The combat context owns the enemies of one encounter, the cards-played
//! counters and the seeded RNG used for random targeting. It is created when
//! combat starts and dropped when combat ends; the player lives elsewhere.

use crate::core::{Combatant, Enemy, EnemyDefinition, EnemyId};
use crate::{CombatError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cell::RefCell;

/// Per-encounter container for enemies, RNG and encounter-scoped counters
///
/// Enemies are kept in insertion order: that order is the enemy-turn order
/// and the basis of index lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatContext {
    /// Enemies in turn order
    enemies: Vec<Enemy>,

    /// Cards played since the encounter started (never decreases)
    cards_played: u32,

    /// Cards played during the current player turn
    cards_played_this_turn: u32,

    /// Random number generator for targeting and selection
    ///
    /// Wrapped in RefCell so random picks work through a shared borrow.
    rng: RefCell<ChaCha12Rng>,

    /// Next enemy ID to hand out (never reused within an encounter)
    next_enemy_id: u32,
}

impl CombatContext {
    /// Create an empty context with a seeded RNG
    pub fn new(seed: u64) -> Self {
        CombatContext {
            enemies: Vec::new(),
            cards_played: 0,
            cards_played_this_turn: 0,
            rng: RefCell::new(ChaCha12Rng::seed_from_u64(seed)),
            next_enemy_id: 0,
        }
    }

    /// Reseed the RNG (for reproducible targeting)
    pub fn seed_rng(&mut self, seed: u64) {
        *self.rng.borrow_mut() = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Spawn an enemy from a definition at the end of the turn order
    ///
    /// A rejected definition consumes no id.
    pub fn spawn_enemy(&mut self, definition: &EnemyDefinition) -> Result<EnemyId> {
        let id = EnemyId::new(self.next_enemy_id);
        let enemy = Enemy::from_definition(id, definition)?;
        self.next_enemy_id += 1;
        self.enemies.push(enemy);
        Ok(id)
    }

    /// Remove an enemy, returning its former index and the enemy
    pub fn remove_enemy(&mut self, id: EnemyId) -> Option<(usize, Enemy)> {
        let index = self.enemy_index(id)?;
        Some((index, self.enemies.remove(index)))
    }

    /// Remove every dead enemy, calling `on_death` for each before it leaves
    ///
    /// Walks the list back to front so removals never shift an index that
    /// has not been visited yet. Survivors keep their relative order.
    /// Returns the number of enemies removed.
    pub fn purge_dead<F: FnMut(&Enemy)>(&mut self, mut on_death: F) -> usize {
        let mut removed = 0;
        for index in (0..self.enemies.len()).rev() {
            if !self.enemies[index].is_alive() {
                on_death(&self.enemies[index]);
                self.enemies.remove(index);
                removed += 1;
            }
        }
        removed
    }

    /// Get an enemy by ID
    pub fn get_enemy(&self, id: EnemyId) -> Result<&Enemy> {
        self.find_enemy(id)
            .ok_or(CombatError::EntityNotFound(id.as_u32()))
    }

    /// Get a mutable reference to an enemy
    pub fn get_enemy_mut(&mut self, id: EnemyId) -> Result<&mut Enemy> {
        self.find_enemy_mut(id)
            .ok_or(CombatError::EntityNotFound(id.as_u32()))
    }

    pub fn find_enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn find_enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn contains_enemy(&self, id: EnemyId) -> bool {
        self.enemy_index(id).is_some()
    }

    /// Position of an enemy in turn order
    pub fn enemy_index(&self, id: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|e| e.id == id)
    }

    pub fn enemy_at(&self, index: usize) -> Option<&Enemy> {
        self.enemies.get(index)
    }

    pub fn enemy_at_mut(&mut self, index: usize) -> Option<&mut Enemy> {
        self.enemies.get_mut(index)
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Mutable access to enemies without the ability to add or remove them
    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn alive_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// IDs of living enemies in turn order
    pub fn alive_enemy_ids(&self) -> SmallVec<[EnemyId; 8]> {
        self.enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| e.id)
            .collect()
    }

    /// Uniformly random living enemy, drawn from the context RNG
    pub fn random_alive_enemy(&self) -> Option<EnemyId> {
        let alive = self.alive_enemy_ids();
        alive.choose(&mut *self.rng.borrow_mut()).copied()
    }

    pub fn cards_played(&self) -> u32 {
        self.cards_played
    }

    pub fn cards_played_this_turn(&self) -> u32 {
        self.cards_played_this_turn
    }

    /// Count a played card; returns the combat-wide total
    pub fn increment_cards_played(&mut self) -> u32 {
        self.cards_played += 1;
        self.cards_played_this_turn += 1;
        self.cards_played
    }

    /// Reset counters scoped to a single player turn
    pub fn reset_turn_counters(&mut self) {
        self.cards_played_this_turn = 0;
    }
}
