//! Performance benchmarks for the combat engine
//!
//! Measures full encounters (scripted enemies vs. a simple striking driver)
//! using Criterion.rs, with the event log enabled and disabled. Build with
//! `--no-default-features` to also compile verbose logging away.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spire_combat::{
    core::{EnemyDefinition, Intent, StatusId},
    game::{
        CombatConfig, CombatOrchestrator, EncounterRunner, EncounterSummary, EventLog,
        PlayerDriver, ScriptedIntents, VerbosityLevel,
    },
};

/// Strikes a random enemy three times per turn
struct Striker;

impl PlayerDriver for Striker {
    fn take_turn(&mut self, combat: &mut CombatOrchestrator) {
        for _ in 0..3 {
            let Some(target) = combat.get_random_enemy() else {
                break;
            };
            combat.damage_enemy(target, 6);
            combat.increment_cards_played();
        }
    }
}

fn roster(enemies: usize) -> Vec<EnemyDefinition> {
    (0..enemies)
        .map(|i| {
            EnemyDefinition::new(format!("Louse {}", i), 30)
                .with_move(Intent::Attack { damage: 1, hits: 2 })
                .with_move(Intent::Debuff {
                    status: StatusId::weak(),
                    stacks: 1,
                })
                .with_move(Intent::Defend { block: 3 })
        })
        .collect()
}

fn run_encounter(seed: u64, enemies: &[EnemyDefinition], events: bool) -> EncounterSummary {
    let config = CombatConfig::default()
        .with_seed(seed)
        .with_player_max_health(500)
        .with_verbosity(VerbosityLevel::Silent);
    let log = if events {
        EventLog::new()
    } else {
        EventLog::disabled()
    };
    let mut combat = CombatOrchestrator::new(config)
        .with_intents(ScriptedIntents::new())
        .with_event_log(log);

    combat
        .start_encounter(enemies)
        .expect("benchmark roster is valid");
    EncounterRunner::new(&mut combat)
        .with_max_turns(200)
        .run(&mut Striker)
        .expect("encounter is active")
}

/// Benchmark full encounters for several roster sizes
fn bench_encounter(c: &mut Criterion) {
    let mut group = c.benchmark_group("encounter");

    for &size in &[1usize, 3, 5] {
        let enemies = roster(size);

        // Print metrics for one run so the numbers have context
        let summary = run_encounter(42, &enemies, true);
        println!(
            "{} enemies: {} after {} turns, {} enemy steps, {} cards",
            size, summary.result, summary.turns, summary.steps, summary.cards_played
        );

        group.bench_with_input(BenchmarkId::new("events_on", size), &enemies, |b, enemies| {
            b.iter(|| run_encounter(black_box(42), enemies, true));
        });
        group.bench_with_input(BenchmarkId::new("events_off", size), &enemies, |b, enemies| {
            b.iter(|| run_encounter(black_box(42), enemies, false));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encounter);
criterion_main!(benches);
