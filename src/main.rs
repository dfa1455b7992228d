//! Spire Combat - Main Binary
//!
//! Headless encounter simulator for the combat engine

use clap::{Parser, Subcommand, ValueEnum};
use rustc_hash::FxHashMap;
use spire_combat::{
    core::{CardId, Combatant, CombatantRef, EnemyDefinition, EnemyId, Intent, StatusId},
    game::{
        ActionScope, CombatConfig, CombatOrchestrator, DeckHooks, EncounterRunner, EventLog,
        OutputFormat, PlayerDriver, ScriptedIntents, VerbosityLevel,
    },
    CombatError, Result,
};

const STRIKE: CardId = CardId::new(1);
const DEFEND: CardId = CardId::new(2);

/// Verbosity level for combat output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

/// Output format for combat logs
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Built-in enemies selectable by name
fn enemy_presets() -> FxHashMap<&'static str, EnemyDefinition> {
    let mut presets = FxHashMap::default();
    presets.insert(
        "cultist",
        EnemyDefinition::new("Cultist", 48)
            .with_move(Intent::Buff {
                status: StatusId::strength(),
                stacks: 3,
            })
            .with_move(Intent::Attack { damage: 6, hits: 1 }),
    );
    presets.insert(
        "jaw_worm",
        EnemyDefinition::new("Jaw Worm", 42)
            .with_move(Intent::Attack { damage: 11, hits: 1 })
            .with_move(Intent::AttackDefend { damage: 7, block: 5 })
            .with_move(Intent::Buff {
                status: StatusId::strength(),
                stacks: 3,
            }),
    );
    presets.insert(
        "louse",
        EnemyDefinition::new("Louse", 12)
            .with_move(Intent::Attack { damage: 6, hits: 1 })
            .with_move(Intent::Debuff {
                status: StatusId::weak(),
                stacks: 2,
            }),
    );
    presets.insert(
        "slime",
        EnemyDefinition::new("Acid Slime", 28)
            .with_move(Intent::Attack { damage: 3, hits: 2 })
            .with_move(Intent::Debuff {
                status: StatusId::vulnerable(),
                stacks: 1,
            }),
    );
    presets
}

/// Enemy argument: a preset name or `NAME:HP[:ATTACK]`
#[derive(Debug, Clone)]
struct EnemyArg(EnemyDefinition);

impl std::str::FromStr for EnemyArg {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let definition = match parts.as_slice() {
            [name] => enemy_presets()
                .remove(name.to_lowercase().as_str())
                .ok_or_else(|| CombatError::ParseError(format!("unknown enemy preset '{name}'")))?,
            [name, hp] => EnemyDefinition::new(*name, parse_number(hp, s)?)
                .with_move(Intent::Attack { damage: 6, hits: 1 }),
            [name, hp, attack] => EnemyDefinition::new(*name, parse_number(hp, s)?).with_move(
                Intent::Attack {
                    damage: parse_number(attack, s)?,
                    hits: 1,
                },
            ),
            _ => {
                return Err(CombatError::ParseError(format!(
                    "invalid enemy '{s}' (expected NAME or NAME:HP[:ATTACK])"
                )))
            }
        };
        definition.validate()?;
        Ok(EnemyArg(definition))
    }
}

fn parse_number(field: &str, input: &str) -> Result<i32> {
    field.parse().map_err(|_| {
        CombatError::ParseError(format!("invalid number '{field}' in enemy '{input}'"))
    })
}

#[derive(Parser)]
#[command(name = "combat")]
#[command(about = "Spire Combat - turn-based deckbuilder combat engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one encounter with a starter deck and scripted enemies
    Simulate {
        /// Enemy to fight: a preset (cultist, jaw_worm, louse, slime) or NAME:HP[:ATTACK]
        #[arg(long = "enemy", short = 'e', value_name = "ENEMY")]
        enemies: Vec<EnemyArg>,

        /// Player maximum health
        #[arg(long, default_value_t = 80)]
        player_hp: i32,

        /// Set random seed for deterministic runs
        #[arg(long)]
        seed: Option<u64>,

        /// Turns after which the player escapes
        #[arg(long, default_value_t = 50)]
        max_turns: u32,

        /// Verbosity level for combat output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Log output format
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,
    },
}

/// Starter deck: strikes and defends paid from three energy per turn
#[derive(Debug, Default)]
struct StarterDeck {
    energy: u32,
}

impl DeckHooks for StarterDeck {
    fn on_turn_start(&mut self, _turn: u32) {
        self.energy = 3;
    }

    fn resolve_card(
        &mut self,
        card: CardId,
        target: Option<EnemyId>,
        scope: &mut ActionScope<'_>,
    ) -> bool {
        if self.energy == 0 {
            return false;
        }
        match card {
            STRIKE => {
                let Some(enemy) = target.or_else(|| scope.random_enemy()) else {
                    return false;
                };
                scope.attack(CombatantRef::Enemy(enemy), 6);
            }
            DEFEND => {
                scope.add_block(CombatantRef::Player, 5);
            }
            _ => return false,
        }
        self.energy -= 1;
        true
    }
}

/// Defends against big incoming attacks, otherwise strikes the weakest enemy
struct StarterDriver;

impl StarterDriver {
    fn incoming_damage(combat: &CombatOrchestrator) -> i32 {
        combat
            .enemies()
            .iter()
            .filter(|enemy| enemy.is_alive())
            .filter_map(|enemy| match &enemy.intent {
                Some(Intent::Attack { damage, hits }) => {
                    Some(damage.saturating_mul(i32::from(*hits)))
                }
                Some(Intent::AttackDefend { damage, .. }) => Some(*damage),
                _ => None,
            })
            .fold(0, i32::saturating_add)
    }

    fn weakest_enemy(combat: &CombatOrchestrator) -> Option<EnemyId> {
        combat
            .enemies()
            .iter()
            .filter(|enemy| enemy.is_alive())
            .min_by_key(|enemy| enemy.current_health())
            .map(|enemy| enemy.id)
    }
}

impl PlayerDriver for StarterDriver {
    fn take_turn(&mut self, combat: &mut CombatOrchestrator) {
        for _ in 0..3 {
            if Self::incoming_damage(combat) > combat.player_block().saturating_add(5) {
                if combat.play_card(DEFEND, None) {
                    continue;
                }
                break;
            }

            let Some(target) = Self::weakest_enemy(combat) else {
                break;
            };
            combat.set_selected_target(Some(target));
            if !combat.play_card(STRIKE, Some(target)) {
                break;
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            enemies,
            player_hp,
            seed,
            max_turns,
            verbosity,
            format,
        } => run_simulate(enemies, player_hp, seed, max_turns, verbosity, format)?,
    }

    Ok(())
}

fn run_simulate(
    enemies: Vec<EnemyArg>,
    player_hp: i32,
    seed: Option<u64>,
    max_turns: u32,
    verbosity: VerbosityArg,
    format: FormatArg,
) -> Result<()> {
    let mut config = CombatConfig::default()
        .with_player_max_health(player_hp)
        .with_verbosity(verbosity.into())
        .with_output_format(format.into());
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let mut roster: Vec<EnemyDefinition> = enemies.into_iter().map(|arg| arg.0).collect();
    if roster.is_empty() {
        roster.extend(enemy_presets().remove("jaw_worm"));
    }

    // Only the summary and the log are reported, so events are not kept
    let mut combat = CombatOrchestrator::new(config)
        .with_intents(ScriptedIntents::new())
        .with_deck(StarterDeck::default())
        .with_event_log(EventLog::disabled());
    combat.start_encounter(&roster)?;

    let summary = EncounterRunner::new(&mut combat)
        .with_max_turns(max_turns)
        .run(&mut StarterDriver)?;

    match format {
        FormatArg::Json => println!("{}", serde_json::to_string(&summary)?),
        FormatArg::Text => {
            println!("=== Encounter Complete ===");
            println!("Result: {}", summary.result);
            println!("Turns: {}", summary.turns);
            println!("Cards played: {}", summary.cards_played);
            println!("Enemy steps: {}", summary.steps);
            println!(
                "Player health: {}/{}",
                combat.player_health(),
                combat.player_max_health()
            );
        }
    }

    Ok(())
}
