//! Encounter state, turn structure and the combat orchestrator

/// Macro for conditional logging that avoids allocation when feature is disabled
///
/// Takes anything that derefs to a `CombatLogger`. When the verbose-logging
/// feature is disabled this becomes a no-op at compile time, eliminating the
/// format! allocations on the enemy-step hot path.
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger; // Suppress unused variable warning
        }
    };
}

pub mod context;
pub mod encounter_loop;
pub mod events;
pub mod hooks;
pub mod logger;
pub mod orchestrator;
pub mod phase;
pub mod scope;
pub mod scripted_intents;

pub use context::CombatContext;
pub use encounter_loop::{EncounterRunner, EncounterSummary, PassiveDriver, PlayerDriver};
pub use events::{CombatEvent, EventLog};
pub use hooks::{DeckHooks, IntentExecutor, NoDeck, NoIntents};
pub use logger::{CombatLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use orchestrator::{CombatConfig, CombatOrchestrator};
pub use phase::{CombatResult, EnemyTurnCursor, TurnPhase};
pub use scope::ActionScope;
pub use scripted_intents::ScriptedIntents;
