//! Turn rules: the battle state machine, the enemy phase and pacing.
//!
//! `Battle` drives every phase of a turn and is the only entry point the UI
//! needs. The enemy phase and pacing hooks are exposed for scripted
//! encounters and tests.

pub mod engine;
pub mod enemy;
pub mod pacing;

pub use engine::{Battle, TurnPhase, TurnSummary};
pub use enemy::{enemy_act, run_enemy_actions, tick_statuses, EnemyAttack};
pub use pacing::{Beat, FixedPacing, NoPacing, Pacer};
