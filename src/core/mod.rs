//! Core engine types: combatants, combat state, commands, RNG, configuration,
//! errors.
//!
//! Everything the rest of the engine builds on. Nothing in here knows about
//! cards beyond their IDs.

pub mod entity;
pub mod rng;
pub mod config;
pub mod error;
pub mod action;
pub mod state;

pub use entity::{CombatEntity, Combatant, DamageOutcome, EnemySlot, EntityKind, Role, StatusBlock};
pub use rng::GameRng;
pub use config::{BattleConfig, PacingConfig, PartyMemberConfig, SELECTION_SLOTS};
pub use error::{CommandError, DrawError, EffectError, EnemyActionError, LossReason};
pub use action::{Command, CommandOutcome};
pub use state::{AllyList, CombatState, EnemyList, PartyRestore, WaveAdvance, WaveRules};
