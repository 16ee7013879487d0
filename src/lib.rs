//! # butler-ccg
//!
//! Rules engine for a turn-based party card battler.
//!
//! Three butlers (Guard, Tailor, Chamberlain) share one deck and fight waves
//! of enemies. Each turn the player deals a hand, picks up to three cards,
//! and confirms; the cards resolve in order, unplayed cards go back to the
//! deck for mana, and then the enemies tick and attack.
//!
//! ## Design Principles
//!
//! 1. **Closed card set**: `CardType` is an enum and the resolver is a total
//!    match over it. A card without an effect does not compile.
//!
//! 2. **One owner of state**: `Battle` owns `CombatState`, the
//!    `DeckManager` and the RNG, and lends them to each step by reference.
//!
//! 3. **Derived presentation**: playability and ultimate visibility are
//!    computed from entity state, never stored.
//!
//! ## Modules
//!
//! - `core`: entities, combat state, commands, RNG, configuration, errors
//! - `cards`: card catalogue, instances and registry
//! - `zones`: deck, hand, discard and selection
//! - `effects`: targeting, effect resolution and reports
//! - `rules`: the turn state machine, enemy phase and pacing
//! - `events`: outbound events and the `BattleView` snapshot

pub mod core;
pub mod cards;
pub mod zones;
pub mod effects;
pub mod rules;
pub mod events;

// Re-export commonly used types
pub use crate::core::{
    BattleConfig, CombatEntity, CombatState, Combatant, Command, CommandError, CommandOutcome,
    DamageOutcome, EnemySlot, GameRng, LossReason, PacingConfig, Role, StatusBlock,
};

pub use crate::cards::{CardDefinition, CardId, CardInstance, CardRegistry, CardType, Residency};

pub use crate::zones::{DeckManager, Selection, SelectionChange, SelectionSlot};

pub use crate::effects::{EffectReport, EffectResolver, Impact, ResolverContext, StatusChange};

pub use crate::rules::{Battle, Beat, FixedPacing, NoPacing, Pacer, TurnPhase, TurnSummary};

pub use crate::events::{BattleEvent, BattleView};
