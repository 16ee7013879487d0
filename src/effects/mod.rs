//! Card effects: targeting, resolution and reporting.
//!
//! - `targeting`: read-only target selectors (lowest enemy, lowest ally,
//!   enemy victim choice)
//! - `EffectResolver`: applies one card to `CombatState`
//! - `EffectReport`: the auditable record of what a card did
//!
//! Effects never move cards between zones. The deck manager decides where a
//! card goes after it resolves.

mod effect;
mod targeting;
mod resolver;

pub use effect::{EffectReport, Impact, StatusChange};
pub use targeting::{
    choose_enemy_target, lowest_health_ally, lowest_health_enemy, taunting_ally, EnemyTarget,
};
pub use resolver::{EffectResolver, ResolverContext};
