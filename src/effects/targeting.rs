//! Targeting rules.
//!
//! All selectors are read-only: they inspect `CombatState` and return a
//! choice. One-shot flags (taunt) are reported in the choice and consumed by
//! the caller, never inside the selector.
//!
//! Tie-breaks are stable, never random:
//! - enemies: lowest roster slot wins
//! - allies: role order (Guard, Tailor, Chamberlain) wins

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::{CombatEntity, CombatState, EnemySlot, GameRng, Role};

/// Living enemy with the lowest current health; first slot wins ties.
#[must_use]
pub fn lowest_health_enemy(state: &CombatState) -> Option<EnemySlot> {
    state
        .living_enemies()
        .into_iter()
        .min_by_key(|&slot| state.enemy(slot).map_or(u32::MAX, CombatEntity::current_health))
}

/// Living ally with the lowest `current / max` health ratio; role order wins
/// ties.
#[must_use]
pub fn lowest_health_ally(state: &CombatState) -> Option<Role> {
    state
        .living_allies()
        .into_iter()
        .min_by(|&a, &b| compare_health_ratio(state.ally(a), state.ally(b)))
}

/// Compare health ratios exactly by cross-multiplying.
fn compare_health_ratio(a: &CombatEntity, b: &CombatEntity) -> Ordering {
    let lhs = u64::from(a.current_health()) * u64::from(b.max_health().max(1));
    let rhs = u64::from(b.current_health()) * u64::from(a.max_health().max(1));
    lhs.cmp(&rhs)
}

/// First living ally (in role order) with the taunt flag.
#[must_use]
pub fn taunting_ally(state: &CombatState) -> Option<Role> {
    Role::ALL.into_iter().find(|&role| {
        let ally = state.ally(role);
        ally.is_alive() && ally.status.taunt
    })
}

/// An enemy's chosen victim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTarget {
    pub role: Role,
    /// The victim was forced by taunt; the caller must clear the flag.
    pub consumes_taunt: bool,
}

/// Pick the victim of one enemy action: a taunting ally if any, otherwise a
/// uniformly random living ally. `None` when the whole party is down.
pub fn choose_enemy_target(state: &CombatState, rng: &mut GameRng) -> Option<EnemyTarget> {
    if let Some(role) = taunting_ally(state) {
        return Some(EnemyTarget {
            role,
            consumes_taunt: true,
        });
    }

    let living = state.living_allies();
    rng.choose(&living).map(|&role| EnemyTarget {
        role,
        consumes_taunt: false,
    })
}
