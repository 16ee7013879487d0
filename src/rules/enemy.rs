//! The enemy phase: damage-over-time ticks, then one action per enemy.
//!
//! ## Order
//!
//! 1. Bleed tick for every living enemy with bleed, in roster order
//! 2. Curse tick the same way (enemies killed by bleed are skipped)
//! 3. If the wave survived, each living enemy attacks once, in roster order
//!
//! A tick deals `stacks` damage through `take_damage` (so invincibility can
//! absorb it) and then removes one stack. Each tick and each attack is
//! followed by a pacing beat.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{CombatState, DamageOutcome, EnemyActionError, EnemySlot, GameRng, Role};
use crate::effects::choose_enemy_target;
use crate::events::{BattleEvent, EventLog, TickKind};

use super::pacing::{Beat, Pacer};

/// One resolved enemy attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyAttack {
    pub slot: EnemySlot,
    pub target: Role,
    pub damage: u32,
    /// The target was forced by taunt, which is now cleared.
    pub taunted: bool,
    pub outcome: DamageOutcome,
}

/// Apply one round of a damage-over-time status to every living enemy.
///
/// Returns the number of ticks applied.
pub fn tick_statuses(
    combat: &mut CombatState,
    kind: TickKind,
    pacer: &mut dyn Pacer,
    events: &mut EventLog,
) -> u32 {
    let mut ticks = 0;
    for slot in combat.living_enemies() {
        let Some(enemy) = combat.enemy_mut(slot) else {
            continue;
        };
        let stacks = match kind {
            TickKind::Bleed => &mut enemy.status.bleed,
            TickKind::Curse => &mut enemy.status.curse,
        };
        let amount = *stacks;
        if amount == 0 {
            continue;
        }
        *stacks = amount - 1;

        let outcome = enemy.take_damage(amount);
        debug!(%slot, %kind, stacks = amount, ?outcome, "status tick");
        events.push(BattleEvent::StatusTicked {
            slot,
            kind,
            stacks: amount,
            outcome,
        });
        ticks += 1;
        pacer.pause(Beat::StatusTick);
    }
    ticks
}

/// One enemy picks a victim and attacks.
///
/// A taunting ally is forced and loses the flag; otherwise the victim is a
/// uniformly random living ally. Damage is the round's enemy damage reduced
/// by the attacker's curse.
pub fn enemy_act(
    slot: EnemySlot,
    combat: &mut CombatState,
    rng: &mut GameRng,
) -> Result<EnemyAttack, EnemyActionError> {
    if !combat.enemy(slot).is_some_and(|enemy| enemy.is_alive()) {
        return Err(EnemyActionError::NotOnField { slot });
    }
    let target = choose_enemy_target(combat, rng).ok_or(EnemyActionError::NoTarget { slot })?;
    let damage = combat.enemy_damage(slot);

    let victim = combat.ally_mut(target.role);
    if target.consumes_taunt {
        victim.take_taunt();
    }
    let outcome = victim.take_damage(damage);

    Ok(EnemyAttack {
        slot,
        target: target.role,
        damage,
        taunted: target.consumes_taunt,
        outcome,
    })
}

/// Every living enemy acts once, in roster order.
///
/// A failed action is logged and reported; the next enemy still acts.
/// Returns the attacks that landed.
pub fn run_enemy_actions(
    combat: &mut CombatState,
    rng: &mut GameRng,
    pacer: &mut dyn Pacer,
    events: &mut EventLog,
) -> Vec<EnemyAttack> {
    let mut attacks = Vec::new();
    for slot in combat.living_enemies() {
        match enemy_act(slot, combat, rng) {
            Ok(attack) => {
                debug!(
                    %slot,
                    target = %attack.target,
                    damage = attack.damage,
                    taunted = attack.taunted,
                    "enemy attacked"
                );
                events.push(BattleEvent::EnemyAttacked {
                    slot,
                    target: attack.target,
                    damage: attack.damage,
                    taunted: attack.taunted,
                    outcome: attack.outcome,
                });
                attacks.push(attack);
            }
            Err(error) => {
                warn!(%slot, %error, "enemy action failed");
                events.push(BattleEvent::EnemyActionFailed { slot });
            }
        }
        pacer.pause(Beat::EnemyAction);
    }
    attacks
}
