//! Effect resolution - applying a played card to combat state.
//!
//! `EffectResolver::resolve` is a total match over `CardType`: every card
//! maps to exactly one effect procedure, and a new card type without an
//! effect fails to compile.
//!
//! ## Strength
//!
//! Damage cards read the owner's Strength flag. If it is set, the flag is
//! cleared once and the bonus is added to every hit of that play. Utility,
//! debuff, heal and ultimate cards never touch Strength. A damage card with
//! no living target is a no-op and leaves Strength in place.

use smallvec::SmallVec;
use tracing::debug;

use crate::cards::{CardDefinition, CardType};
use crate::core::{BattleConfig, CombatState, Combatant, EffectError, EnemySlot, Role};

use super::effect::{EffectReport, Impact, StatusChange};
use super::targeting::{lowest_health_ally, lowest_health_enemy};

/// Tunables the resolver needs from the battle configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolverContext {
    /// Damage added by a consumed Strength flag.
    pub strength_bonus: u32,
}

impl ResolverContext {
    #[must_use]
    pub const fn new(strength_bonus: u32) -> Self {
        Self { strength_bonus }
    }
}

impl Default for ResolverContext {
    fn default() -> Self {
        Self::new(2)
    }
}

impl From<&BattleConfig> for ResolverContext {
    fn from(config: &BattleConfig) -> Self {
        Self::new(config.strength_bonus)
    }
}

/// Applies card effects to combat state.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve one card played by its owner.
    ///
    /// Fails only if the owner is down; the caller isolates the failure and
    /// moves on to the next card.
    pub fn resolve(
        card: &CardDefinition,
        state: &mut CombatState,
        context: &ResolverContext,
    ) -> Result<EffectReport, EffectError> {
        let owner = card.owner;
        if !state.is_ally_alive(owner) {
            return Err(EffectError::OwnerDown { owner });
        }

        let mut fx = Application {
            state,
            report: EffectReport::new(card.card_type, owner),
            strength_bonus: context.strength_bonus,
        };

        match card.card_type {
            // === Guard ===
            CardType::Lance => {
                fx.strike_lowest(card.power);
            }
            CardType::Chivalry => {
                fx.grant(Role::Guard, StatusChange::Taunt);
                fx.grant(Role::Guard, StatusChange::Strength);
            }
            CardType::Aegis => {
                fx.grant(Role::Guard, StatusChange::Shield(card.stacks));
            }
            CardType::Denounce => {
                if let Some(slot) = lowest_health_enemy(fx.state) {
                    fx.afflict(slot, StatusChange::Curse(card.stacks));
                }
            }

            // === Tailor ===
            CardType::CatchStitch => {
                if let Some(role) = lowest_health_ally(fx.state) {
                    fx.heal(role, card.power);
                }
            }
            CardType::ChainStitch => {
                for role in fx.state.living_allies() {
                    fx.heal(role, card.power);
                }
            }
            CardType::BackStitch => {
                let target = if fx.state.is_ally_alive(Role::Chamberlain) {
                    Some(Role::Chamberlain)
                } else {
                    lowest_health_ally(fx.state)
                };
                if let Some(role) = target {
                    fx.grant(role, StatusChange::Strength);
                }
            }
            CardType::Unseam => {
                if let Some(slot) = fx.strike_lowest(card.power) {
                    fx.afflict(slot, StatusChange::Bleed(card.stacks));
                }
            }
            CardType::Resolve => {
                if let Some(role) = lowest_health_ally(fx.state) {
                    if fx.state.ally_mut(role).cleanse_one_stack() {
                        fx.record_status(Combatant::Party(role), StatusChange::StackRemoved);
                    }
                    fx.heal(role, card.power);
                }
            }

            // === Chamberlain ===
            CardType::Levy => {
                fx.strike_all(card.power);
            }
            CardType::Lacerate => {
                for slot in fx.strike_all(card.power) {
                    fx.afflict(slot, StatusChange::Bleed(card.stacks));
                }
            }
            CardType::Tithe => {
                let before = fx.report.health_removed();
                if fx.strike_lowest(card.power).is_some() {
                    let drained = fx.report.health_removed() - before;
                    fx.heal(owner, drained);
                }
            }
            CardType::Patronage => {
                for role in fx.state.living_allies() {
                    fx.state.ally_mut(role).gain_mana(card.stacks);
                    fx.report.push(Impact::Mana {
                        role,
                        amount: card.stacks,
                    });
                    fx.heal(role, card.power);
                }
            }
            CardType::RoyalReprieve => {
                for role in fx.state.living_allies() {
                    fx.grant(role, StatusChange::Strength);
                    fx.heal(role, card.power);
                }
            }

            // === Ultimates ===
            CardType::Bulwark => {
                for role in fx.state.living_allies() {
                    fx.grant(role, StatusChange::Shield(card.stacks));
                }
                if fx.state.is_ally_alive(Role::Guard) {
                    fx.heal(Role::Guard, card.power);
                }
            }
            CardType::Tapestry => {
                for role in Role::ALL {
                    let ally = fx.state.ally_mut(role);
                    if ally.status.bleed > 0 || ally.status.curse > 0 {
                        ally.cleanse();
                        fx.record_status(Combatant::Party(role), StatusChange::Cleansed);
                    }
                }
                for role in fx.state.living_allies() {
                    fx.heal(role, card.power);
                }
            }
            CardType::Reckoning => {
                for slot in fx.state.living_enemies() {
                    let Some(enemy) = fx.state.enemy_mut(slot) else {
                        continue;
                    };
                    let stacks = std::mem::take(&mut enemy.status.bleed);
                    if stacks == 0 {
                        continue;
                    }
                    let outcome = enemy.take_damage(stacks);
                    fx.record_status(Combatant::Enemy(slot), StatusChange::BleedDetonated(stacks));
                    fx.report.push(Impact::Hit {
                        target: Combatant::Enemy(slot),
                        damage: stacks,
                        outcome,
                    });
                }
            }
        }

        debug!(
            card = %card.card_type,
            %owner,
            impacts = fx.report.impacts.len(),
            "resolved card"
        );
        Ok(fx.report)
    }
}

/// Working set for one card resolution.
struct Application<'a> {
    state: &'a mut CombatState,
    report: EffectReport,
    strength_bonus: u32,
}

impl Application<'_> {
    /// Consume the owner's Strength (once per play) and return the bonus.
    fn consume_strength(&mut self) -> u32 {
        if self.report.strength_bonus > 0 {
            return self.report.strength_bonus;
        }
        let owner = self.report.owner;
        if self.state.ally_mut(owner).take_strength() {
            debug!(%owner, bonus = self.strength_bonus, "strength consumed");
            self.report.strength_bonus = self.strength_bonus;
        }
        self.report.strength_bonus
    }

    fn hit(&mut self, slot: EnemySlot, damage: u32) {
        let Some(enemy) = self.state.enemy_mut(slot) else {
            return;
        };
        let outcome = enemy.take_damage(damage);
        debug!(%slot, damage, ?outcome, "hit enemy");
        self.report.push(Impact::Hit {
            target: Combatant::Enemy(slot),
            damage,
            outcome,
        });
    }

    /// Hit the lowest-health enemy. Returns the slot hit.
    fn strike_lowest(&mut self, base: u32) -> Option<EnemySlot> {
        let slot = lowest_health_enemy(self.state)?;
        let damage = base + self.consume_strength();
        self.hit(slot, damage);
        Some(slot)
    }

    /// Hit every living enemy with the same damage. Returns the slots hit.
    fn strike_all(&mut self, base: u32) -> SmallVec<[EnemySlot; 3]> {
        let targets = self.state.living_enemies();
        if targets.is_empty() {
            return targets;
        }
        let damage = base + self.consume_strength();
        for &slot in &targets {
            self.hit(slot, damage);
        }
        targets
    }

    fn heal(&mut self, role: Role, amount: u32) {
        let ally = self.state.ally_mut(role);
        if !ally.is_alive() {
            return;
        }
        let healed = ally.heal(amount);
        self.report.push(Impact::Healed {
            target: Combatant::Party(role),
            amount: healed,
        });
    }

    /// Apply a buff to a party member.
    fn grant(&mut self, role: Role, change: StatusChange) {
        let ally = self.state.ally_mut(role);
        match change {
            StatusChange::Strength => ally.status.strength = true,
            StatusChange::Taunt => ally.status.taunt = true,
            StatusChange::Shield(stacks) => ally.add_shield(stacks),
            _ => return,
        }
        self.record_status(Combatant::Party(role), change);
    }

    /// Apply a debuff to an enemy.
    fn afflict(&mut self, slot: EnemySlot, change: StatusChange) {
        let Some(enemy) = self.state.enemy_mut(slot) else {
            return;
        };
        match change {
            StatusChange::Bleed(stacks) => enemy.status.bleed += stacks,
            StatusChange::Curse(stacks) => enemy.status.curse += stacks,
            _ => return,
        }
        self.record_status(Combatant::Enemy(slot), change);
    }

    fn record_status(&mut self, target: Combatant, change: StatusChange) {
        self.report.push(Impact::Status { target, change });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DamageOutcome;

    fn battle_state() -> CombatState {
        let mut state = CombatState::new(&BattleConfig::default());
        state.spawn_wave(3);
        state
    }

    fn play(card: CardType, state: &mut CombatState) -> EffectReport {
        EffectResolver::resolve(&card.definition(), state, &ResolverContext::default()).unwrap()
    }

    fn enemy_health(state: &CombatState) -> Vec<u32> {
        state.enemies().iter().map(|e| e.current_health()).collect()
    }

    #[test]
    fn test_lance_hits_lowest_enemy() {
        let mut state = battle_state();
        state.enemy_mut(EnemySlot(1)).unwrap().take_damage(2);

        let report = play(CardType::Lance, &mut state);

        assert_eq!(enemy_health(&state), vec![9, 3, 9]);
        assert_eq!(report.strength_bonus, 0);
        assert_eq!(report.health_removed(), 4);
    }

    #[test]
    fn test_strength_consumed_once_per_play() {
        let mut state = battle_state();
        state.ally_mut(Role::Guard).status.strength = true;

        let first = play(CardType::Lance, &mut state);
        assert_eq!(first.hits().next().unwrap().1, 6);
        assert!(!state.ally(Role::Guard).status.strength);

        let second = play(CardType::Lance, &mut state);
        assert_eq!(second.hits().next().unwrap().1, 4);
    }

    #[test]
    fn test_aoe_applies_bonus_to_every_hit() {
        let mut state = battle_state();
        state.ally_mut(Role::Chamberlain).status.strength = true;

        let report = play(CardType::Levy, &mut state);

        assert_eq!(report.strength_bonus, 2);
        assert_eq!(report.hits().map(|(_, d)| d).collect::<Vec<_>>(), vec![4, 4, 4]);
        assert_eq!(enemy_health(&state), vec![5, 5, 5]);
        assert!(!state.ally(Role::Chamberlain).status.strength);
    }

    #[test]
    fn test_utility_card_keeps_strength() {
        let mut state = battle_state();
        state.ally_mut(Role::Guard).status.strength = true;

        play(CardType::Denounce, &mut state);
        play(CardType::Aegis, &mut state);

        assert!(state.ally(Role::Guard).status.strength);
        assert_eq!(state.enemy(EnemySlot(0)).unwrap().status.curse, 1);
        assert_eq!(enemy_health(&state), vec![9, 9, 9]);
        assert_eq!(state.ally(Role::Guard).status.shield, 1);
    }

    #[test]
    fn test_unseam_and_lacerate_bleed() {
        let mut state = battle_state();
        play(CardType::Unseam, &mut state);
        assert_eq!(enemy_health(&state), vec![5, 9, 9]);
        assert_eq!(state.enemy(EnemySlot(0)).unwrap().status.bleed, 1);

        play(CardType::Lacerate, &mut state);
        let bleeds: Vec<_> = state.enemies().iter().map(|e| e.status.bleed).collect();
        assert_eq!(bleeds, vec![2, 1, 1]);
        assert_eq!(enemy_health(&state), vec![4, 8, 8]);
    }

    #[test]
    fn test_tithe_heals_owner_by_health_removed() {
        let mut state = battle_state();
        state.ally_mut(Role::Chamberlain).take_damage(10);
        state.enemy_mut(EnemySlot(2)).unwrap().take_damage(7);

        let report = play(CardType::Tithe, &mut state);

        // Enemy had 2 HP left, so only 2 was drained
        assert_eq!(report.health_removed(), 2);
        assert_eq!(state.ally(Role::Chamberlain).current_health(), 12);
    }

    #[test]
    fn test_heals_and_cleanse() {
        let mut state = battle_state();
        state.ally_mut(Role::Tailor).take_damage(10);
        state.ally_mut(Role::Tailor).status.bleed = 2;

        play(CardType::Resolve, &mut state);
        assert_eq!(state.ally(Role::Tailor).status.bleed, 1);
        assert_eq!(state.ally(Role::Tailor).current_health(), 14);

        play(CardType::CatchStitch, &mut state);
        assert_eq!(state.ally(Role::Tailor).current_health(), 17);

        state.ally_mut(Role::Guard).take_damage(5);
        play(CardType::ChainStitch, &mut state);
        assert_eq!(state.ally(Role::Guard).current_health(), 27);
        assert_eq!(state.ally(Role::Tailor).current_health(), 19);
    }

    #[test]
    fn test_back_stitch_falls_back_when_chamberlain_down() {
        let mut state = battle_state();
        play(CardType::BackStitch, &mut state);
        assert!(state.ally(Role::Chamberlain).status.strength);

        let mut state = battle_state();
        state.ally_mut(Role::Chamberlain).take_damage(100);
        state.ally_mut(Role::Guard).take_damage(20);
        play(CardType::BackStitch, &mut state);
        assert!(state.ally(Role::Guard).status.strength);
    }

    #[test]
    fn test_party_buffs() {
        let mut state = battle_state();
        state.ally_mut(Role::Tailor).take_damage(100);

        play(CardType::RoyalReprieve, &mut state);
        assert!(state.ally(Role::Guard).status.strength);
        assert!(!state.ally(Role::Tailor).status.strength);

        play(CardType::Patronage, &mut state);
        assert_eq!(state.ally(Role::Guard).current_mana(), 1);
        assert_eq!(state.ally(Role::Tailor).current_mana(), 0);
    }

    #[test]
    fn test_chivalry_sets_taunt_and_strength() {
        let mut state = battle_state();
        play(CardType::Chivalry, &mut state);
        let guard = state.ally(Role::Guard);
        assert!(guard.status.taunt && guard.status.strength);
    }

    #[test]
    fn test_bulwark() {
        let mut state = battle_state();
        state.ally_mut(Role::Guard).take_damage(10);
        state.ally_mut(Role::Guard).status.strength = true;

        play(CardType::Bulwark, &mut state);

        for role in Role::ALL {
            assert_eq!(state.ally(role).status.shield, 1);
        }
        assert_eq!(state.ally(Role::Guard).current_health(), 24);
        assert!(state.ally(Role::Guard).status.strength);
    }

    #[test]
    fn test_tapestry_cleanses_and_heals() {
        let mut state = battle_state();
        state.ally_mut(Role::Tailor).take_damage(12);
        state.ally_mut(Role::Guard).status.bleed = 3;
        state.ally_mut(Role::Chamberlain).status.curse = 2;

        play(CardType::Tapestry, &mut state);

        assert_eq!(state.ally(Role::Guard).status.bleed, 0);
        assert_eq!(state.ally(Role::Chamberlain).status.curse, 0);
        assert_eq!(state.ally(Role::Tailor).current_health(), 18);
    }

    #[test]
    fn test_reckoning_detonates_bleed() {
        let mut state = battle_state();
        state.enemy_mut(EnemySlot(0)).unwrap().status.bleed = 3;
        state.enemy_mut(EnemySlot(2)).unwrap().status.bleed = 5;
        state.enemy_mut(EnemySlot(2)).unwrap().status.invincible = true;

        let report = play(CardType::Reckoning, &mut state);

        assert_eq!(enemy_health(&state), vec![6, 9, 9]);
        assert!(state.enemies().iter().all(|e| e.status.bleed == 0));
        assert!(report.impacts.iter().any(|i| matches!(
            i,
            Impact::Hit { outcome: DamageOutcome::InvincibilityConsumed, .. }
        )));
    }

    #[test]
    fn test_no_target_is_noop_and_keeps_strength() {
        let mut state = CombatState::new(&BattleConfig::default());
        state.ally_mut(Role::Guard).status.strength = true;

        let report = play(CardType::Lance, &mut state);

        assert!(report.is_noop());
        assert!(state.ally(Role::Guard).status.strength);
    }

    #[test]
    fn test_dead_owner_is_rejected() {
        let mut state = battle_state();
        state.ally_mut(Role::Tailor).take_damage(100);

        let result = EffectResolver::resolve(
            &CardType::Unseam.definition(),
            &mut state,
            &ResolverContext::default(),
        );

        assert_eq!(result, Err(EffectError::OwnerDown { owner: Role::Tailor }));
        assert_eq!(enemy_health(&state), vec![9, 9, 9]);
    }
}
