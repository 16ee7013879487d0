//! Combat state: party roster, enemy wave and progression counters.
//!
//! ## Roster
//!
//! - Party: exactly three members, indexed by `Role`.
//! - Enemies: at most `enemy_slots` entities, indexed by `EnemySlot`.
//!
//! ## Progression
//!
//! A *wave* is the current enemy roster, a *round* is the wave index within a
//! stage, and a *stage* is the major unit that triggers the heavy reset
//! (reshuffle plus party heal/revive). Enemy health scales with the round:
//!
//! ```text
//! max_health = enemy_base_health + enemy_health_per_round * round
//! ```
//!
//! `CombatState` is owned by the battle and passed by reference into the deck
//! manager and effect resolver; nothing keeps a second copy.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::config::BattleConfig;
use super::entity::{CombatEntity, EnemySlot, Role};

/// Living party members, in role order.
pub type AllyList = SmallVec<[Role; 3]>;

/// Living enemies, in roster order.
pub type EnemyList = SmallVec<[EnemySlot; 3]>;

/// Wave and stage formulas copied out of the battle configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveRules {
    pub rounds_per_stage: u32,
    pub enemy_slots: usize,
    pub enemy_base_health: u32,
    pub enemy_health_per_round: u32,
    pub enemy_base_damage: u32,
    pub revive_fraction: f64,
}

impl From<&BattleConfig> for WaveRules {
    fn from(config: &BattleConfig) -> Self {
        Self {
            rounds_per_stage: config.rounds_per_stage.max(1),
            enemy_slots: config.enemy_slots,
            enemy_base_health: config.enemy_base_health,
            enemy_health_per_round: config.enemy_health_per_round,
            enemy_base_damage: config.enemy_base_damage,
            revive_fraction: config.revive_fraction,
        }
    }
}

/// What a wave clear advanced to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveAdvance {
    /// Same stage, next round.
    NextRound { round: u32 },
    /// New stage; round is back to 1.
    NextStage { stage: u32 },
}

/// Result of the stage-transition heal/revive for one party member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyRestore {
    /// Was alive, healed to full.
    Healed { role: Role, health: u32 },
    /// Was KO'd, revived to a fraction of max.
    Revived { role: Role, health: u32 },
}

/// Party, enemies and progression counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    party: [CombatEntity; 3],
    enemies: SmallVec<[CombatEntity; 3]>,
    stage: u32,
    round: u32,
    rules: WaveRules,
}

impl CombatState {
    /// Create the starting state: full-health party, no enemies yet,
    /// stage 1, round 1.
    #[must_use]
    pub fn new(config: &BattleConfig) -> Self {
        let party = Role::ALL.map(|role| {
            let member = config.party_member(role);
            CombatEntity::party(role, member.max_health, member.max_mana)
        });

        Self {
            party,
            enemies: SmallVec::new(),
            stage: 1,
            round: 1,
            rules: WaveRules::from(config),
        }
    }

    /// Wave formulas in effect.
    #[must_use]
    pub fn rules(&self) -> &WaveRules {
        &self.rules
    }

    #[must_use]
    pub fn stage(&self) -> u32 {
        self.stage
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    // === Party ===

    /// A party member by role.
    #[must_use]
    pub fn ally(&self, role: Role) -> &CombatEntity {
        &self.party[role.index()]
    }

    /// A mutable party member by role.
    pub fn ally_mut(&mut self, role: Role) -> &mut CombatEntity {
        &mut self.party[role.index()]
    }

    /// All party members in role order.
    pub fn allies(&self) -> impl Iterator<Item = &CombatEntity> {
        self.party.iter()
    }

    /// Is this party member alive?
    #[must_use]
    pub fn is_ally_alive(&self, role: Role) -> bool {
        self.ally(role).is_alive()
    }

    /// Living party members in role order.
    #[must_use]
    pub fn living_allies(&self) -> AllyList {
        Role::ALL
            .into_iter()
            .filter(|&role| self.is_ally_alive(role))
            .collect()
    }

    #[must_use]
    pub fn all_allies_dead(&self) -> bool {
        self.party.iter().all(|member| !member.is_alive())
    }

    /// A role's ultimate is ready when the role is alive and its mana is full.
    ///
    /// Derived on every call; there is no stored visibility flag.
    #[must_use]
    pub fn ultimate_ready(&self, role: Role) -> bool {
        let member = self.ally(role);
        member.is_alive() && member.is_mana_full()
    }

    // === Enemies ===

    /// The current wave in roster order.
    #[must_use]
    pub fn enemies(&self) -> &[CombatEntity] {
        &self.enemies
    }

    /// An enemy by slot.
    #[must_use]
    pub fn enemy(&self, slot: EnemySlot) -> Option<&CombatEntity> {
        self.enemies.get(slot.index())
    }

    /// A mutable enemy by slot.
    pub fn enemy_mut(&mut self, slot: EnemySlot) -> Option<&mut CombatEntity> {
        self.enemies.get_mut(slot.index())
    }

    /// Living enemies in roster order.
    #[must_use]
    pub fn living_enemies(&self) -> EnemyList {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.is_alive())
            .map(|(i, _)| EnemySlot::new(i as u8))
            .collect()
    }

    /// True when no enemy is alive (including an empty roster).
    #[must_use]
    pub fn all_enemies_dead(&self) -> bool {
        self.enemies.iter().all(|enemy| !enemy.is_alive())
    }

    /// Max health for enemies spawned in the current round.
    #[must_use]
    pub fn enemy_max_health(&self) -> u32 {
        self.rules.enemy_base_health + self.rules.enemy_health_per_round * self.round
    }

    /// Outgoing damage of an enemy this round, reduced by its curse.
    #[must_use]
    pub fn enemy_damage(&self, slot: EnemySlot) -> u32 {
        let curse = self.enemy(slot).map_or(0, |e| e.status.curse);
        (self.rules.enemy_base_damage + self.round).saturating_sub(curse)
    }

    /// Replace the roster with `min(count, enemy_slots)` fresh enemies.
    ///
    /// Returns how many were spawned.
    pub fn spawn_wave(&mut self, count: usize) -> usize {
        let to_spawn = count.min(self.rules.enemy_slots);
        let max_health = self.enemy_max_health();

        self.enemies.clear();
        for i in 0..to_spawn {
            self.enemies
                .push(CombatEntity::enemy(EnemySlot::new(i as u8), max_health));
        }

        info!(
            stage = self.stage,
            round = self.round,
            count = to_spawn,
            max_health,
            "spawned wave"
        );
        to_spawn
    }

    // === Progression ===

    /// Advance the counters after a wave clear.
    ///
    /// Does not respawn or reset anything; the caller runs the stage reset
    /// for `NextStage` and spawns the next wave.
    pub fn advance_wave(&mut self) -> WaveAdvance {
        if self.round < self.rules.rounds_per_stage {
            self.round += 1;
            debug!(round = self.round, "wave cleared, next round");
            WaveAdvance::NextRound { round: self.round }
        } else {
            self.stage += 1;
            self.round = 1;
            info!(stage = self.stage, "stage cleared, advancing");
            WaveAdvance::NextStage { stage: self.stage }
        }
    }

    /// Stage-transition restore: living members heal to full, KO'd members
    /// revive to `ceil(max_health * revive_fraction)`.
    pub fn restore_party(&mut self) -> SmallVec<[PartyRestore; 3]> {
        let fraction = self.rules.revive_fraction;
        self.party
            .iter_mut()
            .zip(Role::ALL)
            .map(|(member, role)| match member.revive(fraction) {
                Some(health) => {
                    info!(%role, health, "revived");
                    PartyRestore::Revived { role, health }
                }
                None => {
                    member.heal_to_full();
                    PartyRestore::Healed {
                        role,
                        health: member.current_health(),
                    }
                }
            })
            .collect()
    }
}
