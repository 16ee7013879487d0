//! Combatant identification and the shared vitals/status record.
//!
//! Party members and enemies are the same `CombatEntity` type in different
//! configurations:
//!
//! - Party members are addressed by `Role` (fixed identities, fixed order).
//! - Enemies are addressed by `EnemySlot` (roster position, 0-based).
//!
//! ## Absorption
//!
//! Two absorption mechanics share `take_damage`:
//! - **Shield** stacks: each absorbed hit consumes one stack and negates the
//!   whole hit. Party cards grant these.
//! - **Invincibility**: a one-shot flag that negates one hit. Only the enemy
//!   path uses it; nothing in the card catalogue grants it to the party.
//!
//! Shield is checked first and ignores invincibility.
//!
//! ```
//! use butler_ccg::core::{CombatEntity, DamageOutcome, Role};
//!
//! let mut guard = CombatEntity::party(Role::Guard, 30, 5);
//! guard.add_shield(1);
//!
//! assert_eq!(guard.take_damage(7), DamageOutcome::ShieldAbsorbed { remaining: 0 });
//! assert_eq!(guard.take_damage(7), DamageOutcome::Dealt { amount: 7 });
//! assert_eq!(guard.current_health(), 23);
//! ```

use serde::{Deserialize, Serialize};

/// One of the three fixed party identities.
///
/// The declaration order is the enumeration order used for tie-breaks and
/// taunt priority: Guard (tank), Tailor (support), Chamberlain (dps).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Tank.
    Guard,
    /// Support.
    Tailor,
    /// Damage dealer.
    Chamberlain,
}

impl Role {
    /// All roles in enumeration order.
    pub const ALL: [Role; 3] = [Role::Guard, Role::Tailor, Role::Chamberlain];

    /// Index into party arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Role::Guard => 0,
            Role::Tailor => 1,
            Role::Chamberlain => 2,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Role::Guard => "Guard",
            Role::Tailor => "Tailor",
            Role::Chamberlain => "Chamberlain",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Enemy roster position (0-based, stable for the lifetime of a wave).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemySlot(pub u8);

impl EnemySlot {
    /// Create a slot from a roster index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Roster index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EnemySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Enemy({})", self.0)
    }
}

/// Reference to any combatant, used by reports and events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combatant {
    /// A party member.
    Party(Role),
    /// An enemy in the current wave.
    Enemy(EnemySlot),
}

impl std::fmt::Display for Combatant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Combatant::Party(role) => write!(f, "{role}"),
            Combatant::Enemy(slot) => write!(f, "{slot}"),
        }
    }
}

/// Buffs and debuffs carried by a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusBlock {
    /// One-shot damage bonus for the next damage card this entity plays.
    pub strength: bool,
    /// Negates the next hit, then clears.
    pub invincible: bool,
    /// Absorption stacks; one stack negates one whole hit.
    pub shield: u32,
    /// Forces the next enemy action onto this entity, then clears.
    pub taunt: bool,
    /// Ticks for `bleed` damage at the start of the enemy phase, decays by 1.
    pub bleed: u32,
    /// Ticks like bleed and reduces the afflicted enemy's outgoing damage.
    pub curse: u32,
    /// Declared for compatibility. Only the single-stack cleanse touches it.
    pub time_bomb: u32,
}

/// Which side of the battle an entity is on, and where.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Party member with a fixed role.
    PartyMember { role: Role },
    /// Enemy occupying a roster slot.
    Enemy { slot: EnemySlot },
}

/// What happened when an entity was hit.
///
/// One-shot absorptions are reported here instead of being hidden inside
/// the mutation, so callers can audit exactly which flag a hit consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// One shield stack absorbed the hit.
    ShieldAbsorbed {
        /// Stacks left after the hit.
        remaining: u32,
    },
    /// The invincibility flag negated the hit and was cleared.
    InvincibilityConsumed,
    /// Health was reduced.
    Dealt {
        /// Health actually lost (never more than the entity had).
        amount: u32,
    },
}

impl DamageOutcome {
    /// Health actually removed by the hit.
    #[must_use]
    pub const fn health_lost(self) -> u32 {
        match self {
            DamageOutcome::Dealt { amount } => amount,
            _ => 0,
        }
    }
}

/// Vitals and status for a party member or an enemy.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatEntity {
    kind: EntityKind,
    max_health: u32,
    current_health: u32,
    max_mana: u32,
    current_mana: u32,
    /// Status effects. Setters are plain field writes.
    pub status: StatusBlock,
}

impl CombatEntity {
    /// Create a party member at full health with empty mana.
    #[must_use]
    pub fn party(role: Role, max_health: u32, max_mana: u32) -> Self {
        Self {
            kind: EntityKind::PartyMember { role },
            max_health,
            current_health: max_health,
            max_mana,
            current_mana: 0,
            status: StatusBlock::default(),
        }
    }

    /// Create an enemy at full health. Enemies carry no mana.
    #[must_use]
    pub fn enemy(slot: EnemySlot, max_health: u32) -> Self {
        Self {
            kind: EntityKind::Enemy { slot },
            max_health,
            current_health: max_health,
            max_mana: 0,
            current_mana: 0,
            status: StatusBlock::default(),
        }
    }

    /// Which side and position this entity occupies.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// This entity as a combatant reference.
    #[must_use]
    pub fn combatant(&self) -> Combatant {
        match self.kind {
            EntityKind::PartyMember { role } => Combatant::Party(role),
            EntityKind::Enemy { slot } => Combatant::Enemy(slot),
        }
    }

    #[must_use]
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    #[must_use]
    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    #[must_use]
    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    #[must_use]
    pub fn current_mana(&self) -> u32 {
        self.current_mana
    }

    /// Alive iff health is above zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Mana is full (and the entity has a mana pool at all).
    #[must_use]
    pub fn is_mana_full(&self) -> bool {
        self.max_mana > 0 && self.current_mana == self.max_mana
    }

    /// Health as a fraction of max, for proportional targeting.
    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        f64::from(self.current_health) / f64::from(self.max_health.max(1))
    }

    /// Apply one hit.
    ///
    /// Shield is consumed first (ignoring invincibility), then invincibility,
    /// and only then is health reduced, saturating at zero.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.status.shield > 0 {
            self.status.shield -= 1;
            return DamageOutcome::ShieldAbsorbed {
                remaining: self.status.shield,
            };
        }

        if self.status.invincible {
            self.status.invincible = false;
            return DamageOutcome::InvincibilityConsumed;
        }

        let before = self.current_health;
        self.current_health = before.saturating_sub(amount);
        DamageOutcome::Dealt {
            amount: before - self.current_health,
        }
    }

    /// Restore health, clamped to max. Returns the health actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if amount == 0 {
            return 0;
        }
        let before = self.current_health;
        self.current_health = self.max_health.min(before.saturating_add(amount));
        self.current_health - before
    }

    /// Set health to max.
    pub fn heal_to_full(&mut self) {
        self.current_health = self.max_health;
    }

    /// Bring a KO'd entity back to `ceil(max_health * fraction)`.
    ///
    /// No-op for living entities. Returns the new health if revived.
    pub fn revive(&mut self, fraction: f64) -> Option<u32> {
        if self.is_alive() {
            return None;
        }
        let restored = (f64::from(self.max_health) * fraction).ceil() as u32;
        self.current_health = restored.min(self.max_health);
        Some(self.current_health)
    }

    /// Gain mana, clamped to max.
    pub fn gain_mana(&mut self, amount: u32) {
        self.current_mana = self.max_mana.min(self.current_mana.saturating_add(amount));
    }

    /// Drain the whole mana pool (ultimate cost).
    pub fn consume_all_mana(&mut self) {
        self.current_mana = 0;
    }

    /// Add shield stacks.
    pub fn add_shield(&mut self, stacks: u32) {
        self.status.shield = self.status.shield.saturating_add(stacks);
    }

    /// Read and clear the strength flag.
    ///
    /// Returns whether strength was set, so the caller can apply the bonus
    /// exactly once.
    pub fn take_strength(&mut self) -> bool {
        std::mem::take(&mut self.status.strength)
    }

    /// Read and clear the taunt flag.
    pub fn take_taunt(&mut self) -> bool {
        std::mem::take(&mut self.status.taunt)
    }

    /// Remove all bleed and curse stacks.
    pub fn cleanse(&mut self) {
        self.status.bleed = 0;
        self.status.curse = 0;
    }

    /// Remove a single debuff stack: bleed first, then curse, then time-bomb.
    ///
    /// Returns `false` if there was nothing to remove.
    pub fn cleanse_one_stack(&mut self) -> bool {
        let status = &mut self.status;
        if status.bleed > 0 {
            status.bleed -= 1;
        } else if status.curse > 0 {
            status.curse -= 1;
        } else if status.time_bomb > 0 {
            status.time_bomb -= 1;
        } else {
            return false;
        }
        true
    }
}
