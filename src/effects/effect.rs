//! Effect reports.
//!
//! Resolving a card produces an `EffectReport`: the list of atomic `Impact`s
//! the card applied, in application order. Reports make resolution
//! auditable - tests and the event stream read them instead of diffing state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardType;
use crate::core::{Combatant, DamageOutcome, Role};

/// A status change applied by an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusChange {
    Strength,
    Taunt,
    Shield(u32),
    Bleed(u32),
    Curse(u32),
    /// One bleed/curse/time-bomb stack removed.
    StackRemoved,
    /// All bleed and curse removed.
    Cleansed,
    /// Bleed stacks converted to damage and cleared.
    BleedDetonated(u32),
}

/// One atomic mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    /// A hit landed (or was absorbed).
    Hit {
        target: Combatant,
        damage: u32,
        outcome: DamageOutcome,
    },
    /// Health restored (amount actually gained).
    Healed { target: Combatant, amount: u32 },
    /// A status was applied or removed.
    Status { target: Combatant, change: StatusChange },
    /// Mana gained by a party member.
    Mana { role: Role, amount: u32 },
}

/// Everything one card did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectReport {
    pub card_type: CardType,
    pub owner: Role,
    /// Bonus from a consumed Strength flag (0 if none was consumed).
    pub strength_bonus: u32,
    pub impacts: SmallVec<[Impact; 4]>,
}

impl EffectReport {
    /// Start an empty report.
    #[must_use]
    pub fn new(card_type: CardType, owner: Role) -> Self {
        Self {
            card_type,
            owner,
            strength_bonus: 0,
            impacts: SmallVec::new(),
        }
    }

    /// Record an impact.
    pub fn push(&mut self, impact: Impact) {
        self.impacts.push(impact);
    }

    /// The card changed nothing (e.g. no living target).
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.impacts.is_empty()
    }

    /// Total health removed from all targets.
    #[must_use]
    pub fn health_removed(&self) -> u32 {
        self.impacts
            .iter()
            .map(|impact| match impact {
                Impact::Hit { outcome, .. } => outcome.health_lost(),
                _ => 0,
            })
            .sum()
    }

    /// Total health restored.
    #[must_use]
    pub fn health_restored(&self) -> u32 {
        self.impacts
            .iter()
            .map(|impact| match impact {
                Impact::Healed { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }

    /// Nominal damage of every hit, in order.
    pub fn hits(&self) -> impl Iterator<Item = (Combatant, u32)> + '_ {
        self.impacts.iter().filter_map(|impact| match impact {
            Impact::Hit { target, damage, .. } => Some((*target, *damage)),
            _ => None,
        })
    }
}
