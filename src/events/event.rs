//! Battle events.
//!
//! Events describe what happened, in the order it happened. The battle queues
//! them as it mutates state and the UI drains the queue to animate bars,
//! move cards and show banners. Nothing reads events back to make a rules
//! decision; `CombatState` stays the single source of truth.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardType};
use crate::core::{
    DamageOutcome, DrawError, EffectError, EnemySlot, LossReason, PartyRestore, Role, WaveAdvance,
};
use crate::effects::EffectReport;
use crate::rules::TurnPhase;
use crate::zones::SelectionChange;

/// Damage-over-time status that ticked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickKind {
    Bleed,
    Curse,
}

impl std::fmt::Display for TickKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickKind::Bleed => f.write_str("bleed"),
            TickKind::Curse => f.write_str("curse"),
        }
    }
}

/// Something that happened during a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    // === Turn flow ===
    /// A player turn began.
    TurnStarted { turn: u32 },
    /// The phase changed; `input_enabled` is the new input state.
    PhaseChanged { phase: TurnPhase, input_enabled: bool },
    /// A hand was dealt at the start of a player turn.
    HandDealt { cards: u32 },

    // === Cards ===
    /// A card moved from deck into a hand slot.
    CardDrawn { card: CardId, card_type: CardType, slot: usize },
    /// A draw could not place a card.
    DrawRejected { reason: DrawError },
    /// The selection changed.
    SelectionChanged(SelectionChange),
    /// A card's effect was applied.
    CardResolved { card: CardId, report: EffectReport },
    /// A card's effect failed; resolution continued with the next card.
    CardFailed { card: CardId, error: EffectError },
    /// A played card went to the discard pile.
    CardDiscarded { card: CardId },
    /// An ultimate was played and its owner's mana drained.
    UltimateSpent { role: Role, card: CardId },
    /// An unplayed card went back into the deck.
    CardReturned { card: CardId },
    /// A party member gained mana.
    ManaGained { role: Role, amount: u32 },
    /// Discard was shuffled back into the deck.
    DeckReshuffled { deck_size: u32 },

    // === Enemy phase ===
    /// A bleed or curse tick hit an enemy.
    StatusTicked {
        slot: EnemySlot,
        kind: TickKind,
        stacks: u32,
        outcome: DamageOutcome,
    },
    /// An enemy attacked a party member.
    EnemyAttacked {
        slot: EnemySlot,
        target: Role,
        damage: u32,
        taunted: bool,
        outcome: DamageOutcome,
    },
    /// An enemy could not act (nobody to hit).
    EnemyActionFailed { slot: EnemySlot },

    // === Progression ===
    /// A fresh wave took the field.
    WaveSpawned { stage: u32, round: u32, count: u32 },
    /// The wave died and the counters advanced.
    WaveCleared(WaveAdvance),
    /// A party member was healed or revived at a stage transition.
    PartyRestored(PartyRestore),

    // === Session ===
    /// The session was lost. Only a restart recovers.
    SessionLost { reason: LossReason },
    /// A new session started.
    SessionRestarted { seed: u64 },
}

/// FIFO queue of pending events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    pending: Vec<BattleEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event.
    pub fn push(&mut self, event: BattleEvent) {
        self.pending.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.pending.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
