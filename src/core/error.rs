//! Error and terminal-condition types.
//!
//! - `CommandError`: an inbound command was refused; nothing changed.
//! - `DrawError`: a draw could not place a card; logged and treated as a no-op.
//! - `EffectError`: one card's effect failed; the caller logs it and moves on
//!   to the next card.
//! - `EnemyActionError`: one enemy could not act; the phase logs it and moves
//!   on to the next enemy.
//! - `LossReason`: not an error but the designed end of a session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::CardId;
use crate::core::entity::{EnemySlot, Role};

/// An inbound command that was rejected without touching state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CommandError {
    #[error("player input is disabled")]
    InputDisabled,
    #[error("a turn is already resolving")]
    AlreadyResolving,
    #[error("no cards are selected")]
    NothingSelected,
    #[error("{0} does not exist")]
    UnknownCard(CardId),
    #[error("{0} is not in hand")]
    NotInHand(CardId),
    #[error("{card} belongs to {owner}, who is down")]
    OwnerDown { card: CardId, owner: Role },
    #[error("{owner}'s ultimate is not charged")]
    UltimateNotReady { owner: Role },
    #[error("all selection slots are full")]
    SelectionFull,
    #[error("the session is over; restart to play again")]
    SessionOver,
}

/// A draw that could not place a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DrawError {
    #[error("no cards left in deck to draw")]
    DeckEmpty,
    #[error("no free hand slot for the drawn card")]
    HandFull,
}

/// A card effect that could not be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EffectError {
    #[error("{owner} is down and cannot act")]
    OwnerDown { owner: Role },
    #[error("{0} is not registered")]
    UnknownCard(CardId),
}

/// An enemy action that could not be carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EnemyActionError {
    #[error("{slot} has no living party member to attack")]
    NoTarget { slot: EnemySlot },
    #[error("{slot} is not on the field")]
    NotOnField { slot: EnemySlot },
}

/// Why a session was lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    /// Every party member is at 0 HP.
    PartyWiped,
    /// The deck is empty after a turn resolved.
    DeckExhausted,
    /// The deck holds no card whose owner is alive.
    NoPlayableCards,
}

impl std::fmt::Display for LossReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            LossReason::PartyWiped => "the whole party is down",
            LossReason::DeckExhausted => "the deck is empty",
            LossReason::NoPlayableCards => "no playable cards remain",
        };
        f.write_str(text)
    }
}
