//! Card instances - one physical card and where it currently lives.
//!
//! A `CardInstance` pairs a `CardId` with its `CardType` and a `Residency`.
//! Every card is in exactly one place at a time:
//!
//! - `InDeck`, `InHand(slot)`, `InDiscard` for circulating cards
//! - `Reserved` for ultimates, which never circulate
//!
//! Selection is not a residency: a selected card stays `InHand` until it
//! resolves.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardType};

/// Unique identifier for a card instance within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Where a card instance currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Residency {
    InDeck,
    /// In hand, occupying the given hand slot.
    InHand(usize),
    InDiscard,
    /// Outside circulation (ultimates).
    Reserved,
}

/// A card in the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: CardId,
    pub card_type: CardType,
    pub residency: Residency,
}

impl CardInstance {
    /// Create an instance. Ultimates start `Reserved`, everything else `InDeck`.
    #[must_use]
    pub fn new(id: CardId, card_type: CardType) -> Self {
        let residency = if card_type.definition().is_ultimate {
            Residency::Reserved
        } else {
            Residency::InDeck
        };
        Self {
            id,
            card_type,
            residency,
        }
    }

    /// Static data for this card.
    #[must_use]
    pub fn definition(&self) -> CardDefinition {
        self.card_type.definition()
    }

    #[must_use]
    pub fn is_ultimate(&self) -> bool {
        self.definition().is_ultimate
    }

    /// Hand slot, if the card is in hand.
    #[must_use]
    pub fn hand_slot(&self) -> Option<usize> {
        match self.residency {
            Residency::InHand(slot) => Some(slot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_initial_residency() {
        let lance = CardInstance::new(CardId::new(1), CardType::Lance);
        assert_eq!(lance.residency, Residency::InDeck);
        assert!(!lance.is_ultimate());

        let bulwark = CardInstance::new(CardId::new(2), CardType::Bulwark);
        assert_eq!(bulwark.residency, Residency::Reserved);
        assert!(bulwark.is_ultimate());
    }

    #[test]
    fn test_hand_slot() {
        let mut card = CardInstance::new(CardId::new(1), CardType::Levy);
        assert_eq!(card.hand_slot(), None);
        card.residency = Residency::InHand(3);
        assert_eq!(card.hand_slot(), Some(3));
    }
}
