//! The player's chosen plays for the current turn.
//!
//! Three ordered slots fill left to right (First, Second, Third) and resolve
//! in that order. Deselecting leaves a gap that the next selection fills.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::config::SELECTION_SLOTS;

/// One of the three selection slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SelectionSlot {
    First,
    Second,
    Third,
}

impl SelectionSlot {
    /// Slots in resolution order.
    pub const ALL: [SelectionSlot; SELECTION_SLOTS] =
        [SelectionSlot::First, SelectionSlot::Second, SelectionSlot::Third];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            SelectionSlot::First => 0,
            SelectionSlot::Second => 1,
            SelectionSlot::Third => 2,
        }
    }

    /// Slot for an index, if in range.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SelectionSlot::First),
            1 => Some(SelectionSlot::Second),
            2 => Some(SelectionSlot::Third),
            _ => None,
        }
    }

    /// Ordinal label the UI places over the card.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SelectionSlot::First => "First",
            SelectionSlot::Second => "Second",
            SelectionSlot::Third => "Third",
        }
    }
}

impl std::fmt::Display for SelectionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of toggling a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionChange {
    Selected { card: CardId, slot: SelectionSlot },
    Deselected { card: CardId, slot: SelectionSlot },
}

/// Fixed array of selection slots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    slots: [Option<CardId>; SELECTION_SLOTS],
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot holding this card, if selected.
    #[must_use]
    pub fn slot_of(&self, card: CardId) -> Option<SelectionSlot> {
        self.slots
            .iter()
            .position(|&c| c == Some(card))
            .and_then(SelectionSlot::from_index)
    }

    /// First empty slot, left to right.
    #[must_use]
    pub fn first_open(&self) -> Option<SelectionSlot> {
        self.slots
            .iter()
            .position(Option::is_none)
            .and_then(SelectionSlot::from_index)
    }

    /// Card in a slot.
    #[must_use]
    pub fn get(&self, slot: SelectionSlot) -> Option<CardId> {
        self.slots[slot.index()]
    }

    /// Put a card in a slot.
    pub fn set(&mut self, slot: SelectionSlot, card: CardId) {
        self.slots[slot.index()] = Some(card);
    }

    /// Empty a slot, returning what was there.
    pub fn take(&mut self, slot: SelectionSlot) -> Option<CardId> {
        self.slots[slot.index()].take()
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots = [None; SELECTION_SLOTS];
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.slot_of(card).is_some()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupied slots in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (SelectionSlot, CardId)> + '_ {
        SelectionSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|card| (slot, card)))
    }
}
