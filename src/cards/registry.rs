//! Card registry - every card instance in a session.
//!
//! The `CardRegistry` owns all `CardInstance`s, allocates their IDs and is the
//! single place residency is recorded. The deck manager keeps the ordered
//! deck/hand/discard collections and updates residency here as cards move.

use rustc_hash::FxHashMap;

use super::definition::CardType;
use super::instance::{CardId, CardInstance, Residency};
use crate::core::entity::Role;

/// Registry of card instances.
///
/// ## Example
///
/// ```
/// use butler_ccg::cards::{CardRegistry, CardType, Residency};
/// use butler_ccg::core::Role;
///
/// let registry = CardRegistry::starter(2);
///
/// // Two copies of each circulating card plus one ultimate per role
/// assert_eq!(registry.len(), CardType::DECK.len() * 2 + 3);
///
/// let bulwark = registry.ultimate(Role::Guard).unwrap();
/// assert_eq!(registry.get(bulwark).unwrap().residency, Residency::Reserved);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardInstance>,
    ultimates: FxHashMap<Role, CardId>,
    next_id: u32,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the starting card pool: `copies` of every circulating card and
    /// one ultimate per role.
    #[must_use]
    pub fn starter(copies: usize) -> Self {
        let mut registry = Self::new();
        for card_type in CardType::DECK {
            for _ in 0..copies {
                registry.create(card_type);
            }
        }
        for role in Role::ALL {
            registry.create(CardType::ultimate_for(role));
        }
        registry
    }

    /// Create a card instance with a fresh ID.
    ///
    /// Ultimates are indexed by owner; creating a second ultimate for the
    /// same role replaces the index entry.
    pub fn create(&mut self, card_type: CardType) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;

        let card = CardInstance::new(id, card_type);
        if card.is_ultimate() {
            self.ultimates.insert(card.definition().owner, id);
        }
        self.cards.insert(id, card);
        id
    }

    /// Get a card instance by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    /// Update where a card lives. Returns `false` for unknown IDs.
    pub fn set_residency(&mut self, id: CardId, residency: Residency) -> bool {
        match self.cards.get_mut(&id) {
            Some(card) => {
                card.residency = residency;
                true
            }
            None => false,
        }
    }

    /// The ultimate owned by a role.
    #[must_use]
    pub fn ultimate(&self, role: Role) -> Option<CardId> {
        self.ultimates.get(&role).copied()
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// IDs of all circulating (non-ultimate) cards, in ID order.
    #[must_use]
    pub fn circulating_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<_> = self
            .cards
            .values()
            .filter(|c| !c.is_ultimate())
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all card instances.
    pub fn iter(&self) -> impl Iterator<Item = &CardInstance> {
        self.cards.values()
    }
}
