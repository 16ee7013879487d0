//! Deck, hand and discard management.
//!
//! The `DeckManager` owns the card economy of a session:
//!
//! - `deck`: cards waiting to be drawn (order irrelevant; draws are uniform)
//! - `hand`: fixed slot array, `None` for a free slot
//! - `discard`: played non-ultimate cards until the next stage reset
//! - `selection`: up to three chosen plays, resolved First, Second, Third
//!
//! Ultimates never circulate. They stay `Reserved` in the registry and are
//! selectable whenever their owner's mana is full.
//!
//! ## Card Lifecycle
//!
//! ```text
//! deck --draw--> hand --resolve--> discard --stage reset--> deck
//!                 |
//!                 +--return (mana to owner)--> deck
//! ```
//!
//! ## Usage
//!
//! ```
//! use butler_ccg::core::{BattleConfig, CombatState, GameRng};
//! use butler_ccg::zones::DeckManager;
//!
//! let config = BattleConfig::default();
//! let combat = CombatState::new(&config);
//! let mut rng = GameRng::new(config.seed);
//! let mut deck = DeckManager::new(&config);
//!
//! let dealt = deck.deal_playable_hand(5, &combat, &mut rng).unwrap();
//! assert_eq!(dealt, 5);
//! assert_eq!(deck.deck_len(), 28 - 5);
//! ```

use im::Vector;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::cards::{CardDefinition, CardId, CardRegistry, CardType, Residency};
use crate::core::{
    BattleConfig, CombatState, CommandError, DrawError, EffectError, GameRng, LossReason, Role,
};
use crate::effects::{EffectResolver, ResolverContext};
use crate::events::{BattleEvent, EventLog};
use crate::rules::{Beat, Pacer};

use super::selection::{Selection, SelectionChange};

/// Owns every card location for one session.
#[derive(Clone, Debug)]
pub struct DeckManager {
    registry: CardRegistry,
    deck: Vector<CardId>,
    hand: Vec<Option<CardId>>,
    discard: Vector<CardId>,
    selection: Selection,
    retry_limit: usize,
}

impl DeckManager {
    /// Build the starting deck from configuration: `copies_per_card` of
    /// every circulating card, plus one reserved ultimate per role.
    #[must_use]
    pub fn new(config: &BattleConfig) -> Self {
        Self::from_registry(
            CardRegistry::starter(config.copies_per_card),
            config.hand_slots,
            config.deal_retry_limit,
        )
    }

    /// Build a deck from an explicit card list (plus one ultimate per role).
    #[must_use]
    pub fn with_cards(
        cards: impl IntoIterator<Item = CardType>,
        hand_slots: usize,
        retry_limit: usize,
    ) -> Self {
        let mut registry = CardRegistry::new();
        for card_type in cards {
            registry.create(card_type);
        }
        for role in Role::ALL {
            if registry.ultimate(role).is_none() {
                registry.create(CardType::ultimate_for(role));
            }
        }
        Self::from_registry(registry, hand_slots, retry_limit)
    }

    fn from_registry(mut registry: CardRegistry, hand_slots: usize, retry_limit: usize) -> Self {
        let deck: Vector<CardId> = registry.circulating_ids().into_iter().collect();
        for &id in &deck {
            registry.set_residency(id, Residency::InDeck);
        }
        Self {
            registry,
            deck,
            hand: vec![None; hand_slots],
            discard: Vector::new(),
            selection: Selection::new(),
            retry_limit: retry_limit.max(1),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn deck(&self) -> &Vector<CardId> {
        &self.deck
    }

    #[must_use]
    pub fn discard(&self) -> &Vector<CardId> {
        &self.discard
    }

    /// Hand slots; `None` is a free slot.
    #[must_use]
    pub fn hand(&self) -> &[Option<CardId>] {
        &self.hand
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Occupied hand slots.
    #[must_use]
    pub fn hand_len(&self) -> usize {
        self.hand.iter().flatten().count()
    }

    /// Occupied hand slots with their card, in slot order.
    pub fn hand_cards(&self) -> impl Iterator<Item = (usize, CardId)> + '_ {
        self.hand
            .iter()
            .enumerate()
            .filter_map(|(slot, card)| card.map(|card| (slot, card)))
    }

    /// Definition of a registered card.
    #[must_use]
    pub fn definition(&self, card: CardId) -> Option<CardDefinition> {
        self.registry.get(card).map(|instance| instance.definition())
    }

    fn owner_alive(&self, card: CardId, combat: &CombatState) -> bool {
        self.definition(card)
            .is_some_and(|def| combat.is_ally_alive(def.owner))
    }

    /// Can this card be selected right now?
    ///
    /// Circulating cards need a living owner. Ultimates also need full mana.
    #[must_use]
    pub fn is_playable(&self, card: CardId, combat: &CombatState) -> bool {
        match self.definition(card) {
            Some(def) if def.is_ultimate => combat.ultimate_ready(def.owner),
            Some(def) => combat.is_ally_alive(def.owner),
            None => false,
        }
    }

    /// Does the hand hold at least one card with a living owner?
    #[must_use]
    pub fn hand_has_playable(&self, combat: &CombatState) -> bool {
        self.hand_cards()
            .any(|(_, card)| self.owner_alive(card, combat))
    }

    /// Could the player select anything at all: a hand card with a living
    /// owner, or a charged ultimate?
    #[must_use]
    pub fn can_play_any(&self, combat: &CombatState) -> bool {
        self.hand_has_playable(combat)
            || Role::ALL
                .into_iter()
                .any(|role| combat.ultimate_ready(role))
    }

    /// Does the deck hold at least one card with a living owner?
    #[must_use]
    pub fn deck_has_playable(&self, combat: &CombatState) -> bool {
        self.deck.iter().any(|&card| self.owner_alive(card, combat))
    }

    // === Drawing ===

    /// Draw a uniformly random deck card into the first free hand slot.
    ///
    /// Failures leave every collection untouched.
    pub fn draw_card(&mut self, rng: &mut GameRng) -> Result<(CardId, usize), DrawError> {
        if self.deck.is_empty() {
            warn!("draw rejected: deck is empty");
            return Err(DrawError::DeckEmpty);
        }
        let Some(slot) = self.hand.iter().position(Option::is_none) else {
            warn!("draw rejected: no free hand slot");
            return Err(DrawError::HandFull);
        };
        let index = rng.pick_index(self.deck.len()).ok_or(DrawError::DeckEmpty)?;

        let card = self.deck.remove(index);
        self.hand[slot] = Some(card);
        self.registry.set_residency(card, Residency::InHand(slot));

        debug!(%card, slot, deck = self.deck.len(), "drew card");
        Ok((card, slot))
    }

    /// Move every hand card back into the deck with no reward.
    fn stash_hand(&mut self) {
        for slot in 0..self.hand.len() {
            if let Some(card) = self.hand[slot].take() {
                self.deck.push_back(card);
                self.registry.set_residency(card, Residency::InDeck);
            }
        }
        self.selection.clear();
    }

    /// Deal `n` cards, guaranteeing a playable card when the deck has one.
    ///
    /// The hand is stashed and redrawn up to the retry limit until a card
    /// with a living owner shows up. If every attempt misses, a random card
    /// of the last hand is swapped for a random living-owner deck card.
    /// Returns the number of cards in hand.
    pub fn deal_playable_hand(
        &mut self,
        n: usize,
        combat: &CombatState,
        rng: &mut GameRng,
    ) -> Result<usize, LossReason> {
        if !self.deck_has_playable(combat) && !self.hand_has_playable(combat) {
            return Err(LossReason::NoPlayableCards);
        }

        for attempt in 1..=self.retry_limit {
            self.stash_hand();
            for _ in 0..n {
                if self.draw_card(rng).is_err() {
                    break;
                }
            }
            if self.hand_has_playable(combat) {
                debug!(attempt, cards = self.hand_len(), "dealt playable hand");
                return Ok(self.hand_len());
            }
            debug!(attempt, "dealt hand has no living owner, redealing");
        }

        if self.swap_in_playable(combat, rng) {
            debug!(attempts = self.retry_limit, "swapped a playable card into the hand");
        } else {
            warn!(attempts = self.retry_limit, "accepting hand without a playable card");
        }
        Ok(self.hand_len())
    }

    /// Trade a random hand card for a random deck card with a living owner.
    fn swap_in_playable(&mut self, combat: &CombatState, rng: &mut GameRng) -> bool {
        let slots: SmallVec<[usize; 8]> = self.hand_cards().map(|(slot, _)| slot).collect();
        let candidates: Vec<usize> = self
            .deck
            .iter()
            .enumerate()
            .filter(|&(_, &card)| self.owner_alive(card, combat))
            .map(|(index, _)| index)
            .collect();
        let (Some(&slot), Some(&index)) = (rng.choose(&slots), rng.choose(&candidates)) else {
            return false;
        };
        let Some(outgoing) = self.hand[slot] else {
            return false;
        };

        let incoming = self.deck.remove(index);
        self.deck.push_back(outgoing);
        self.registry.set_residency(outgoing, Residency::InDeck);
        self.hand[slot] = Some(incoming);
        self.registry.set_residency(incoming, Residency::InHand(slot));
        debug!(%outgoing, %incoming, slot, "swapped hand card");
        true
    }

    // === Selection ===

    /// Select or deselect a card.
    ///
    /// A selected card is always deselectable. Selecting requires a living
    /// owner, a charged ultimate (for ultimates) or a hand slot (for
    /// everything else), and an open selection slot.
    pub fn toggle_select(
        &mut self,
        card: CardId,
        combat: &CombatState,
    ) -> Result<SelectionChange, CommandError> {
        let instance = self.registry.get(card).ok_or(CommandError::UnknownCard(card))?;

        if let Some(slot) = self.selection.slot_of(card) {
            self.selection.take(slot);
            debug!(%card, %slot, "deselected");
            return Ok(SelectionChange::Deselected { card, slot });
        }

        let owner = instance.definition().owner;
        if !combat.is_ally_alive(owner) {
            return Err(CommandError::OwnerDown { card, owner });
        }
        if instance.is_ultimate() {
            if !combat.ultimate_ready(owner) {
                return Err(CommandError::UltimateNotReady { owner });
            }
        } else if instance.hand_slot().is_none() {
            return Err(CommandError::NotInHand(card));
        }

        let slot = self.selection.first_open().ok_or(CommandError::SelectionFull)?;
        self.selection.set(slot, card);
        debug!(%card, %slot, "selected");
        Ok(SelectionChange::Selected { card, slot })
    }

    // === Resolution ===

    /// Resolve the selection in slot order.
    ///
    /// Each card's failure is logged and reported, then resolution moves on.
    /// Afterwards non-ultimates go to discard and ultimates drain their
    /// owner's mana. Returns the cards whose effects applied.
    pub fn resolve_selected(
        &mut self,
        combat: &mut CombatState,
        context: &ResolverContext,
        pacer: &mut dyn Pacer,
        events: &mut EventLog,
    ) -> SmallVec<[CardId; 3]> {
        let mut resolved = SmallVec::new();
        let plays: SmallVec<[_; 3]> = self.selection.iter().collect();

        for (slot, card) in plays {
            self.selection.take(slot);

            let Some(def) = self.definition(card) else {
                warn!(%card, "selected card is not registered");
                events.push(BattleEvent::CardFailed {
                    card,
                    error: EffectError::UnknownCard(card),
                });
                continue;
            };

            match EffectResolver::resolve(&def, combat, context) {
                Ok(report) => {
                    events.push(BattleEvent::CardResolved { card, report });
                    resolved.push(card);
                }
                Err(error) => {
                    warn!(%card, %error, "card effect failed");
                    events.push(BattleEvent::CardFailed { card, error });
                }
            }

            if def.is_ultimate {
                combat.ally_mut(def.owner).consume_all_mana();
                events.push(BattleEvent::UltimateSpent {
                    role: def.owner,
                    card,
                });
            } else {
                self.discard_from_hand(card);
                events.push(BattleEvent::CardDiscarded { card });
            }

            pacer.pause(Beat::CardResolved);
        }

        resolved
    }

    fn discard_from_hand(&mut self, card: CardId) {
        if let Some(slot) = self.hand.iter().position(|&c| c == Some(card)) {
            self.hand[slot] = None;
        }
        self.discard.push_back(card);
        self.registry.set_residency(card, Residency::InDiscard);
    }

    /// Return unplayed hand cards to the deck.
    ///
    /// Each card's owner gains mana equal to its cost, knocked out or not.
    /// Returns the number of cards returned.
    pub fn return_hand(&mut self, combat: &mut CombatState, events: &mut EventLog) -> usize {
        let mut returned = 0;
        for slot in 0..self.hand.len() {
            let Some(card) = self.hand[slot].take() else {
                continue;
            };
            self.deck.push_back(card);
            self.registry.set_residency(card, Residency::InDeck);
            events.push(BattleEvent::CardReturned { card });
            returned += 1;

            let Some(def) = self.definition(card) else {
                continue;
            };
            if def.mana_cost > 0 {
                combat.ally_mut(def.owner).gain_mana(def.mana_cost);
                events.push(BattleEvent::ManaGained {
                    role: def.owner,
                    amount: def.mana_cost,
                });
            }
        }
        self.selection.clear();
        debug!(returned, deck = self.deck.len(), "returned hand");
        returned
    }

    // === Stage reset ===

    /// Fold discard into the deck and shuffle. Returns the new deck size.
    pub fn reset_for_stage(&mut self, rng: &mut GameRng) -> usize {
        let mut cards: Vec<CardId> = self.deck.iter().copied().collect();
        for card in std::mem::take(&mut self.discard) {
            if self.registry.set_residency(card, Residency::InDeck) {
                cards.push(card);
            } else {
                warn!(%card, "dropping unregistered card from discard");
            }
        }
        rng.shuffle(&mut cards);
        self.deck = cards.into_iter().collect();

        debug!(deck = self.deck.len(), "reshuffled for new stage");
        self.deck.len()
    }
}
