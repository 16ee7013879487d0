//! Read-only battle snapshot for the UI.
//!
//! `BattleView` is computed from domain state on every call. Playability
//! and ultimate visibility are derived here from entity liveness and mana,
//! so the UI only renders booleans it is handed.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardType};
use crate::core::{CombatEntity, CombatState, Combatant, LossReason, Role, StatusBlock};
use crate::rules::{Battle, Pacer, TurnPhase};
use crate::zones::{DeckManager, SelectionSlot};

/// Vitals and status of one combatant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub combatant: Combatant,
    pub max_health: u32,
    pub current_health: u32,
    pub max_mana: u32,
    pub current_mana: u32,
    pub alive: bool,
    pub status: StatusBlock,
}

impl From<&CombatEntity> for EntityView {
    fn from(entity: &CombatEntity) -> Self {
        Self {
            combatant: entity.combatant(),
            max_health: entity.max_health(),
            current_health: entity.current_health(),
            max_mana: entity.max_mana(),
            current_mana: entity.current_mana(),
            alive: entity.is_alive(),
            status: entity.status.clone(),
        }
    }
}

/// One occupied hand slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCardView {
    pub slot: usize,
    pub card: CardId,
    pub card_type: CardType,
    pub owner: Role,
    pub mana_cost: u32,
    /// Owner is alive, so the card can be clicked.
    pub playable: bool,
    pub selected: Option<SelectionSlot>,
}

/// A role's ultimate card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UltimateView {
    pub role: Role,
    pub card: CardId,
    pub card_type: CardType,
    /// Owner alive with full mana.
    pub visible: bool,
    pub selected: Option<SelectionSlot>,
}

/// A filled selection slot with its ordinal label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCardView {
    pub slot: SelectionSlot,
    /// "First", "Second" or "Third".
    pub label: String,
    pub card: CardId,
    pub card_type: CardType,
}

/// Everything the UI needs to draw a frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleView {
    pub turn: u32,
    pub stage: u32,
    pub round: u32,
    pub phase: TurnPhase,
    pub input_enabled: bool,
    pub party: Vec<EntityView>,
    pub enemies: Vec<EntityView>,
    pub hand: Vec<HandCardView>,
    pub ultimates: Vec<UltimateView>,
    pub selection: Vec<SelectedCardView>,
    pub deck_count: usize,
    pub discard_count: usize,
    pub loss: Option<LossReason>,
}

impl BattleView {
    /// Snapshot a battle.
    #[must_use]
    pub fn capture<P: Pacer>(battle: &Battle<P>) -> Self {
        let combat = battle.combat();
        let deck = battle.deck();

        Self {
            turn: battle.turn(),
            stage: combat.stage(),
            round: combat.round(),
            phase: battle.phase(),
            input_enabled: battle.is_input_enabled(),
            party: combat.allies().map(EntityView::from).collect(),
            enemies: combat.enemies().iter().map(EntityView::from).collect(),
            hand: hand_view(deck, combat),
            ultimates: ultimate_view(deck, combat),
            selection: selection_view(deck),
            deck_count: deck.deck_len(),
            discard_count: deck.discard_len(),
            loss: battle.loss(),
        }
    }

    /// The party member with this role.
    #[must_use]
    pub fn ally(&self, role: Role) -> Option<&EntityView> {
        self.party
            .iter()
            .find(|view| view.combatant == Combatant::Party(role))
    }

    /// The ultimate entry for a role.
    #[must_use]
    pub fn ultimate(&self, role: Role) -> Option<&UltimateView> {
        self.ultimates.iter().find(|view| view.role == role)
    }
}

fn hand_view(deck: &DeckManager, combat: &CombatState) -> Vec<HandCardView> {
    deck.hand_cards()
        .filter_map(|(slot, card)| {
            let def = deck.definition(card)?;
            Some(HandCardView {
                slot,
                card,
                card_type: def.card_type,
                owner: def.owner,
                mana_cost: def.mana_cost,
                playable: deck.is_playable(card, combat),
                selected: deck.selection().slot_of(card),
            })
        })
        .collect()
}

fn ultimate_view(deck: &DeckManager, combat: &CombatState) -> Vec<UltimateView> {
    Role::ALL
        .into_iter()
        .filter_map(|role| {
            let card = deck.registry().ultimate(role)?;
            Some(UltimateView {
                role,
                card,
                card_type: CardType::ultimate_for(role),
                visible: combat.ultimate_ready(role),
                selected: deck.selection().slot_of(card),
            })
        })
        .collect()
}

fn selection_view(deck: &DeckManager) -> Vec<SelectedCardView> {
    deck.selection()
        .iter()
        .filter_map(|(slot, card)| {
            let def = deck.definition(card)?;
            Some(SelectedCardView {
                slot,
                label: slot.label().to_string(),
                card,
                card_type: def.card_type,
            })
        })
        .collect()
}
