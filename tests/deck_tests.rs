//! Card economy tests.
//!
//! These tests drive the deck manager through its public API:
//! - drawing and hand slot allocation
//! - selection rules
//! - resolution, return-to-deck mana and stage reshuffle

use butler_ccg::cards::{CardType, Residency};
use butler_ccg::core::{BattleConfig, CombatState, CommandError, DrawError, GameRng, Role};
use butler_ccg::effects::ResolverContext;
use butler_ccg::events::{BattleEvent, EventLog};
use butler_ccg::rules::NoPacing;
use butler_ccg::zones::{DeckManager, SelectionChange, SelectionSlot};

fn combat() -> CombatState {
    let mut combat = CombatState::new(&BattleConfig::default());
    combat.spawn_wave(3);
    combat
}

/// Every circulating card lives in exactly one of deck, hand or discard.
fn assert_conserved(deck: &DeckManager, total: usize) {
    assert_eq!(deck.deck_len() + deck.hand_len() + deck.discard_len(), total);
    for card in deck.registry().iter() {
        let id = card.id;
        let places = [
            deck.deck().contains(&id),
            deck.hand().contains(&Some(id)),
            deck.discard().contains(&id),
        ];
        let count = places.iter().filter(|&&p| p).count();
        if card.is_ultimate() {
            assert_eq!(count, 0, "{id} is an ultimate and must not circulate");
            assert_eq!(card.residency, Residency::Reserved);
        } else {
            assert_eq!(count, 1, "{id} is in {count} collections");
        }
    }
}

#[test]
fn test_draw_until_empty() {
    let mut deck = DeckManager::with_cards([CardType::Lance, CardType::Levy, CardType::Resolve], 5, 5);
    let mut rng = GameRng::new(42);

    let slots: Vec<_> = (0..3).map(|_| deck.draw_card(&mut rng).unwrap().1).collect();
    assert_eq!(slots, vec![0, 1, 2]);

    assert_eq!(deck.draw_card(&mut rng), Err(DrawError::DeckEmpty));
    assert_eq!(deck.hand_len(), 3);
    assert_eq!(deck.discard_len(), 0);
    assert_conserved(&deck, 3);
}

#[test]
fn test_freed_slot_is_reused_first() {
    let mut deck = DeckManager::with_cards(vec![CardType::Lance; 6], 3, 5);
    let combat = combat();
    let mut rng = GameRng::new(1);
    for _ in 0..3 {
        deck.draw_card(&mut rng).unwrap();
    }

    let middle = deck.hand()[1].unwrap();
    deck.toggle_select(middle, &combat).unwrap();
    let mut combat = combat;
    deck.resolve_selected(
        &mut combat,
        &ResolverContext::default(),
        &mut NoPacing,
        &mut EventLog::new(),
    );
    assert_eq!(deck.hand()[1], None);

    let (_, slot) = deck.draw_card(&mut rng).unwrap();
    assert_eq!(slot, 1);
}

#[test]
fn test_selection_labels_follow_fill_order() {
    let config = BattleConfig::default();
    let combat = combat();
    let mut deck = DeckManager::new(&config);
    let mut rng = GameRng::new(config.seed);
    deck.deal_playable_hand(5, &combat, &mut rng).unwrap();

    let cards: Vec<_> = deck.hand_cards().map(|(_, c)| c).collect();
    let labels: Vec<_> = cards[..3]
        .iter()
        .map(|&card| match deck.toggle_select(card, &combat).unwrap() {
            SelectionChange::Selected { slot, .. } => slot.label(),
            SelectionChange::Deselected { slot, .. } => slot.label(),
        })
        .collect();

    assert_eq!(labels, vec!["First", "Second", "Third"]);
    assert_eq!(deck.toggle_select(cards[4], &combat), Err(CommandError::SelectionFull));
    assert_eq!(deck.selection().get(SelectionSlot::Third), Some(cards[2]));
}

#[test]
fn test_turn_economy() {
    let config = BattleConfig::default();
    let mut combat = combat();
    let mut deck = DeckManager::new(&config);
    let mut rng = GameRng::new(config.seed);
    let mut events = EventLog::new();
    deck.deal_playable_hand(5, &combat, &mut rng).unwrap();
    assert_conserved(&deck, 28);

    let hand: Vec<_> = deck.hand_cards().map(|(_, c)| c).collect();
    for &card in &hand[..3] {
        deck.toggle_select(card, &combat).unwrap();
    }
    let expected_mana: Vec<(Role, u32)> = hand[3..]
        .iter()
        .map(|&card| {
            let def = deck.definition(card).unwrap();
            (def.owner, def.mana_cost)
        })
        .collect();

    let resolved = deck.resolve_selected(
        &mut combat,
        &ResolverContext::from(&config),
        &mut NoPacing,
        &mut events,
    );
    assert_eq!(resolved.len(), 3);
    assert_eq!(deck.discard_len(), 3);
    assert_eq!(deck.hand_len(), 2);
    assert_conserved(&deck, 28);

    let mana_before: Vec<_> = Role::ALL.iter().map(|&r| combat.ally(r).current_mana()).collect();
    let returned = deck.return_hand(&mut combat, &mut events);
    assert_eq!(returned, 2);
    assert_eq!(deck.hand_len(), 0);
    assert_eq!(deck.deck_len(), 25);
    assert_conserved(&deck, 28);

    for role in Role::ALL {
        let gained: u32 = expected_mana
            .iter()
            .filter(|(owner, _)| *owner == role)
            .map(|(_, cost)| cost)
            .sum();
        let max = combat.ally(role).max_mana();
        assert_eq!(
            combat.ally(role).current_mana(),
            (mana_before[role.index()] + gained).min(max)
        );
    }

    let mana_events = events
        .iter()
        .filter(|e| matches!(e, BattleEvent::ManaGained { .. }))
        .count();
    assert_eq!(mana_events, 2);
}

#[test]
fn test_stage_reset_restores_full_deck() {
    let config = BattleConfig::default();
    let mut combat = combat();
    let mut deck = DeckManager::new(&config);
    let mut rng = GameRng::new(99);
    let mut events = EventLog::new();

    // Three turns of play without a reset
    for _ in 0..3 {
        deck.deal_playable_hand(5, &combat, &mut rng).unwrap();
        let picks: Vec<_> = deck.hand_cards().map(|(_, c)| c).take(3).collect();
        for card in picks {
            deck.toggle_select(card, &combat).unwrap();
        }
        deck.resolve_selected(&mut combat, &ResolverContext::default(), &mut NoPacing, &mut events);
        deck.return_hand(&mut combat, &mut events);
    }
    assert_eq!(deck.discard_len(), 9);

    let deck_before = deck.deck_len();
    let discard_before = deck.discard_len();
    let deck_after = deck.reset_for_stage(&mut rng);

    assert_eq!(deck_after, deck_before + discard_before);
    assert_eq!(deck.discard_len(), 0);
    assert!(deck
        .deck()
        .iter()
        .all(|&id| deck.registry().get(id).unwrap().residency == Residency::InDeck));
    assert_conserved(&deck, 28);
}
