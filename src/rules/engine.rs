//! The turn state machine.
//!
//! `Battle` owns the combat state, the deck manager and the RNG, and is the
//! only thing that mutates them. The UI talks to it through `Command`s and
//! reads it through `BattleView` and drained `BattleEvent`s.
//!
//! ## Turn Flow
//!
//! ```text
//! PlayerTurn (input on, hand dealt)
//!     | ConfirmSelection
//!     v
//! Resolving  - selected cards, return hand, loss check, wave check
//!     v
//! EnemyTurn  - bleed ticks, curse ticks, enemy actions, wave check
//!     v
//! PlayerTurn (next turn)
//! ```
//!
//! Loss is a side condition checked at fixed points. Once set, every command
//! except `RestartSession` is refused.
//!
//! ## Example
//!
//! ```
//! use butler_ccg::core::{BattleConfig, Command, CommandOutcome};
//! use butler_ccg::rules::{Battle, TurnPhase};
//!
//! let mut battle = Battle::new(BattleConfig::default().with_seed(3));
//! assert_eq!(battle.phase(), TurnPhase::PlayerTurn);
//!
//! let card = battle.view().hand[0].card;
//! battle.handle(Command::CardClicked(card)).unwrap();
//!
//! let outcome = battle.handle(Command::ConfirmSelection).unwrap();
//! assert!(matches!(outcome, CommandOutcome::TurnResolved(_)));
//! assert_eq!(battle.turn(), 2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cards::CardId;
use crate::core::{
    BattleConfig, CombatState, Command, CommandError, CommandOutcome, GameRng, LossReason,
    WaveAdvance,
};
use crate::effects::ResolverContext;
use crate::events::{BattleEvent, BattleView, EventLog, TickKind};
use crate::zones::{DeckManager, SelectionChange};

use super::enemy::{run_enemy_actions, tick_statuses, EnemyAttack};
use super::pacing::{FixedPacing, NoPacing, Pacer};

/// Phase of the turn loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the player to select and confirm.
    PlayerTurn,
    /// Selected cards are resolving.
    Resolving,
    /// Status ticks and enemy actions.
    EnemyTurn,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::PlayerTurn => f.write_str("player turn"),
            TurnPhase::Resolving => f.write_str("resolving"),
            TurnPhase::EnemyTurn => f.write_str("enemy turn"),
        }
    }
}

/// What one confirmed turn did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    /// Turn number that was confirmed.
    pub turn: u32,
    /// Cards whose effects applied, in resolution order.
    pub resolved: Vec<CardId>,
    /// Unplayed cards returned to the deck.
    pub returned: u32,
    /// Bleed and curse ticks applied.
    pub status_ticks: u32,
    /// Enemy attacks that landed.
    pub enemy_attacks: Vec<EnemyAttack>,
    /// Wave clears during the turn.
    pub waves_cleared: Vec<WaveAdvance>,
    /// Set when the turn ended the session.
    pub loss: Option<LossReason>,
}

impl TurnSummary {
    fn new(turn: u32) -> Self {
        Self {
            turn,
            ..Self::default()
        }
    }
}

/// A battle session.
pub struct Battle<P: Pacer = NoPacing> {
    config: BattleConfig,
    combat: CombatState,
    deck: DeckManager,
    starting_deck: DeckManager,
    rng: GameRng,
    context: ResolverContext,
    phase: TurnPhase,
    input_enabled: bool,
    turn: u32,
    loss: Option<LossReason>,
    events: EventLog,
    pacer: P,
}

impl Battle {
    /// Start a session with no pacing.
    #[must_use]
    pub fn new(config: BattleConfig) -> Self {
        Self::with_pacer(config, NoPacing)
    }
}

impl Battle<FixedPacing> {
    /// Start a session that sleeps for `config.pacing` at every beat.
    #[must_use]
    pub fn paced(config: BattleConfig) -> Self {
        let pacer = FixedPacing::new(config.pacing.clone());
        Self::with_pacer(config, pacer)
    }
}

impl<P: Pacer> Battle<P> {
    /// Start a session with a pacer.
    #[must_use]
    pub fn with_pacer(config: BattleConfig, pacer: P) -> Self {
        let deck = DeckManager::new(&config);
        Self::with_deck(config, deck, pacer)
    }

    /// Start a session from a prepared deck. Restarts rebuild this deck.
    #[must_use]
    pub fn with_deck(config: BattleConfig, deck: DeckManager, pacer: P) -> Self {
        let mut battle = Self {
            combat: CombatState::new(&config),
            starting_deck: deck.clone(),
            deck,
            rng: GameRng::new(config.seed),
            context: ResolverContext::from(&config),
            phase: TurnPhase::PlayerTurn,
            input_enabled: false,
            turn: 0,
            loss: None,
            events: EventLog::new(),
            pacer,
            config,
        };
        battle.start();
        battle
    }

    fn start(&mut self) {
        info!(seed = self.rng.seed(), "starting session");
        self.spawn_wave();
        self.begin_player_turn();
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub fn combat(&self) -> &CombatState {
        &self.combat
    }

    /// Mutable combat state, for scripted encounters and tests.
    pub fn combat_mut(&mut self) -> &mut CombatState {
        &mut self.combat
    }

    #[must_use]
    pub fn deck(&self) -> &DeckManager {
        &self.deck
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Turn counter; the first player turn is 1.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Why the session was lost, if it was.
    #[must_use]
    pub fn loss(&self) -> Option<LossReason> {
        self.loss
    }

    #[must_use]
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> BattleView {
        BattleView::capture(self)
    }

    /// Take all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.events.drain()
    }

    // === Commands ===

    /// Dispatch an inbound command.
    pub fn handle(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::CardClicked(card) => self.click_card(card).map(CommandOutcome::Selection),
            Command::ConfirmSelection => self.confirm_selection().map(CommandOutcome::TurnResolved),
            Command::RequestDraw => self.request_draw().map(CommandOutcome::Drew),
            Command::RestartSession => {
                self.restart();
                Ok(CommandOutcome::Restarted)
            }
        }
    }

    /// Toggle a card in or out of the selection.
    pub fn click_card(&mut self, card: CardId) -> Result<SelectionChange, CommandError> {
        if self.loss.is_some() {
            return Err(CommandError::SessionOver);
        }
        if !self.input_enabled {
            return Err(CommandError::InputDisabled);
        }
        let change = self.deck.toggle_select(card, &self.combat)?;
        self.events.push(BattleEvent::SelectionChanged(change));
        Ok(change)
    }

    /// Draw one card outside the deal. A failed draw is a logged no-op.
    pub fn request_draw(&mut self) -> Result<Option<CardId>, CommandError> {
        if self.loss.is_some() {
            return Err(CommandError::SessionOver);
        }
        if self.phase != TurnPhase::PlayerTurn {
            return Err(CommandError::InputDisabled);
        }
        match self.deck.draw_card(&mut self.rng) {
            Ok((card, slot)) => {
                self.push_drawn(card, slot);
                Ok(Some(card))
            }
            Err(reason) => {
                self.events.push(BattleEvent::DrawRejected { reason });
                Ok(None)
            }
        }
    }

    /// Confirm the selection and run the turn to completion.
    ///
    /// An empty selection is refused while anything is selectable. With a
    /// dead hand and no charged ultimate the turn passes with no plays.
    pub fn confirm_selection(&mut self) -> Result<TurnSummary, CommandError> {
        if self.loss.is_some() {
            return Err(CommandError::SessionOver);
        }
        if self.phase != TurnPhase::PlayerTurn {
            return Err(CommandError::AlreadyResolving);
        }
        if !self.input_enabled {
            return Err(CommandError::InputDisabled);
        }
        if self.deck.selection().is_empty() && self.deck.can_play_any(&self.combat) {
            return Err(CommandError::NothingSelected);
        }

        let mut summary = TurnSummary::new(self.turn);
        self.set_phase(TurnPhase::Resolving, false);

        summary.resolved = self
            .deck
            .resolve_selected(&mut self.combat, &self.context, &mut self.pacer, &mut self.events)
            .to_vec();
        summary.returned = self.deck.return_hand(&mut self.combat, &mut self.events) as u32;
        if self.check_loss() {
            return Ok(self.finish(summary));
        }

        if self.combat.all_enemies_dead() {
            summary.waves_cleared.push(self.clear_wave());
            if self.check_loss() {
                return Ok(self.finish(summary));
            }
        }

        self.run_enemy_phase(&mut summary);
        if self.check_loss() {
            return Ok(self.finish(summary));
        }

        self.begin_player_turn();
        Ok(self.finish(summary))
    }

    /// Throw the session away and start over on a forked RNG stream.
    pub fn restart(&mut self) {
        self.rng = self.rng.fork();
        self.combat = CombatState::new(&self.config);
        self.deck = self.starting_deck.clone();
        self.phase = TurnPhase::PlayerTurn;
        self.input_enabled = false;
        self.turn = 0;
        self.loss = None;
        self.events.push(BattleEvent::SessionRestarted {
            seed: self.rng.seed(),
        });
        self.start();
    }

    // === Turn steps ===

    fn set_phase(&mut self, phase: TurnPhase, input_enabled: bool) {
        self.phase = phase;
        self.input_enabled = input_enabled;
        self.events.push(BattleEvent::PhaseChanged {
            phase,
            input_enabled,
        });
    }

    fn begin_player_turn(&mut self) {
        self.turn += 1;
        self.set_phase(TurnPhase::PlayerTurn, true);
        info!(turn = self.turn, "player turn");
        self.events.push(BattleEvent::TurnStarted { turn: self.turn });

        match self
            .deck
            .deal_playable_hand(self.config.cards_per_turn, &self.combat, &mut self.rng)
        {
            Ok(count) => {
                let drawn: Vec<_> = self.deck.hand_cards().collect();
                for (slot, card) in drawn {
                    self.push_drawn(card, slot);
                }
                self.events.push(BattleEvent::HandDealt { cards: count as u32 });
            }
            Err(reason) => self.declare_loss(reason),
        }
    }

    fn push_drawn(&mut self, card: CardId, slot: usize) {
        if let Some(def) = self.deck.definition(card) {
            self.events.push(BattleEvent::CardDrawn {
                card,
                card_type: def.card_type,
                slot,
            });
        }
    }

    fn run_enemy_phase(&mut self, summary: &mut TurnSummary) {
        self.set_phase(TurnPhase::EnemyTurn, false);
        info!(turn = self.turn, "enemy turn");

        for kind in [TickKind::Bleed, TickKind::Curse] {
            summary.status_ticks +=
                tick_statuses(&mut self.combat, kind, &mut self.pacer, &mut self.events);
        }
        if self.combat.all_enemies_dead() {
            summary.waves_cleared.push(self.clear_wave());
            return;
        }

        summary.enemy_attacks = run_enemy_actions(
            &mut self.combat,
            &mut self.rng,
            &mut self.pacer,
            &mut self.events,
        );
        if self.combat.all_enemies_dead() {
            summary.waves_cleared.push(self.clear_wave());
        }
    }

    /// Advance past a dead wave: next round, or next stage with the deck
    /// reshuffle and party restore. Always spawns the next wave.
    fn clear_wave(&mut self) -> WaveAdvance {
        let advance = self.combat.advance_wave();
        self.events.push(BattleEvent::WaveCleared(advance));

        if let WaveAdvance::NextStage { stage } = advance {
            let deck_size = self.deck.reset_for_stage(&mut self.rng);
            info!(stage, deck_size, "stage reset");
            self.events.push(BattleEvent::DeckReshuffled {
                deck_size: deck_size as u32,
            });
            for restore in self.combat.restore_party() {
                self.events.push(BattleEvent::PartyRestored(restore));
            }
        }

        self.spawn_wave();
        advance
    }

    fn spawn_wave(&mut self) {
        let count = self.combat.spawn_wave(self.config.wave_size);
        self.events.push(BattleEvent::WaveSpawned {
            stage: self.combat.stage(),
            round: self.combat.round(),
            count: count as u32,
        });
    }

    /// Party wiped or deck empty ends the session.
    fn check_loss(&mut self) -> bool {
        if self.combat.all_allies_dead() {
            self.declare_loss(LossReason::PartyWiped);
        } else if self.deck.deck_len() == 0 {
            self.declare_loss(LossReason::DeckExhausted);
        }
        self.loss.is_some()
    }

    fn declare_loss(&mut self, reason: LossReason) {
        if self.loss.is_some() {
            return;
        }
        info!(%reason, turn = self.turn, "session lost");
        self.loss = Some(reason);
        self.input_enabled = false;
        self.events.push(BattleEvent::SessionLost { reason });
    }

    fn finish(&self, mut summary: TurnSummary) -> TurnSummary {
        summary.loss = self.loss;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardType;
    use crate::core::{EnemySlot, PacingConfig, Role};
    use crate::rules::Beat;

    fn battle() -> Battle {
        Battle::new(BattleConfig::default())
    }

    fn select_first(battle: &mut Battle, n: usize) -> Vec<CardId> {
        let cards: Vec<_> = battle
            .view()
            .hand
            .iter()
            .filter(|c| c.playable)
            .take(n)
            .map(|c| c.card)
            .collect();
        for &card in &cards {
            battle.click_card(card).unwrap();
        }
        cards
    }

    fn kill(battle: &mut Battle, role: Role) {
        battle.combat_mut().ally_mut(role).take_damage(1000);
    }

    #[test]
    fn test_session_starts_on_player_turn() {
        let battle = battle();
        assert_eq!(battle.turn(), 1);
        assert_eq!(battle.phase(), TurnPhase::PlayerTurn);
        assert!(battle.is_input_enabled());
        assert_eq!(battle.deck().hand_len(), 5);
        assert_eq!(battle.combat().living_enemies().len(), 3);
        assert_eq!(battle.loss(), None);
    }

    #[test]
    fn test_confirm_with_nothing_selected() {
        let mut battle = battle();
        assert_eq!(battle.confirm_selection(), Err(CommandError::NothingSelected));
        assert_eq!(battle.turn(), 1);
    }

    #[test]
    fn test_confirm_outside_player_turn_is_refused() {
        // `&mut self` keeps commands out while a turn resolves; the phase
        // guard still holds if the phase is ever left mid-turn
        let mut battle = battle();
        select_first(&mut battle, 1);
        battle.phase = TurnPhase::Resolving;

        assert_eq!(battle.confirm_selection(), Err(CommandError::AlreadyResolving));
        assert_eq!(battle.turn(), 1);
        assert_eq!(battle.deck().selection().len(), 1);
    }

    #[test]
    fn test_empty_confirm_passes_a_dead_hand() {
        let mut cards = vec![CardType::Lance; 6];
        cards.extend([CardType::CatchStitch; 2]);
        let all_guard_hand = (0..200)
            .map(|seed| {
                let config = BattleConfig::default().with_seed(seed);
                let deck = DeckManager::with_cards(cards.clone(), 5, 5);
                Battle::with_deck(config, deck, NoPacing)
            })
            .find(|b| b.view().hand.iter().all(|c| c.owner == Role::Guard));
        let mut battle = all_guard_hand.expect("some seed deals five Lances");
        kill(&mut battle, Role::Guard);
        assert!(battle.view().hand.iter().all(|c| !c.playable));

        let summary = battle.confirm_selection().unwrap();

        assert!(summary.resolved.is_empty());
        assert_eq!(summary.returned, 5);
        assert_eq!(summary.loss, None);
        assert_eq!(battle.turn(), 2);
        assert!(battle.view().hand.iter().any(|c| c.playable));
    }

    #[test]
    fn test_paced_battle_uses_configured_pacing() {
        let config = BattleConfig::default().with_pacing(PacingConfig::instant());
        let battle = Battle::paced(config);
        assert_eq!(battle.pacer(), &FixedPacing::new(PacingConfig::instant()));
    }

    #[test]
    fn test_full_turn_cycle() {
        let mut battle = battle();
        battle.drain_events();
        let selected = select_first(&mut battle, 3);

        let summary = battle.confirm_selection().unwrap();

        assert_eq!(summary.turn, 1);
        assert_eq!(summary.resolved, selected);
        assert_eq!(summary.returned, 2);
        assert_eq!(battle.turn(), 2);
        assert_eq!(battle.phase(), TurnPhase::PlayerTurn);
        assert!(battle.is_input_enabled());
        assert_eq!(battle.deck().discard_len(), 3);

        let events = battle.drain_events();
        let phases: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                BattleEvent::PhaseChanged { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![TurnPhase::Resolving, TurnPhase::EnemyTurn, TurnPhase::PlayerTurn]
        );
    }

    #[test]
    fn test_pacer_sees_every_beat() {
        let mut battle = Battle::with_pacer(BattleConfig::default(), Vec::<Beat>::new());
        let cards: Vec<_> = battle.view().hand.iter().take(2).map(|c| c.card).collect();
        for card in cards {
            battle.click_card(card).unwrap();
        }
        battle.combat_mut().enemy_mut(EnemySlot(1)).unwrap().status.bleed = 1;

        let summary = battle.confirm_selection().unwrap();

        let count = |beat: Beat| battle.pacer().iter().filter(|&&b| b == beat).count();
        assert_eq!(count(Beat::CardResolved), 2);
        assert_eq!(count(Beat::StatusTick), summary.status_ticks as usize);
        assert!(summary.status_ticks >= 1);
        assert_eq!(count(Beat::EnemyAction), summary.enemy_attacks.len());
    }

    #[test]
    fn test_party_wipe_is_a_loss() {
        let mut battle = battle();
        select_first(&mut battle, 1);
        for role in Role::ALL {
            battle.combat_mut().ally_mut(role).take_damage(1000);
        }

        let summary = battle.confirm_selection().unwrap();

        assert_eq!(summary.loss, Some(LossReason::PartyWiped));
        assert_eq!(battle.loss(), Some(LossReason::PartyWiped));
        assert!(!battle.is_input_enabled());
        assert_eq!(battle.confirm_selection(), Err(CommandError::SessionOver));
        assert_eq!(
            battle.handle(Command::RequestDraw),
            Err(CommandError::SessionOver)
        );
    }

    #[test]
    fn test_wave_clear_by_cards_spawns_next_wave_before_enemies_act() {
        let mut battle = battle();
        for slot in 0..3 {
            battle
                .combat_mut()
                .enemy_mut(EnemySlot(slot))
                .unwrap()
                .take_damage(1000);
        }
        select_first(&mut battle, 1);

        let summary = battle.confirm_selection().unwrap();

        assert_eq!(summary.waves_cleared, vec![WaveAdvance::NextRound { round: 2 }]);
        assert_eq!(battle.combat().round(), 2);
        // The fresh wave acted this turn
        assert_eq!(summary.enemy_attacks.len(), 3);
        assert!(summary.enemy_attacks.iter().all(|a| a.damage == 4));
    }

    #[test]
    fn test_bleed_wipe_skips_enemy_actions() {
        let mut battle = battle();
        for slot in 0..3 {
            let enemy = battle.combat_mut().enemy_mut(EnemySlot(slot)).unwrap();
            enemy.status.bleed = 50;
        }
        select_first(&mut battle, 1);

        let summary = battle.confirm_selection().unwrap();

        assert!(summary.enemy_attacks.is_empty());
        assert_eq!(summary.waves_cleared.len(), 1);
        assert_eq!(battle.combat().living_enemies().len(), 3);
    }

    #[test]
    fn test_stage_transition_resets_deck_and_party() {
        let config = BattleConfig::default().with_rounds_per_stage(1);
        let mut battle = Battle::new(config);
        select_first(&mut battle, 2);
        kill(&mut battle, Role::Tailor);
        for slot in 0..3 {
            battle
                .combat_mut()
                .enemy_mut(EnemySlot(slot))
                .unwrap()
                .take_damage(1000);
        }

        let summary = battle.confirm_selection().unwrap();

        assert_eq!(summary.waves_cleared, vec![WaveAdvance::NextStage { stage: 2 }]);
        assert_eq!(battle.combat().stage(), 2);
        assert_eq!(battle.combat().round(), 1);
        // Discard folded back: every circulating card is in deck or hand
        assert_eq!(battle.deck().discard_len(), 0);
        assert_eq!(battle.deck().deck_len() + battle.deck().hand_len(), 28);
        assert!(battle.combat().is_ally_alive(Role::Tailor));
    }

    #[test]
    fn test_no_playable_cards_is_a_loss() {
        let deck = DeckManager::with_cards([CardType::Lance, CardType::Aegis], 5, 5);
        let mut battle = Battle::with_deck(BattleConfig::default(), deck, NoPacing);
        kill(&mut battle, Role::Guard);
        let card = battle.deck().hand_cards().next().map(|(_, c)| c).unwrap();
        assert_eq!(
            battle.click_card(card),
            Err(CommandError::OwnerDown { card, owner: Role::Guard })
        );

        let ultimate = battle.deck().registry().ultimate(Role::Tailor).unwrap();
        battle.combat_mut().ally_mut(Role::Tailor).gain_mana(4);
        battle.click_card(ultimate).unwrap();
        let summary = battle.confirm_selection().unwrap();

        assert_eq!(summary.loss, Some(LossReason::NoPlayableCards));
    }

    #[test]
    fn test_restart_starts_fresh() {
        let mut battle = battle();
        for role in Role::ALL {
            battle.combat_mut().ally_mut(role).take_damage(1000);
        }
        select_first(&mut battle, 1);
        battle.confirm_selection().unwrap();
        assert!(battle.loss().is_some());

        assert_eq!(battle.handle(Command::RestartSession), Ok(CommandOutcome::Restarted));

        assert_eq!(battle.loss(), None);
        assert_eq!(battle.turn(), 1);
        assert_eq!(battle.combat().stage(), 1);
        assert_eq!(battle.deck().discard_len(), 0);
        assert!(battle.combat().living_allies().len() == 3);
        assert!(battle
            .drain_events()
            .iter()
            .any(|e| matches!(e, BattleEvent::SessionRestarted { .. })));
    }

    #[test]
    fn test_request_draw_into_full_hand_is_noop() {
        let mut battle = battle();
        assert_eq!(battle.request_draw(), Ok(None));
        assert_eq!(battle.deck().hand_len(), 5);
    }

    #[test]
    fn test_summary_serialization() {
        let mut battle = battle();
        select_first(&mut battle, 2);
        let summary = battle.confirm_selection().unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        let back: TurnSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, back);
    }
}
