//! Battle configuration.
//!
//! `BattleConfig` collects every tunable the rules read: hand geometry,
//! wave/stage pacing, enemy scaling formulas, party vitals and presentation
//! delays. Defaults reproduce the documented game; builder methods override
//! individual values for tests and alternate encounters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::entity::Role;

/// Number of selection slots (First, Second, Third). Fixed by the rules.
pub const SELECTION_SLOTS: usize = 3;

/// Starting vitals for one party member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMemberConfig {
    pub role: Role,
    pub max_health: u32,
    pub max_mana: u32,
}

impl PartyMemberConfig {
    /// Create a party member config.
    #[must_use]
    pub const fn new(role: Role, max_health: u32, max_mana: u32) -> Self {
        Self {
            role,
            max_health,
            max_mana,
        }
    }
}

/// Presentation pauses between resolution steps.
///
/// Pure pacing: zero delays never change outcomes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause after each resolved card, in milliseconds.
    pub card_pause_ms: u64,
    /// Pause after each status tick and enemy action, in milliseconds.
    pub enemy_pause_ms: u64,
}

impl PacingConfig {
    /// No pauses at all.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            card_pause_ms: 0,
            enemy_pause_ms: 0,
        }
    }

    #[must_use]
    pub fn card_pause(&self) -> Duration {
        Duration::from_millis(self.card_pause_ms)
    }

    #[must_use]
    pub fn enemy_pause(&self) -> Duration {
        Duration::from_millis(self.enemy_pause_ms)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            card_pause_ms: 100,
            enemy_pause_ms: 250,
        }
    }
}

/// Complete battle configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// RNG seed. Same seed, same battle.
    pub seed: u64,

    // === Cards ===
    /// Hand slot count.
    pub hand_slots: usize,
    /// Cards dealt at the start of each player turn.
    pub cards_per_turn: usize,
    /// Redeal attempts when a hand has no playable card.
    pub deal_retry_limit: usize,
    /// Copies of each non-ultimate card in the starting deck.
    pub copies_per_card: usize,
    /// Damage added by a consumed Strength flag.
    pub strength_bonus: u32,

    // === Waves ===
    /// Enemies requested per wave.
    pub wave_size: usize,
    /// Enemy roster capacity.
    pub enemy_slots: usize,
    /// Rounds (waves) per stage.
    pub rounds_per_stage: u32,
    /// Enemy max health is `enemy_base_health + enemy_health_per_round * round`.
    pub enemy_base_health: u32,
    pub enemy_health_per_round: u32,
    /// Enemy hit is `enemy_base_damage + round - curse`, floored at 0.
    pub enemy_base_damage: u32,
    /// Fraction of max health a KO'd party member returns with at a stage reset.
    pub revive_fraction: f64,

    // === Party ===
    pub party: Vec<PartyMemberConfig>,

    // === Presentation ===
    pub pacing: PacingConfig,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            hand_slots: 5,
            cards_per_turn: 5,
            deal_retry_limit: 5,
            copies_per_card: 2,
            strength_bonus: 2,
            wave_size: 3,
            enemy_slots: 3,
            rounds_per_stage: 3,
            enemy_base_health: 6,
            enemy_health_per_round: 3,
            enemy_base_damage: 2,
            revive_fraction: 0.5,
            party: vec![
                PartyMemberConfig::new(Role::Guard, 30, 5),
                PartyMemberConfig::new(Role::Tailor, 22, 4),
                PartyMemberConfig::new(Role::Chamberlain, 20, 4),
            ],
            pacing: PacingConfig::default(),
        }
    }
}

impl BattleConfig {
    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the hand slot count and per-turn deal together.
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_slots = size;
        self.cards_per_turn = size;
        self
    }

    /// Set copies per card in the starting deck.
    #[must_use]
    pub fn with_copies_per_card(mut self, copies: usize) -> Self {
        self.copies_per_card = copies;
        self
    }

    /// Set rounds per stage.
    #[must_use]
    pub fn with_rounds_per_stage(mut self, rounds: u32) -> Self {
        self.rounds_per_stage = rounds.max(1);
        self
    }

    /// Set the wave size.
    #[must_use]
    pub fn with_wave_size(mut self, size: usize) -> Self {
        self.wave_size = size;
        self
    }

    /// Override one party member's vitals.
    #[must_use]
    pub fn with_party_member(mut self, member: PartyMemberConfig) -> Self {
        match self.party.iter_mut().find(|m| m.role == member.role) {
            Some(existing) => *existing = member,
            None => self.party.push(member),
        }
        self
    }

    /// Set presentation pacing.
    #[must_use]
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Vitals for a role, falling back to the default roster.
    #[must_use]
    pub fn party_member(&self, role: Role) -> PartyMemberConfig {
        self.party
            .iter()
            .find(|m| m.role == role)
            .cloned()
            .unwrap_or_else(|| {
                Self::default()
                    .party
                    .swap_remove(role.index())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BattleConfig::default();
        assert_eq!(config.hand_slots, 5);
        assert_eq!(config.rounds_per_stage, 3);
        assert_eq!(config.deal_retry_limit, 5);
        assert_eq!(config.strength_bonus, 2);
        assert_eq!(config.party.len(), 3);
        assert_eq!(config.party_member(Role::Guard).max_health, 30);
    }

    #[test]
    fn test_builder_pattern() {
        let config = BattleConfig::default()
            .with_seed(7)
            .with_hand_size(4)
            .with_rounds_per_stage(0)
            .with_party_member(PartyMemberConfig::new(Role::Tailor, 10, 2))
            .with_pacing(PacingConfig::instant());

        assert_eq!(config.seed, 7);
        assert_eq!(config.hand_slots, 4);
        assert_eq!(config.cards_per_turn, 4);
        assert_eq!(config.rounds_per_stage, 1);
        assert_eq!(config.party_member(Role::Tailor).max_mana, 2);
        assert_eq!(config.pacing.card_pause(), Duration::ZERO);
    }

    #[test]
    fn test_missing_party_member_falls_back() {
        let mut config = BattleConfig::default();
        config.party.clear();
        assert_eq!(config.party_member(Role::Chamberlain).max_health, 20);
    }

    #[test]
    fn test_serialization() {
        let config = BattleConfig::default().with_seed(99);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: BattleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
