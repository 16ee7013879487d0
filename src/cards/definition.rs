//! Card catalogue - the closed set of card types and their static data.
//!
//! Each `CardType` has exactly one `CardDefinition`: owning role, mana cost,
//! ultimate flag and the numbers its effect uses. The numbers are part of the
//! rules, not flavour; the effect resolver reads them from here.

use serde::{Deserialize, Serialize};

use crate::core::entity::Role;

/// Every card in the game.
///
/// The effect resolver matches on this exhaustively, so adding a variant
/// without an effect does not compile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardType {
    // === Guard ===
    Lance,
    Chivalry,
    Aegis,
    Denounce,

    // === Tailor ===
    CatchStitch,
    ChainStitch,
    BackStitch,
    Unseam,
    Resolve,

    // === Chamberlain ===
    Levy,
    Lacerate,
    Tithe,
    Patronage,
    RoyalReprieve,

    // === Ultimates ===
    Bulwark,
    Tapestry,
    Reckoning,
}

impl CardType {
    /// Cards that circulate through deck, hand and discard.
    pub const DECK: [CardType; 14] = [
        CardType::Lance,
        CardType::Chivalry,
        CardType::Aegis,
        CardType::Denounce,
        CardType::CatchStitch,
        CardType::ChainStitch,
        CardType::BackStitch,
        CardType::Unseam,
        CardType::Resolve,
        CardType::Levy,
        CardType::Lacerate,
        CardType::Tithe,
        CardType::Patronage,
        CardType::RoyalReprieve,
    ];

    /// The ultimate belonging to a role.
    #[must_use]
    pub const fn ultimate_for(role: Role) -> CardType {
        match role {
            Role::Guard => CardType::Bulwark,
            Role::Tailor => CardType::Tapestry,
            Role::Chamberlain => CardType::Reckoning,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardType::Lance => "Lance",
            CardType::Chivalry => "Chivalry",
            CardType::Aegis => "Aegis",
            CardType::Denounce => "Denounce",
            CardType::CatchStitch => "Catch Stitch",
            CardType::ChainStitch => "Chain Stitch",
            CardType::BackStitch => "Back Stitch",
            CardType::Unseam => "Unseam",
            CardType::Resolve => "Resolve",
            CardType::Levy => "Levy",
            CardType::Lacerate => "Lacerate",
            CardType::Tithe => "Tithe",
            CardType::Patronage => "Patronage",
            CardType::RoyalReprieve => "Royal Reprieve",
            CardType::Bulwark => "Bulwark",
            CardType::Tapestry => "Tapestry",
            CardType::Reckoning => "Reckoning",
        }
    }

    /// Static data for this card type.
    #[must_use]
    pub const fn definition(self) -> CardDefinition {
        use CardType::*;
        use Role::*;

        // (owner, cost, ultimate, power, stacks)
        let (owner, mana_cost, is_ultimate, power, stacks) = match self {
            Lance => (Guard, 2, false, 4, 0),
            Chivalry => (Guard, 1, false, 0, 0),
            Aegis => (Guard, 2, false, 0, 1),
            Denounce => (Guard, 1, false, 0, 1),

            CatchStitch => (Tailor, 1, false, 3, 0),
            ChainStitch => (Tailor, 2, false, 2, 0),
            BackStitch => (Tailor, 1, false, 0, 0),
            Unseam => (Tailor, 2, false, 4, 1),
            Resolve => (Tailor, 1, false, 2, 1),

            Levy => (Chamberlain, 2, false, 2, 0),
            Lacerate => (Chamberlain, 2, false, 1, 1),
            Tithe => (Chamberlain, 2, false, 3, 0),
            Patronage => (Chamberlain, 1, false, 2, 1),
            RoyalReprieve => (Chamberlain, 3, false, 2, 0),

            Bulwark => (Guard, 0, true, 4, 1),
            Tapestry => (Tailor, 0, true, 8, 0),
            Reckoning => (Chamberlain, 0, true, 0, 0),
        };

        CardDefinition {
            card_type: self,
            owner,
            mana_cost,
            is_ultimate,
            power,
            stacks,
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Static card data.
///
/// `power` is the card's damage or heal amount; `stacks` is the number of
/// status stacks (shield, bleed, curse, mana) it applies. Which one a card
/// uses is decided by its effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardDefinition {
    pub card_type: CardType,
    /// Party role that owns and plays the card.
    pub owner: Role,
    /// Mana granted back to the owner when the card returns unplayed.
    pub mana_cost: u32,
    /// Ultimates live outside deck circulation.
    pub is_ultimate: bool,
    pub power: u32,
    pub stacks: u32,
}
