//! Inbound commands from the UI collaborator.
//!
//! The UI never mutates state directly. It sends a `Command` to
//! `Battle::handle` and gets back a `CommandOutcome` or a `CommandError`.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::rules::TurnSummary;
use crate::zones::SelectionChange;

/// Something the player (or the UI on their behalf) asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Toggle a card in or out of the selection.
    CardClicked(CardId),
    /// End the player phase and resolve the selection.
    ConfirmSelection,
    /// Draw one card into the hand. Internal, not bound to player input.
    RequestDraw,
    /// Throw the session away and start over.
    RestartSession,
}

/// What an accepted command did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// A card was selected or deselected.
    Selection(SelectionChange),
    /// The turn resolved (possibly ending in a loss).
    TurnResolved(TurnSummary),
    /// A draw was attempted; `None` means it was a logged no-op.
    Drew(Option<CardId>),
    /// A fresh session started.
    Restarted,
}
