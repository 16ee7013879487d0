//! Card locations: deck, hand, discard and the turn's selection.
//!
//! ## Key Types
//!
//! - `DeckManager`: owns every card location and moves cards between them
//! - `Selection`: the three ordered play slots
//! - `SelectionSlot`: First, Second, Third
//! - `SelectionChange`: result of toggling a card

pub mod manager;
pub mod selection;

pub use manager::DeckManager;
pub use selection::{Selection, SelectionChange, SelectionSlot};
