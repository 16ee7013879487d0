//! Outbound interface: the event queue and the battle snapshot.
//!
//! - `BattleEvent`: what happened, in order, drained by the UI
//! - `BattleView`: what the board looks like now

pub mod event;
pub mod view;

pub use event::{BattleEvent, EventLog, TickKind};
pub use view::{BattleView, EntityView, HandCardView, SelectedCardView, UltimateView};
