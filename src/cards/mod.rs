//! Card system: catalogue, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardType`: Closed set of every card in the game
//! - `CardDefinition`: Static data (owner, cost, ultimate flag, numbers)
//! - `CardInstance`: One physical card and its residency
//! - `CardRegistry`: Owner of all instances in a session
//!
//! ## Ultimates
//!
//! Each role owns one ultimate. Ultimates are `Reserved` for the whole
//! session and never enter deck, hand or discard.

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardType};
pub use instance::{CardId, CardInstance, Residency};
pub use registry::CardRegistry;
