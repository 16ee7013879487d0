//! Presentation pacing.
//!
//! The battle calls `Pacer::pause` at each suspension point: after every
//! resolved card, every status tick and every enemy action. A pacer may
//! block, record or do nothing, but it never sees or touches battle state,
//! so removing every pause cannot change an outcome.

use std::thread;

use serde::{Deserialize, Serialize};

use crate::core::PacingConfig;

/// Kind of suspension point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Beat {
    /// A selected card finished resolving.
    CardResolved,
    /// A bleed or curse tick landed.
    StatusTick,
    /// An enemy finished its action.
    EnemyAction,
}

/// Hook invoked between resolution steps.
pub trait Pacer {
    fn pause(&mut self, beat: Beat);
}

/// Never waits. The default for headless use and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self, _beat: Beat) {}
}

/// Sleeps the configured duration on the calling thread.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedPacing {
    config: PacingConfig,
}

impl FixedPacing {
    #[must_use]
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }
}

impl Pacer for FixedPacing {
    fn pause(&mut self, beat: Beat) {
        let duration = match beat {
            Beat::CardResolved => self.config.card_pause(),
            Beat::StatusTick | Beat::EnemyAction => self.config.enemy_pause(),
        };
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Records every beat. Handy for asserting resolution order.
impl Pacer for Vec<Beat> {
    fn pause(&mut self, beat: Beat) {
        self.push(beat);
    }
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self, beat: Beat) {
        (**self).pause(beat);
    }
}
