//! Square-wave sync derivation and phase resynchronization
//!
//! A half-period counter derived from channel A's *live* frequency
//! toggles the sync output pin; on each rising transition both channels'
//! phase accumulators snap back to their configured offsets. The edge
//! interrupt on the sync input performs the same resync asynchronously.
//! Both paths write the same atomics; whichever fires last wins.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::channel::ChannelState;
use super::{SyncPin, PERIOD_US};

/// Sync output state, shared between the timer tick and the edge ISR.
pub struct SyncState {
    period_ticks: AtomicU32,
    elapsed_ticks: AtomicU32,
    output_level: AtomicBool,
}

impl SyncState {
    pub const fn new() -> Self {
        Self {
            period_ticks: AtomicU32::new(0),
            elapsed_ticks: AtomicU32::new(0),
            output_level: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn output_level(&self) -> bool {
        self.output_level.load(Ordering::Acquire)
    }

    #[inline]
    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks.load(Ordering::Acquire)
    }

    #[inline]
    pub fn period_ticks(&self) -> u32 {
        self.period_ticks.load(Ordering::Acquire)
    }

    /// Timer-tick path. Recomputes the half-period threshold from
    /// channel A's current frequency without resetting the running
    /// counter (a threshold change must not pop mid-cycle), toggles on
    /// expiry, and resyncs both channels on the rising transition.
    pub fn advance(&self, channels: &[ChannelState; 2], pin: &impl SyncPin) {
        let period = half_period_ticks(channels[0].frequency());
        self.period_ticks.store(period, Ordering::Release);

        if self.elapsed_ticks.load(Ordering::Acquire) >= period {
            let high = !self.output_level.load(Ordering::Acquire);
            self.output_level.store(high, Ordering::Release);
            pin.set_level(high);
            if high {
                channels[0].resync();
                channels[1].resync();
            }
            self.elapsed_ticks.store(0, Ordering::Release);
        }
        self.elapsed_ticks.fetch_add(1, Ordering::AcqRel);
    }

    /// Edge-interrupt path: force the output high and resync both
    /// channels. Idempotent under repeated rapid edges. Must stay
    /// short: atomic stores and one pin write only.
    pub fn external_resync(&self, channels: &[ChannelState; 2], pin: &impl SyncPin) {
        self.elapsed_ticks.store(0, Ordering::Release);
        self.output_level.store(true, Ordering::Release);
        pin.set_level(true);
        channels[0].resync();
        channels[1].resync();
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

/// Half square-wave period in sample ticks for a given frequency.
#[inline]
fn half_period_ticks(freq_hz: f32) -> u32 {
    (1e6 / (2.0 * freq_hz) / PERIOD_US as f32 + 0.5) as u32
}
