//! Shared odd-harmonic slot arena
//!
//! Two per-channel arenas of `MAX_HARMONICS` slots with one *global*
//! active budget across both channels. A slot packs order, strength,
//! phase and the cached phase ticks into a single `AtomicU64`, so the
//! tick context always reads a consistent slot even while the command
//! context rewrites it.
//!
//! Slot layout (LSB first):
//! ```text
//! [order:16][strength_pm:16][phase_deg10:16][phase_ticks:16]
//! ```
//! Strength is stored in 0.1% units (0..=1000), phase in 0.1-degree
//! units. An all-zero word is an empty slot.

use core::f32::consts::PI;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use super::channel::phase_to_ticks;
use super::MAX_HARMONICS;

/// Decoded view of one harmonic slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarmonicSlot {
    /// Harmonic order, odd and >= 3 when active.
    pub order: u16,
    /// Strength in 0.1% units (0..=1000).
    pub strength_pm: u16,
    /// Phase in 0.1-degree units.
    pub phase_deg10: i16,
    /// Phase offset in table-index ticks, derived at write time.
    pub phase_ticks: u16,
}

impl HarmonicSlot {
    /// Strength as a fraction in [0, 1].
    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength_pm as f32 / 1000.0
    }

    /// Strength as a percentage.
    #[inline]
    pub fn strength_pct(&self) -> f32 {
        self.strength_pm as f32 / 10.0
    }

    /// Phase in degrees.
    #[inline]
    pub fn phase_deg(&self) -> f32 {
        self.phase_deg10 as f32 / 10.0
    }

    /// Active slots contribute to the output and count against the
    /// global budget.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.order >= 3 && self.strength_pm > 0
    }

    fn encode(&self) -> u64 {
        (self.order as u64)
            | (self.strength_pm as u64) << 16
            | (self.phase_deg10 as u16 as u64) << 32
            | (self.phase_ticks as u64) << 48
    }

    fn decode(raw: u64) -> Self {
        Self {
            order: raw as u16,
            strength_pm: (raw >> 16) as u16,
            phase_deg10: (raw >> 32) as u16 as i16,
            phase_ticks: (raw >> 48) as u16,
        }
    }
}

/// Rejection reasons for a harmonic write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HarmonicError {
    /// Order must be odd and >= 3.
    InvalidOrder,
    /// Strength percentage must be within 0..=100.
    InvalidStrength,
    /// All slots across both channels are in use.
    CapacityExhausted,
}

impl fmt::Display for HarmonicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOrder => f.write_str("harmonic order must be odd and >= 3"),
            Self::InvalidStrength => f.write_str("harmonic percent must be 0-100"),
            Self::CapacityExhausted => f.write_str("max harmonics reached globally"),
        }
    }
}

/// Both channels' slot arenas plus the shared budget.
pub struct HarmonicBank {
    slots: [[AtomicU64; MAX_HARMONICS]; 2],
}

impl HarmonicBank {
    pub const fn new() -> Self {
        const EMPTY: AtomicU64 = AtomicU64::new(0);
        Self {
            slots: [[EMPTY; MAX_HARMONICS], [EMPTY; MAX_HARMONICS]],
        }
    }

    /// Write or update one harmonic.
    ///
    /// A slot whose order already exists in this channel's arena is
    /// updated in place, which never consumes budget (that includes
    /// re-activating a silenced slot). A new order claims the first
    /// free slot, but only while the global active count is below
    /// `MAX_HARMONICS`. Setting strength 0 on a new order is a no-op.
    pub fn set(
        &self,
        channel: usize,
        order: i32,
        strength_pct: f32,
        phase_deg: f32,
    ) -> Result<(), HarmonicError> {
        if order < 3 || order % 2 == 0 || order > u16::MAX as i32 {
            return Err(HarmonicError::InvalidOrder);
        }
        if !(0.0..=100.0).contains(&strength_pct) {
            return Err(HarmonicError::InvalidStrength);
        }

        let deg = phase_deg % 360.0;
        let slot = HarmonicSlot {
            order: order as u16,
            strength_pm: (strength_pct * 10.0 + 0.5) as u16,
            phase_deg10: (deg * 10.0 + if deg >= 0.0 { 0.5 } else { -0.5 }) as i16,
            phase_ticks: phase_to_ticks(deg * PI / 180.0) as u16,
        };

        let arena = &self.slots[channel];

        // Update in place if this order is already claimed here.
        for cell in arena {
            if HarmonicSlot::decode(cell.load(Ordering::Acquire)).order == slot.order {
                cell.store(slot.encode(), Ordering::Release);
                return Ok(());
            }
        }

        // A brand-new silent harmonic has nothing to claim.
        if slot.strength_pm == 0 {
            return Ok(());
        }

        if self.active_count() >= MAX_HARMONICS {
            return Err(HarmonicError::CapacityExhausted);
        }

        for cell in arena {
            let existing = HarmonicSlot::decode(cell.load(Ordering::Acquire));
            if existing.order == 0 || existing.strength_pm == 0 {
                cell.store(slot.encode(), Ordering::Release);
                return Ok(());
            }
        }

        // Channel arena itself is full of active slots.
        Err(HarmonicError::CapacityExhausted)
    }

    /// Reset every slot of one channel to empty. Freed slots are
    /// immediately available to either channel.
    pub fn clear(&self, channel: usize) {
        for cell in &self.slots[channel] {
            cell.store(0, Ordering::Release);
        }
    }

    /// Active slots of one channel, in slot order (not sorted by
    /// harmonic order).
    pub fn active(&self, channel: usize) -> impl Iterator<Item = HarmonicSlot> + '_ {
        self.slots[channel]
            .iter()
            .map(|cell| HarmonicSlot::decode(cell.load(Ordering::Acquire)))
            .filter(HarmonicSlot::is_active)
    }

    /// Active slot count summed across both channels.
    pub fn active_count(&self) -> usize {
        (0..2).map(|ch| self.active(ch).count()).sum()
    }
}

impl Default for HarmonicBank {
    fn default() -> Self {
        Self::new()
    }
}
