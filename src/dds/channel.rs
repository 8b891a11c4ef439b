//! Per-channel tunable parameters and DDS runtime state
//!
//! Written by the command task, read (and partly written) by the timer
//! tick and the sync interrupt. Every field is a single-word atomic so no
//! context can observe a torn value; f32 fields travel as bit patterns.

use core::f32::consts::TAU;
use core::sync::atomic::{AtomicU32, Ordering};

use super::table::TABLE_SIZE;
use super::PERIOD_US;

/// One output channel's state.
///
/// `frequency` / `phase` / `target_amplitude` are owned by the command
/// context; `phase_accumulator` / `current_amplitude` by the tick and
/// sync contexts. `phase_step` and `phase_offset_ticks` are derived at
/// write time, never recomputed per sample.
pub struct ChannelState {
    frequency: AtomicU32,
    phase: AtomicU32,
    target_amplitude: AtomicU32,
    current_amplitude: AtomicU32,
    phase_accumulator: AtomicU32,
    phase_step: AtomicU32,
    phase_offset_ticks: AtomicU32,
}

impl ChannelState {
    pub const fn new() -> Self {
        Self {
            frequency: AtomicU32::new(0),
            phase: AtomicU32::new(0),
            target_amplitude: AtomicU32::new(0),
            current_amplitude: AtomicU32::new(0),
            phase_accumulator: AtomicU32::new(0),
            phase_step: AtomicU32::new(1),
            phase_offset_ticks: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        f32::from_bits(self.frequency.load(Ordering::Acquire))
    }

    /// Set the frequency in Hz and refresh the derived step and phase
    /// offset. The caller validates the range.
    pub fn set_frequency(&self, freq_hz: f32) {
        self.frequency.store(freq_hz.to_bits(), Ordering::Release);
        self.update_step();
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        f32::from_bits(self.phase.load(Ordering::Acquire))
    }

    /// Set the phase in radians, clamped to [-2π, 2π], and refresh the
    /// cached offset ticks.
    pub fn set_phase(&self, phase_rad: f32) {
        let clamped = phase_rad.clamp(-TAU, TAU);
        self.phase.store(clamped.to_bits(), Ordering::Release);
        self.phase_offset_ticks
            .store(phase_to_ticks(clamped), Ordering::Release);
    }

    #[inline]
    pub fn target_amplitude(&self) -> f32 {
        f32::from_bits(self.target_amplitude.load(Ordering::Acquire))
    }

    /// Set the ramp target, a fraction in [0, 1].
    pub fn set_target_amplitude(&self, ampl: f32) {
        self.target_amplitude.store(ampl.to_bits(), Ordering::Release);
    }

    #[inline]
    pub fn current_amplitude(&self) -> f32 {
        f32::from_bits(self.current_amplitude.load(Ordering::Acquire))
    }

    /// Tick context only.
    #[inline]
    pub(crate) fn store_current_amplitude(&self, ampl: f32) {
        self.current_amplitude.store(ampl.to_bits(), Ordering::Release);
    }

    #[inline]
    pub fn accumulator(&self) -> u32 {
        self.phase_accumulator.load(Ordering::Acquire)
    }

    #[inline]
    pub fn phase_step(&self) -> u32 {
        self.phase_step.load(Ordering::Acquire)
    }

    #[inline]
    pub fn phase_offset_ticks(&self) -> u32 {
        self.phase_offset_ticks.load(Ordering::Acquire)
    }

    /// Advance the accumulator by one step, wrapping at TABLE_SIZE.
    #[inline]
    pub(crate) fn advance(&self) {
        let acc = self.phase_accumulator.load(Ordering::Acquire);
        let next = (acc + self.phase_step.load(Ordering::Acquire)) % TABLE_SIZE;
        self.phase_accumulator.store(next, Ordering::Release);
    }

    /// Snap the accumulator back to the configured phase offset.
    ///
    /// Called on sync transitions and from the edge interrupt.
    #[inline]
    pub fn resync(&self) {
        self.phase_accumulator
            .store(self.phase_offset_ticks.load(Ordering::Acquire), Ordering::Release);
    }

    /// Recompute `phase_step` and `phase_offset_ticks` from the current
    /// frequency and phase.
    fn update_step(&self) {
        let step = (TABLE_SIZE as f32 * self.frequency() * PERIOD_US as f32 / 1e6 + 0.5) as u32;
        self.phase_step.store(step, Ordering::Release);
        self.phase_offset_ticks
            .store(phase_to_ticks(self.phase()), Ordering::Release);
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a phase in radians to table-index ticks, wrapped into
/// [0, TABLE_SIZE). Negative phases wrap to the equivalent positive
/// offset.
pub fn phase_to_ticks(phase_rad: f32) -> u32 {
    let scaled = phase_rad * TABLE_SIZE as f32 / TAU;
    let rounded = if scaled >= 0.0 { scaled + 0.5 } else { scaled - 0.5 };
    (rounded as i64).rem_euclid(TABLE_SIZE as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_derivation() {
        let ch = ChannelState::new();
        ch.set_frequency(50.0);
        // 65536 * 50 * 50 / 1e6 = 163.84 -> 164
        assert_eq!(ch.phase_step(), 164);

        ch.set_frequency(8000.0);
        // 65536 * 8000 * 50 / 1e6 = 26214.4 -> 26214
        assert_eq!(ch.phase_step(), 26214);
    }

    #[test]
    fn test_negative_phase_wraps() {
        let ch = ChannelState::new();
        ch.set_phase(-core::f32::consts::FRAC_PI_2);
        // -90 deg = -16384 ticks -> 49152
        assert_eq!(ch.phase_offset_ticks(), TABLE_SIZE - TABLE_SIZE / 4);
    }

    #[test]
    fn test_phase_clamped() {
        let ch = ChannelState::new();
        ch.set_phase(10.0 * TAU);
        assert_eq!(ch.phase(), TAU);
        ch.set_phase(-10.0 * TAU);
        assert_eq!(ch.phase(), -TAU);
    }

    #[test]
    fn test_resync_restores_offset() {
        let ch = ChannelState::new();
        ch.set_frequency(1000.0);
        ch.set_phase(core::f32::consts::PI);
        for _ in 0..17 {
            ch.advance();
        }
        assert_ne!(ch.accumulator(), ch.phase_offset_ticks());
        ch.resync();
        assert_eq!(ch.accumulator(), ch.phase_offset_ticks());
    }
}
