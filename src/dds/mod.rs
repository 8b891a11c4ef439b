//! Direct digital synthesis engine
//!
//! Core pipeline, run once per sample tick:
//! - Phase accumulator advance per channel (`channel`)
//! - Quarter-cycle waveform lookup with quadrant symmetry (`table`)
//! - Additive odd-harmonic mixing from a shared slot arena (`harmonics`)
//! - Amplitude ramp limiter and DAC clamp (`synth`)
//! - Square-wave sync derivation and phase resync (`sync`)

pub mod channel;
pub mod harmonics;
pub mod synth;
pub mod sync;
pub mod table;

pub use channel::ChannelState;
pub use harmonics::{HarmonicBank, HarmonicError, HarmonicSlot};
pub use sync::SyncState;
pub use table::{Shape, WaveformTable, QUARTER_LEN, TABLE_SIZE};

/// Sample tick period in microseconds.
pub const PERIOD_US: u32 = 50;

/// Allowed channel frequency range in Hz.
pub const MIN_FREQ_HZ: f32 = 20.0;
pub const MAX_FREQ_HZ: f32 = 8000.0;

/// Frequency both channels start at.
pub const DEFAULT_FREQ_HZ: f32 = 50.0;

/// Per-tick amplitude ramp step. 2^-14 is exactly representable, so the
/// ramp accumulates without rounding error and settles in exactly
/// `1 / AMPL_RAMP_STEP` ticks for a full-scale swing.
pub const AMPL_RAMP_STEP: f32 = 1.0 / 16384.0;

/// Harmonic slots per channel arena, and also the global active budget
/// shared across both channels.
pub const MAX_HARMONICS: usize = 8;

/// Output channel selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    A,
    B,
}

impl Channel {
    /// Array index for per-channel state.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::A => 0,
            Channel::B => 1,
        }
    }

    /// Lowercase letter used in the serial protocol.
    #[inline]
    pub fn letter(self) -> char {
        match self {
            Channel::A => 'a',
            Channel::B => 'b',
        }
    }
}

/// Destination for one pair of DAC samples per tick.
///
/// Contract: accept a value in 0..=255 per channel and hold it until the
/// next write. No backpressure.
pub trait SampleSink {
    fn write(&mut self, a: u8, b: u8);
}

/// Digital sync output pin.
///
/// Driven from both the timer tick and the edge interrupt, hence `&self`.
pub trait SyncPin: Sync {
    fn set_level(&self, high: bool);
}

/// All generator state shared between the three execution contexts.
///
/// Lives in a `static`; every field is lock-free.
pub struct GeneratorState {
    pub channels: [ChannelState; 2],
    pub harmonics: HarmonicBank,
    pub sync: SyncState,
}

impl GeneratorState {
    pub const fn new() -> Self {
        Self {
            channels: [ChannelState::new(), ChannelState::new()],
            harmonics: HarmonicBank::new(),
            sync: SyncState::new(),
        }
    }

    /// Apply default frequencies to the DDS step registers.
    ///
    /// Call once at startup before the sample timer starts.
    pub fn init(&self) {
        for ch in &self.channels {
            ch.set_frequency(DEFAULT_FREQ_HZ);
        }
    }

    #[inline]
    pub fn channel(&self, ch: Channel) -> &ChannelState {
        &self.channels[ch.index()]
    }
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self::new()
    }
}
