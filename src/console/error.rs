//! Command rejection reasons

use crate::dds::HarmonicError;

/// Why a command line was rejected. The write is dropped, prior state
/// stays, and the error is logged; the serial side gets no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// E01: Unknown command
    UnknownCommand,
    /// E02: Frequency outside [MIN_FREQ_HZ, MAX_FREQ_HZ]
    FrequencyOutOfRange,
    /// E03: Harmonic write without the `<order>,<pct>` pair
    MalformedHarmonic,
    /// E04-E06: Rejected by the harmonic bank
    Harmonic(HarmonicError),
}

impl CommandError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::FrequencyOutOfRange => "E02",
            Self::MalformedHarmonic => "E03",
            Self::Harmonic(HarmonicError::InvalidOrder) => "E04",
            Self::Harmonic(HarmonicError::InvalidStrength) => "E05",
            Self::Harmonic(HarmonicError::CapacityExhausted) => "E06",
        }
    }
}

impl From<HarmonicError> for CommandError {
    fn from(err: HarmonicError) -> Self {
        Self::Harmonic(err)
    }
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownCommand => write!(f, "{}: unknown command", self.code()),
            Self::FrequencyOutOfRange => write!(f, "{}: frequency out of range", self.code()),
            Self::MalformedHarmonic => {
                write!(f, "{}: use wh[a|b]<order>,<pct>[,<phase_deg>]", self.code())
            }
            Self::Harmonic(err) => write!(f, "{}: {}", self.code(), err),
        }
    }
}
