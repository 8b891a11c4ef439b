//! Quarter-cycle waveform lookup table
//!
//! Only the first quadrant is stored; the other three are reconstructed
//! through mirror / 255-complement symmetry. The table is built by a
//! `const fn` (Taylor-series sine, good to well under one 8-bit count on
//! the first quadrant), so it can live in flash as a `static`.

/// Full-cycle resolution in table-index units.
pub const TABLE_SIZE: u32 = 1 << 16;

/// Stored entries: one quarter cycle.
pub const QUARTER_LEN: usize = (TABLE_SIZE / 4) as usize;

/// Base shape the table encodes.
///
/// The quadrant reconstruction rule differs between the two: a sine
/// quarter rises 128..=255 and mirrors unmodified into quadrant 2, while
/// a cosine quarter falls 255..=128 and needs the complement there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Sine,
    Cosine,
}

/// One quarter cycle of the reference waveform, 8-bit unsigned samples.
pub struct WaveformTable {
    quarter: [u8; QUARTER_LEN],
    shape: Shape,
}

impl WaveformTable {
    /// Build the quarter table for `shape`.
    ///
    /// Entry `i` samples the shape at angle `i * (PI/2) / QUARTER_LEN`,
    /// mapped from [-1, 1] to [0, 255] with rounding.
    pub const fn build(shape: Shape) -> Self {
        let mut quarter = [0u8; QUARTER_LEN];
        let mut i = 0;
        while i < QUARTER_LEN {
            let angle = core::f64::consts::FRAC_PI_2 * (i as f64) / (QUARTER_LEN as f64);
            let v = match shape {
                Shape::Sine => const_sin(angle),
                Shape::Cosine => const_sin(core::f64::consts::FRAC_PI_2 - angle),
            };
            quarter[i] = (v * 127.5 + 127.5 + 0.5) as u8;
            i += 1;
        }
        Self { quarter, shape }
    }

    /// Full-cycle lookup at a cyclic index.
    ///
    /// Pure: reduces `index` modulo `TABLE_SIZE` and derives quadrants
    /// 2..4 from the stored quarter.
    #[inline]
    pub fn sample(&self, index: u32) -> u8 {
        let q = QUARTER_LEN as u32;
        let idx = index % TABLE_SIZE;
        match self.shape {
            Shape::Sine => {
                if idx < q {
                    self.quarter[idx as usize]
                } else if idx < 2 * q {
                    self.quarter[(q - 1 - (idx - q)) as usize]
                } else if idx < 3 * q {
                    255 - self.quarter[(idx - 2 * q) as usize]
                } else {
                    255 - self.quarter[(q - 1 - (idx - 3 * q)) as usize]
                }
            }
            Shape::Cosine => {
                if idx < q {
                    self.quarter[idx as usize]
                } else if idx < 2 * q {
                    255 - self.quarter[(q - 1 - (idx - q)) as usize]
                } else if idx < 3 * q {
                    255 - self.quarter[(idx - 2 * q) as usize]
                } else {
                    self.quarter[(q - 1 - (idx - 3 * q)) as usize]
                }
            }
        }
    }

    /// Map an 8-bit sample back to [-1, 1].
    #[inline]
    pub fn to_signed(value: u8) -> f32 {
        (value as f32 - 127.5) / 127.5
    }
}

/// Const-compatible sine via Taylor series.
///
/// Only ever called with x in [0, PI/2], where the x^9 term already
/// bounds the error far below one table count.
const fn const_sin(x: f64) -> f64 {
    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;
    let x9 = x7 * x2;

    x - x3 / 6.0 + x5 / 120.0 - x7 / 5040.0 + x9 / 362880.0
}
