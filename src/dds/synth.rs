//! Per-tick synthesis
//!
//! Runs once per `PERIOD_US` from the sample timer: sync bookkeeping,
//! amplitude ramp, table lookup, additive harmonic mixing, DAC clamp,
//! accumulator advance. No error states and no allocation; everything
//! here must finish well inside one sample period.

use super::channel::ChannelState;
use super::table::{WaveformTable, TABLE_SIZE};
use super::{GeneratorState, SampleSink, SyncPin, AMPL_RAMP_STEP};

impl GeneratorState {
    /// One sample tick: produce and emit one sample per channel.
    pub fn tick(&self, table: &WaveformTable, sink: &mut impl SampleSink, pin: &impl SyncPin) {
        // Square-wave sync first, so a resync lands before this tick's
        // samples are computed.
        self.sync.advance(&self.channels, pin);

        let a = self.render_channel(0, table);
        let b = self.render_channel(1, table);

        // Both DACs written back to back; near-simultaneous is close
        // enough at a 50 us sample period.
        sink.write(a, b);

        for ch in &self.channels {
            ch.advance();
        }
    }

    fn render_channel(&self, idx: usize, table: &WaveformTable) -> u8 {
        let ch = &self.channels[idx];
        let ampl = ramp_amplitude(ch);

        let phase_acc = (ch.accumulator() + ch.phase_offset_ticks()) % TABLE_SIZE;
        let fundamental = WaveformTable::to_signed(table.sample(phase_acc));

        // Additive, unnormalized: the sum can leave [-1, 1] and the
        // final clamp soft-clips it.
        let mut harmonics_sum = 0.0f32;
        for slot in self.harmonics.active(idx) {
            let harmonic_idx =
                (slot.order as u64 * phase_acc as u64 + slot.phase_ticks as u64) % TABLE_SIZE as u64;
            let value = WaveformTable::to_signed(table.sample(harmonic_idx as u32));
            harmonics_sum += value * slot.strength();
        }

        let dac = ((fundamental + harmonics_sum) * ampl * 127.5 + 127.5).clamp(0.0, 255.0);
        dac as u8
    }
}

/// Move `current_amplitude` one step toward the target and return the
/// new value. Linear, no overshoot: snaps once the distance is within
/// one step.
#[inline]
fn ramp_amplitude(ch: &ChannelState) -> f32 {
    let target = ch.target_amplitude();
    let current = ch.current_amplitude();

    let next = if (current - target).abs() > AMPL_RAMP_STEP {
        if current < target {
            current + AMPL_RAMP_STEP
        } else {
            current - AMPL_RAMP_STEP
        }
    } else {
        target
    };

    ch.store_current_amplitude(next);
    next
}
