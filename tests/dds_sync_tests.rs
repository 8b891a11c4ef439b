//! Sync controller tests: square-wave derivation and resynchronization

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use dds_wavegen::dds::{GeneratorState, SampleSink, Shape, SyncPin, WaveformTable};

struct NullSink;

impl SampleSink for NullSink {
    fn write(&mut self, _a: u8, _b: u8) {}
}

struct CountingPin {
    level: AtomicBool,
    transitions: AtomicU32,
}

impl CountingPin {
    fn new() -> Self {
        Self {
            level: AtomicBool::new(false),
            transitions: AtomicU32::new(0),
        }
    }

    fn level(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }

    fn transitions(&self) -> u32 {
        self.transitions.load(Ordering::SeqCst)
    }
}

impl SyncPin for CountingPin {
    fn set_level(&self, high: bool) {
        if self.level.swap(high, Ordering::SeqCst) != high {
            self.transitions.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn setup() -> (GeneratorState, WaveformTable, CountingPin) {
    let gen = GeneratorState::new();
    gen.init();
    (gen, WaveformTable::build(Shape::Sine), CountingPin::new())
}

#[test]
fn test_period_derived_from_channel_a() {
    let (gen, table, pin) = setup();
    let mut sink = NullSink;
    gen.tick(&table, &mut sink, &pin);
    // 50 Hz at 50 us ticks: round(1e6 / (2*50) / 50) = 200
    assert_eq!(gen.sync.period_ticks(), 200);
}

#[test]
fn test_toggles_every_half_period() {
    let (gen, table, pin) = setup();
    let mut sink = NullSink;

    // First expiry: elapsed reaches 200 on the 201st tick.
    for _ in 0..200 {
        gen.tick(&table, &mut sink, &pin);
    }
    assert_eq!(pin.transitions(), 0);
    gen.tick(&table, &mut sink, &pin);
    assert_eq!(pin.transitions(), 1);
    assert!(pin.level());

    // Steady state: one transition every 200 ticks.
    for _ in 0..200 {
        gen.tick(&table, &mut sink, &pin);
    }
    assert_eq!(pin.transitions(), 2);
    assert!(!pin.level());
}

#[test]
fn test_rising_transition_resyncs_accumulators() {
    let (gen, table, pin) = setup();
    let mut sink = NullSink;
    gen.channels[0].set_phase(core::f32::consts::FRAC_PI_2);
    gen.channels[1].set_phase(-core::f32::consts::FRAC_PI_2);

    // Run up to the tick that toggles high. The resync happens before
    // that tick's accumulator advance, so afterwards each accumulator
    // is its offset plus one step.
    for _ in 0..201 {
        gen.tick(&table, &mut sink, &pin);
    }
    assert!(pin.level());
    for ch in &gen.channels {
        assert_eq!(
            ch.accumulator(),
            ch.phase_offset_ticks() + ch.phase_step()
        );
    }
}

#[test]
fn test_falling_transition_does_not_resync() {
    let (gen, table, pin) = setup();
    let mut sink = NullSink;

    for _ in 0..401 {
        gen.tick(&table, &mut sink, &pin);
    }
    assert!(!pin.level());
    // 200 free-running ticks since the rising resync.
    let expected = (gen.channels[0].phase_step() * 201) % 65536;
    assert_eq!(gen.channels[0].accumulator(), expected);
}

#[test]
fn test_threshold_update_keeps_running_counter() {
    let (gen, table, pin) = setup();
    let mut sink = NullSink;

    for _ in 0..150 {
        gen.tick(&table, &mut sink, &pin);
    }
    assert_eq!(pin.transitions(), 0);

    // Channel A speeds up: period drops to 100 ticks. The counter is
    // already past it, so the very next tick toggles.
    gen.channels[0].set_frequency(100.0);
    gen.tick(&table, &mut sink, &pin);
    assert_eq!(gen.sync.period_ticks(), 100);
    assert_eq!(pin.transitions(), 1);
}

#[test]
fn test_external_resync_forces_high_and_offsets() {
    let (gen, table, pin) = setup();
    let mut sink = NullSink;
    gen.channels[0].set_phase(core::f32::consts::PI);

    for _ in 0..57 {
        gen.tick(&table, &mut sink, &pin);
    }
    gen.sync.external_resync(&gen.channels, &pin);

    assert!(pin.level());
    assert!(gen.sync.output_level());
    assert_eq!(gen.sync.elapsed_ticks(), 0);
    for ch in &gen.channels {
        assert_eq!(ch.accumulator(), ch.phase_offset_ticks());
    }
}

#[test]
fn test_external_resync_is_idempotent() {
    let (gen, table, pin) = setup();
    let mut sink = NullSink;

    for _ in 0..33 {
        gen.tick(&table, &mut sink, &pin);
    }
    for _ in 0..5 {
        gen.sync.external_resync(&gen.channels, &pin);
    }
    assert!(pin.level());
    assert_eq!(gen.sync.elapsed_ticks(), 0);
    for ch in &gen.channels {
        assert_eq!(ch.accumulator(), ch.phase_offset_ticks());
    }
}
