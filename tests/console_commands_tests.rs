//! Command round-trip tests against the generator state

use dds_wavegen::console::{execute, CommandError, Console};
use dds_wavegen::dds::{
    GeneratorState, HarmonicError, SampleSink, Shape, SyncPin, WaveformTable, AMPL_RAMP_STEP,
};
use dds_wavegen::logging::{LogLevel, LogStream};

struct NullSink;

impl SampleSink for NullSink {
    fn write(&mut self, _a: u8, _b: u8) {}
}

struct NullPin;

impl SyncPin for NullPin {
    fn set_level(&self, _high: bool) {}
}

fn gen() -> GeneratorState {
    let gen = GeneratorState::new();
    gen.init();
    gen
}

fn run(gen: &GeneratorState, line: &str) -> Result<String, CommandError> {
    let log: LogStream = LogStream::new();
    let mut out = String::new();
    execute(gen, line, &mut out, &log, 0)?;
    Ok(out)
}

#[test]
fn test_frequency_round_trip() {
    let gen = gen();
    assert_eq!(run(&gen, "wfa1000").unwrap(), "");
    assert_eq!(run(&gen, "rfa").unwrap(), "rfa1000.0\r\n");
    // Channel B untouched.
    assert_eq!(run(&gen, "rfb").unwrap(), "rfb50.0\r\n");
}

#[test]
fn test_frequency_rejection_keeps_state() {
    let gen = gen();
    assert_eq!(run(&gen, "wfa9000"), Err(CommandError::FrequencyOutOfRange));
    assert_eq!(run(&gen, "wfa5"), Err(CommandError::FrequencyOutOfRange));
    // Garbage parses as 0, which is under MIN_FREQ_HZ.
    assert_eq!(run(&gen, "wfaxyz"), Err(CommandError::FrequencyOutOfRange));
    assert_eq!(run(&gen, "rfa").unwrap(), "rfa50.0\r\n");
}

#[test]
fn test_phase_round_trip_and_clamp() {
    let gen = gen();
    run(&gen, "wpa-90").unwrap();
    assert_eq!(run(&gen, "rpa").unwrap(), "rpa-90.0\r\n");

    run(&gen, "wpb500").unwrap();
    assert_eq!(run(&gen, "rpb").unwrap(), "rpb360.0\r\n");
}

#[test]
fn test_phase_clamp_logs_warning() {
    let gen = gen();
    let log: LogStream = LogStream::new();
    let mut out = String::new();

    // Out-of-range phase is clamped and applied, with a warning.
    execute(&gen, "wpb500", &mut out, &log, 7).unwrap();
    assert_eq!(out, "");

    let entry = log.drain().expect("clamp not logged");
    assert_eq!(entry.level, LogLevel::Warn);
    let msg = std::str::from_utf8(&entry.msg[..entry.len as usize]).unwrap();
    assert!(msg.contains("500"));
    assert_eq!(run(&gen, "rpb").unwrap(), "rpb360.0\r\n");

    // An in-range phase stays quiet.
    execute(&gen, "wpa-90", &mut out, &log, 8).unwrap();
    assert!(log.drain().is_none());
}

#[test]
fn test_amplitude_reads_ramped_value() {
    let gen = gen();
    let table = WaveformTable::build(Shape::Sine);
    run(&gen, "waa50").unwrap();

    // Before any tick the ramp has not moved.
    assert_eq!(run(&gen, "raa").unwrap(), "raa0.0\r\n");

    let mut sink = NullSink;
    let pin = NullPin;
    for _ in 0..(1.0 / AMPL_RAMP_STEP) as usize {
        gen.tick(&table, &mut sink, &pin);
    }
    assert_eq!(run(&gen, "raa").unwrap(), "raa50.0\r\n");
}

#[test]
fn test_amplitude_clamps_to_percent_range() {
    let gen = gen();
    run(&gen, "waa150").unwrap();
    assert_eq!(gen.channels[0].target_amplitude(), 1.0);
    run(&gen, "wab-5").unwrap();
    assert_eq!(gen.channels[1].target_amplitude(), 0.0);
}

#[test]
fn test_harmonic_round_trip() {
    let gen = gen();
    run(&gen, "wha3,10").unwrap();
    run(&gen, "whb5,5,-90").unwrap();

    assert_eq!(run(&gen, "rha").unwrap(), "rha3,10.0,0.0;\r\n");
    assert_eq!(run(&gen, "rhb").unwrap(), "rhb5,5.0,-90.0;\r\n");

    run(&gen, "wha5,20").unwrap();
    assert_eq!(run(&gen, "rha").unwrap(), "rha3,10.0,0.0;5,20.0,0.0;\r\n");

    run(&gen, "whcla").unwrap();
    assert_eq!(run(&gen, "rha").unwrap(), "rha\r\n");
    // Channel B survives a channel A clear.
    assert_eq!(run(&gen, "rhb").unwrap(), "rhb5,5.0,-90.0;\r\n");
}

#[test]
fn test_harmonic_rejections() {
    let gen = gen();
    assert_eq!(
        run(&gen, "wha4,10"),
        Err(CommandError::Harmonic(HarmonicError::InvalidOrder))
    );
    assert_eq!(
        run(&gen, "wha3,150"),
        Err(CommandError::Harmonic(HarmonicError::InvalidStrength))
    );
    assert_eq!(run(&gen, "wha3"), Err(CommandError::MalformedHarmonic));
    assert_eq!(run(&gen, "rha").unwrap(), "rha\r\n");
}

#[test]
fn test_unknown_command() {
    let gen = gen();
    assert_eq!(run(&gen, "bogus"), Err(CommandError::UnknownCommand));
    assert_eq!(run(&gen, "bogus").unwrap_err().code(), "E01");
}

#[test]
fn test_help_prints_usage() {
    let gen = gen();
    let out = run(&gen, "help").unwrap();
    assert!(out.contains("whcl[a|b]"));
    assert!(out.contains("wh[a|b]<n>,<percent>[,<phase_deg>]"));
}

#[test]
fn test_console_logs_rejections() {
    let gen = gen();
    let log: LogStream = LogStream::new();
    let mut console = Console::new();
    let mut out = String::new();

    for &b in b"wfa9000\r" {
        console.push_byte(b, &gen, &mut out, &log, 1234);
    }
    assert_eq!(out, "");
    let entry = log.drain().expect("rejection not logged");
    let msg = std::str::from_utf8(&entry.msg[..entry.len as usize]).unwrap();
    assert!(msg.contains("wfa9000"));
    assert!(msg.contains("E02"));
    assert_eq!(entry.timestamp_us, 1234);
}

#[test]
fn test_console_ignores_blank_lines() {
    let gen = gen();
    let log: LogStream = LogStream::new();
    let mut console = Console::new();
    let mut out = String::new();

    // CRLF terminators must not log an unknown-command for the LF.
    for &b in b"rfa\r\n\r\n" {
        console.push_byte(b, &gen, &mut out, &log, 0);
    }
    assert_eq!(out, "rfa50.0\r\n");
    assert!(log.drain().is_none());
}
