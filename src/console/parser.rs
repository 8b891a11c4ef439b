//! Command line parser
//!
//! Grammar: `[r|w][f|p|a|h][a|b][<args>]`, plus `whcl[a|b]` and `help`.
//! Numeric arguments follow strtof/strtol semantics: the longest leading
//! prefix that parses is taken, and a prefix that parses as nothing is 0.

use crate::dds::Channel;

/// A fully parsed command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    WriteFrequency { channel: Channel, freq_hz: f32 },
    ReadFrequency { channel: Channel },
    WritePhase { channel: Channel, phase_deg: f32 },
    ReadPhase { channel: Channel },
    WriteAmplitude { channel: Channel, percent: f32 },
    ReadAmplitude { channel: Channel },
    WriteHarmonic { channel: Channel, order: i32, percent: f32, phase_deg: f32 },
    /// `wh` line without the mandatory `<order>,<pct>` pair.
    MalformedHarmonic,
    ReadHarmonics { channel: Channel },
    ClearHarmonics { channel: Channel },
    Help,
    Empty,
    Unknown,
}

/// Parse one complete command line (terminator already stripped).
pub fn parse_line(line: &str) -> Command {
    let bytes = line.as_bytes();

    if bytes.is_empty() {
        return Command::Empty;
    }
    if line == "help" {
        return Command::Help;
    }

    // whcl[a|b] shadows the wh prefix, so it is matched first.
    if bytes.len() >= 5 && &bytes[..4] == b"whcl" {
        if let Some(channel) = channel_from(bytes[4]) {
            return Command::ClearHarmonics { channel };
        }
    }

    if bytes.len() < 3 {
        return Command::Unknown;
    }
    let channel = match channel_from(bytes[2]) {
        Some(ch) => ch,
        None => return Command::Unknown,
    };
    let args = line.get(3..).unwrap_or("");

    match &bytes[..2] {
        b"rf" => Command::ReadFrequency { channel },
        b"wf" => Command::WriteFrequency { channel, freq_hz: parse_f32_prefix(args) },
        b"rp" => Command::ReadPhase { channel },
        b"wp" => Command::WritePhase { channel, phase_deg: parse_f32_prefix(args) },
        b"ra" => Command::ReadAmplitude { channel },
        b"wa" => Command::WriteAmplitude { channel, percent: parse_f32_prefix(args) },
        b"rh" => Command::ReadHarmonics { channel },
        b"wh" => parse_harmonic(channel, args),
        _ => Command::Unknown,
    }
}

/// `<order>,<pct>[,<phase_deg>]`
fn parse_harmonic(channel: Channel, args: &str) -> Command {
    let comma = match args.find(',') {
        Some(pos) => pos,
        None => return Command::MalformedHarmonic,
    };
    let order = parse_i32_prefix(&args[..comma]);
    let rest = &args[comma + 1..];

    let (percent, phase_deg) = match rest.find(',') {
        Some(pos) => (
            parse_f32_prefix(&rest[..pos]),
            parse_f32_prefix(&rest[pos + 1..]),
        ),
        None => (parse_f32_prefix(rest), 0.0),
    };

    Command::WriteHarmonic { channel, order, percent, phase_deg }
}

fn channel_from(byte: u8) -> Option<Channel> {
    match byte {
        b'a' => Some(Channel::A),
        b'b' => Some(Channel::B),
        _ => None,
    }
}

/// strtof-style conversion: longest valid leading prefix, else 0.
pub fn parse_f32_prefix(s: &str) -> f32 {
    let s = s.trim_start();
    let mut end = s
        .bytes()
        .position(|b| !matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E'))
        .unwrap_or(s.len());

    while end > 0 {
        if let Ok(v) = s[..end].parse::<f32>() {
            return v;
        }
        end -= 1;
    }
    0.0
}

/// strtol-style conversion: longest valid leading prefix, else 0.
pub fn parse_i32_prefix(s: &str) -> i32 {
    let s = s.trim_start();
    let mut end = s
        .bytes()
        .position(|b| !matches!(b, b'0'..=b'9' | b'+' | b'-'))
        .unwrap_or(s.len());

    while end > 0 {
        if let Ok(v) = s[..end].parse::<i32>() {
            return v;
        }
        end -= 1;
    }
    0
}
