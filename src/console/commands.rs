//! Command execution against the shared generator state

use core::fmt::Write;

use super::error::CommandError;
use super::parser::{parse_line, Command};
use crate::dds::{GeneratorState, MAX_FREQ_HZ, MIN_FREQ_HZ};
use crate::logging::LogStream;
use crate::rt_warn;

/// Static usage text for the `help` command.
pub const HELP_TEXT: &str = "Command: [r|w][f|p|a|h][a|b][<args>]\r\n\
    \x20 r=read, w=write; f=frequency, p=phase, a=amplitude, h=harmonic\r\n\
    \x20 a=ch A, b=ch B; <args>=value(s) for write\r\n\
    \r\n\
    Harmonic: wh[a|b]<n>,<percent>[,<phase_deg>]\r\n\
    \x20 n=odd harmonic (>=3), percent=0-100, phase_deg=deg (optional)\r\n\
    Special:\r\n\
    \x20 whcl[a|b]   Clear all harmonics for A/B\r\n\
    \x20 help        Show this help\r\n\
    \r\n\
    Examples:\r\n\
    \x20 rfa         Read freq A (ex. response rfa50.0 = 50.0 Hz)\r\n\
    \x20 wfb45.5     Set freq B to 45.5 Hz\r\n\
    \x20 wpa-90      Set phase A to -90 deg\r\n\
    \x20 waa50       Set amp A to 50%\r\n\
    \x20 wha3,10     Set 3rd harm A to 10%\r\n\
    \x20 whb5,5,-90  Set 5th harm B to 5%, -90 deg\r\n";

/// Parse and execute one command line.
///
/// Read commands write their reply to `out`; write commands reply
/// nothing. A rejected write returns the reason and changes no state.
/// Values applied after a clamp emit a warning to `log`.
pub fn execute(
    gen: &GeneratorState,
    line: &str,
    out: &mut dyn Write,
    log: &LogStream,
    now_us: i64,
) -> Result<(), CommandError> {
    match parse_line(line) {
        Command::Empty => Ok(()),

        Command::Help => {
            let _ = out.write_str(HELP_TEXT);
            Ok(())
        }

        Command::WriteFrequency { channel, freq_hz } => {
            if !(MIN_FREQ_HZ..=MAX_FREQ_HZ).contains(&freq_hz) {
                return Err(CommandError::FrequencyOutOfRange);
            }
            gen.channel(channel).set_frequency(freq_hz);
            Ok(())
        }

        Command::ReadFrequency { channel } => {
            let freq = gen.channel(channel).frequency();
            let _ = write!(out, "rf{}{:.1}\r\n", channel.letter(), freq);
            Ok(())
        }

        Command::WritePhase { channel, phase_deg } => {
            let clamped = phase_deg.clamp(-360.0, 360.0);
            if clamped != phase_deg {
                rt_warn!(
                    log,
                    now_us,
                    "ch {} phase {} out of -360..360, clamped to {}",
                    channel.letter(),
                    phase_deg,
                    clamped
                );
            }
            gen.channel(channel).set_phase(clamped.to_radians());
            Ok(())
        }

        Command::ReadPhase { channel } => {
            let deg = gen.channel(channel).phase().to_degrees();
            let _ = write!(out, "rp{}{:.1}\r\n", channel.letter(), deg);
            Ok(())
        }

        Command::WriteAmplitude { channel, percent } => {
            let clamped = percent.clamp(0.0, 100.0);
            gen.channel(channel).set_target_amplitude(clamped / 100.0);
            Ok(())
        }

        Command::ReadAmplitude { channel } => {
            // Replies the ramped amplitude, not the target.
            let pct = gen.channel(channel).current_amplitude() * 100.0;
            let _ = write!(out, "ra{}{:.1}\r\n", channel.letter(), pct);
            Ok(())
        }

        Command::WriteHarmonic { channel, order, percent, phase_deg } => {
            gen.harmonics.set(channel.index(), order, percent, phase_deg)?;
            Ok(())
        }

        Command::MalformedHarmonic => Err(CommandError::MalformedHarmonic),

        Command::ReadHarmonics { channel } => {
            let _ = write!(out, "rh{}", channel.letter());
            for slot in gen.harmonics.active(channel.index()) {
                let _ = write!(
                    out,
                    "{},{:.1},{:.1};",
                    slot.order,
                    slot.strength_pct(),
                    slot.phase_deg()
                );
            }
            let _ = out.write_str("\r\n");
            Ok(())
        }

        Command::ClearHarmonics { channel } => {
            gen.harmonics.clear(channel.index());
            Ok(())
        }

        Command::Unknown => Err(CommandError::UnknownCommand),
    }
}
