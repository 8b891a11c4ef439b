//! Byte-fed console loop
//!
//! The UART task feeds received bytes in one at a time; a CR or LF
//! terminates the line and triggers execution. Rejections are pushed to
//! the log stream with the offending line, never echoed on the wire.

use core::fmt::Write;

use super::commands::execute;
use super::line_buffer::LineBuffer;
use crate::dds::GeneratorState;
use crate::logging::LogStream;
use crate::rt_warn;

/// Console state: just the partial input line.
pub struct Console {
    line: LineBuffer,
}

impl Console {
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Process one received byte.
    ///
    /// Replies (reads, help) are written to `out`; validation failures
    /// are logged to `log` with `now_us` as timestamp.
    pub fn push_byte(
        &mut self,
        byte: u8,
        gen: &GeneratorState,
        out: &mut dyn Write,
        log: &LogStream,
        now_us: i64,
    ) {
        match byte {
            b'\r' | b'\n' => {
                let line = self.line.as_str();
                if !line.is_empty() {
                    if let Err(err) = execute(gen, line, out, log, now_us) {
                        rt_warn!(log, now_us, "cmd '{}' rejected: {}", line, err);
                    }
                }
                self.line.clear();
            }
            _ => self.line.push(byte),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
