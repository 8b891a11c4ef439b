//! Serial command channel
//!
//! Line-oriented protocol, one command per CR/LF-terminated line, max 31
//! bytes. Write commands mutate the shared generator state through
//! atomics; read commands echo current values with one decimal place.
//! Rejected writes keep prior state and emit a diagnostic to the log
//! stream, never to the serial reply.

pub mod commands;
pub mod console;
pub mod error;
pub mod line_buffer;
pub mod parser;

pub use commands::execute;
pub use console::Console;
pub use error::CommandError;
pub use line_buffer::{LineBuffer, LINE_SIZE};
pub use parser::{parse_line, Command};
