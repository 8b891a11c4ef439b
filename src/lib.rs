//! # dds-wavegen
//!
//! Dual-channel DDS arbitrary-waveform generator firmware.
//!
//! ## Architecture
//!
//! Three execution contexts share lock-free state:
//! - An edge-triggered GPIO interrupt forces phase resynchronization
//! - A periodic timer runs one synthesis tick per sample period
//! - A UART command task mutates configuration between ticks
//!
//! No context ever blocks another: scalar parameters are single-word
//! atomics, harmonic slots are packed into one word each, and diagnostics
//! flow through a lock-free log ring drained by the UART task.
//!
//! Everything outside `hal` and `main` is platform-independent and is
//! exercised by host tests.

#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod dds;
pub mod logging;

#[cfg(feature = "esp32")]
pub mod hal;

pub use console::Console;
pub use dds::{Channel, GeneratorState, SampleSink, Shape, SyncPin, WaveformTable};
pub use logging::{LogLevel, LogStream};
