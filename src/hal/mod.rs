//! Hardware layer for the ESP32 target
//!
//! Thin wrappers over ESP-IDF driver calls. All synthesis logic stays in
//! `dds`; this layer only moves bytes and levels.

pub mod dac;
pub mod gpio;

pub use dac::DacSink;
pub use gpio::SyncOutput;
