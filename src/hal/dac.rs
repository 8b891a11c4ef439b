//! Dual oneshot DAC output
//!
//! Channel A on DAC_CHAN_0 (GPIO25), channel B on DAC_CHAN_1 (GPIO26).
//! Without the DACs the device has no function, so acquisition failure
//! at startup is fatal.

use esp_idf_svc::sys;

use crate::dds::SampleSink;

/// Both DAC channels, written once per sample tick.
pub struct DacSink {
    handles: [sys::dac_oneshot_handle_t; 2],
}

impl DacSink {
    pub fn new() -> Result<Self, sys::EspError> {
        let chan_ids = [sys::dac_channel_t_DAC_CHAN_0, sys::dac_channel_t_DAC_CHAN_1];
        let mut handles = [core::ptr::null_mut(); 2];
        for (handle, chan_id) in handles.iter_mut().zip(chan_ids) {
            let cfg = sys::dac_oneshot_config_t { chan_id };
            sys::esp!(unsafe { sys::dac_oneshot_new_channel(&cfg, handle) })?;
        }
        Ok(Self { handles })
    }
}

impl SampleSink for DacSink {
    #[inline]
    fn write(&mut self, a: u8, b: u8) {
        // Back to back; per-tick jitter between the two writes is
        // accepted (no hardware sample-and-hold sync).
        unsafe {
            sys::dac_oneshot_output_voltage(self.handles[0], a);
            sys::dac_oneshot_output_voltage(self.handles[1], b);
        }
    }
}

// SAFETY: the sink is only touched from the esp_timer dispatch task.
unsafe impl Send for DacSink {}
