//! Sync pins: square-wave output and edge-interrupt input

use core::ffi::c_void;

use esp_idf_svc::sys;

use crate::dds::SyncPin;

/// Push-pull output driven by the sync controller from both the timer
/// tick and the edge ISR.
pub struct SyncOutput {
    pin: i32,
}

impl SyncOutput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }

    /// Configure the pin as plain output, initially low.
    pub fn configure(&self) -> Result<(), sys::EspError> {
        let conf = sys::gpio_config_t {
            pin_bit_mask: 1u64 << self.pin,
            mode: sys::gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: sys::gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: sys::gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        sys::esp!(unsafe { sys::gpio_config(&conf) })?;
        self.set_level(false);
        Ok(())
    }
}

impl SyncPin for SyncOutput {
    #[inline]
    fn set_level(&self, high: bool) {
        unsafe {
            sys::gpio_set_level(self.pin, high as u32);
        }
    }
}

/// Configure `pin` as pulled-down input and attach `handler` to its
/// rising edge. The handler runs in interrupt context: atomic stores
/// and pin writes only.
pub fn install_edge_isr(
    pin: i32,
    handler: unsafe extern "C" fn(*mut c_void),
) -> Result<(), sys::EspError> {
    let conf = sys::gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: sys::gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: sys::gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: sys::gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: sys::gpio_int_type_t_GPIO_INTR_POSEDGE,
    };
    unsafe {
        sys::esp!(sys::gpio_config(&conf))?;
        sys::esp!(sys::gpio_install_isr_service(0))?;
        sys::esp!(sys::gpio_isr_handler_add(pin, Some(handler), core::ptr::null_mut()))?;
    }
    Ok(())
}
