//! dds-wavegen - Firmware entry point
//!
//! Startup order matters: waveform table is baked at compile time, the
//! default frequency is applied to the step registers, GPIO and the edge
//! interrupt come up, then the periodic sample timer starts, and finally
//! the main task settles into the UART command loop.

#![no_std]
#![no_main]

use core::ffi::c_void;

use esp_idf_svc::sys;

use dds_wavegen::console::Console;
use dds_wavegen::dds::{GeneratorState, Shape, WaveformTable, PERIOD_US};
use dds_wavegen::hal::{gpio::install_edge_isr, DacSink, SyncOutput};
use dds_wavegen::logging::LogStream;

/// GPIO for the square-wave sync output.
const SYNC_OUTPUT_PIN: i32 = 18;
/// GPIO for the rising-edge sync input.
const SYNC_INPUT_PIN: i32 = 19;

const UART_NUM: sys::uart_port_t = 0;
const UART_RX_BUF_SIZE: i32 = 256;

static TABLE: WaveformTable = WaveformTable::build(Shape::Sine);
static GEN: GeneratorState = GeneratorState::new();
static LOG: LogStream = LogStream::new();
static SYNC_OUT: SyncOutput = SyncOutput::new(SYNC_OUTPUT_PIN);

// Owned by the esp_timer dispatch task after startup.
static mut SINK: Option<DacSink> = None;

/// Periodic sample timer callback: one synthesis tick.
unsafe extern "C" fn tick_callback(_arg: *mut c_void) {
    if let Some(sink) = SINK.as_mut() {
        GEN.tick(&TABLE, sink, &SYNC_OUT);
    }
}

/// Rising edge on the sync input: force resynchronization.
unsafe extern "C" fn sync_isr(_arg: *mut c_void) {
    GEN.sync.external_resync(&GEN.channels, &SYNC_OUT);
}

fn start_sample_timer() {
    let args = sys::esp_timer_create_args_t {
        callback: Some(tick_callback),
        arg: core::ptr::null_mut(),
        dispatch_method: sys::esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: b"dds_tick\0".as_ptr() as *const i8,
        skip_unhandled_events: false,
    };
    let mut handle: sys::esp_timer_handle_t = core::ptr::null_mut();
    unsafe {
        sys::esp!(sys::esp_timer_create(&args, &mut handle)).expect("timer create failed");
        sys::esp!(sys::esp_timer_start_periodic(handle, PERIOD_US as u64))
            .expect("timer start failed");
    }
}

fn init_uart() {
    let config = sys::uart_config_t {
        baud_rate: 115200,
        data_bits: sys::uart_word_length_t_UART_DATA_8_BITS,
        parity: sys::uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: sys::uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: sys::uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    unsafe {
        sys::esp!(sys::uart_driver_install(UART_NUM, UART_RX_BUF_SIZE, 0, 0, core::ptr::null_mut(), 0))
            .expect("uart driver install failed");
        sys::esp!(sys::uart_param_config(UART_NUM, &config)).expect("uart config failed");
    }
}

/// Blocking writer over the UART TX, used for command replies.
struct UartOut;

impl core::fmt::Write for UartOut {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        unsafe {
            sys::uart_write_bytes(UART_NUM, s.as_ptr() as *const c_void, s.len());
        }
        Ok(())
    }
}

/// Drain pending diagnostics to the UART.
fn drain_log(out: &mut UartOut) {
    use core::fmt::Write;

    while let Some(entry) = LOG.drain() {
        let msg = core::str::from_utf8(&entry.msg[..entry.len as usize]).unwrap_or("");
        let _ = write!(
            out,
            "[{} {}] {}\r\n",
            entry.level.as_str(),
            entry.timestamp_us / 1000,
            msg
        );
    }
}

#[no_mangle]
fn main() {
    sys::link_patches();

    GEN.init();

    SYNC_OUT.configure().expect("sync output pin unavailable");
    install_edge_isr(SYNC_INPUT_PIN, sync_isr).expect("sync input pin unavailable");

    // No DAC, no device.
    let sink = DacSink::new().expect("DAC acquisition failed");
    unsafe {
        SINK = Some(sink);
    }

    start_sample_timer();
    init_uart();

    // Command loop: short byte-read poll, log drain in between. This
    // task is the only command context; it never touches the tick path.
    let mut console = Console::new();
    let mut out = UartOut;
    loop {
        let mut byte = 0u8;
        let len = unsafe {
            sys::uart_read_bytes(
                UART_NUM,
                &mut byte as *mut u8 as *mut c_void,
                1,
                100 / portTICK_PERIOD_MS(),
            )
        };
        if len > 0 {
            let now_us = unsafe { sys::esp_timer_get_time() };
            console.push_byte(byte, &GEN, &mut out, &LOG, now_us);
        }
        drain_log(&mut out);
    }
}

/// FreeRTOS tick period in ms (pdMS_TO_TICKS is a C macro, not bound).
#[allow(non_snake_case)]
fn portTICK_PERIOD_MS() -> u32 {
    1000 / sys::configTICK_RATE_HZ
}
