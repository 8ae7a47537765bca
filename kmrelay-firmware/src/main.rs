//! kmrelay - Serial to USB HID keyboard/mouse relay
//!
//! Main firmware binary for RP2040 boards. A host drives the relay over
//! UART0 (GPIO0 TX, GPIO1 RX); the relay enumerates as an absolute
//! pointer plus keyboard and replays the host's input.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{UART0, USB};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use kmrelay_core::hid::{KEYBOARD_REPORT_DESCRIPTOR, POINTER_REPORT_DESCRIPTOR};

use crate::channels::MAX_QUEUED_REPORT;

mod channels;
mod config;
mod tasks;
mod transport;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// USB descriptor and control buffers
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

// HID class state, one per interface
static POINTER_STATE: StaticCell<State> = StaticCell::new();
static KEYBOARD_STATE: StaticCell<State> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("kmrelay firmware starting...");

    let p = embassy_rp::init(Default::default());
    let relay_config = config::RELAY_CONFIG;
    info!(
        "Config: {} baud, reference {}x{}, {:?} reports",
        relay_config.baud_rate, relay_config.width, relay_config.height, relay_config.report_mode
    );

    // Setup USB: one HID interface per report descriptor
    let driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0xc0de, 0xcafe);
    usb_config.manufacturer = Some("kmrelay");
    usb_config.product = Some("Serial HID Relay");
    usb_config.serial_number = Some("00000001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        MSOS_DESCRIPTOR.init([0; 256]),
        CONTROL_BUF.init([0; 64]),
    );

    let pointer = HidWriter::<_, MAX_QUEUED_REPORT>::new(
        &mut builder,
        POINTER_STATE.init(State::new()),
        HidConfig {
            report_descriptor: POINTER_REPORT_DESCRIPTOR,
            request_handler: None,
            poll_ms: 1,
            max_packet_size: MAX_QUEUED_REPORT as u16,
        },
    );

    let keyboard = HidWriter::<_, MAX_QUEUED_REPORT>::new(
        &mut builder,
        KEYBOARD_STATE.init(State::new()),
        HidConfig {
            report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
            request_handler: None,
            poll_ms: 1,
            max_packet_size: MAX_QUEUED_REPORT as u16,
        },
    );

    let usb = builder.build();
    info!("USB HID interfaces registered");

    // Setup UART for the host link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = relay_config.baud_rate;

    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();

    info!("UART initialized for host link");

    spawner.spawn(unwrap!(tasks::usb_hid_task(usb, pointer, keyboard)));
    spawner.spawn(unwrap!(tasks::serial_rx_task(rx, relay_config)));

    info!("All tasks spawned, relay running");
}
