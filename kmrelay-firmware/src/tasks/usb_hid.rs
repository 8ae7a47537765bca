//! USB HID task
//!
//! Runs the USB device stack and writes queued reports to the pointer and
//! keyboard interrupt endpoints.

use defmt::*;
use embassy_futures::join::join;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::HidWriter;
use embassy_usb::UsbDevice;

use kmrelay_core::hid::{KEYBOARD_REPORT_ID, POINTER_REPORT_ID};

use crate::channels::{MAX_QUEUED_REPORT, REPORT_CHANNEL};

pub type UsbDriver = Driver<'static, USB>;
pub type ReportWriter = HidWriter<'static, UsbDriver, MAX_QUEUED_REPORT>;

/// USB task - device stack plus report writer
#[embassy_executor::task]
pub async fn usb_hid_task(
    mut usb: UsbDevice<'static, UsbDriver>,
    mut pointer: ReportWriter,
    mut keyboard: ReportWriter,
) {
    info!("USB HID task started");

    let writer = async {
        pointer.ready().await;
        keyboard.ready().await;
        info!("USB HID configured");

        loop {
            let report = REPORT_CHANNEL.receive().await;
            let endpoint = match report.report_id() {
                POINTER_REPORT_ID => &mut pointer,
                KEYBOARD_REPORT_ID => &mut keyboard,
                other => {
                    warn!("Unknown report ID {}", other);
                    continue;
                }
            };

            if let Err(e) = endpoint.write(&report.bytes).await {
                warn!("HID write failed: {:?}", e);
            }
        }
    };

    join(usb.run(), writer).await;
}
