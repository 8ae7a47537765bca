//! Inter-task communication channels
//!
//! The serial task produces HID reports, the USB task writes them to the
//! host. Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use kmrelay_core::hid::KEYBOARD_REPORT_LEN;

/// Channel capacity for queued HID reports
const REPORT_CHANNEL_SIZE: usize = 16;

/// Largest queued report: ID byte + keyboard body
pub const MAX_QUEUED_REPORT: usize = 1 + KEYBOARD_REPORT_LEN;

/// A HID input report with its report ID prefixed, as written to the
/// interrupt endpoint
#[derive(Debug, Clone)]
pub struct QueuedReport {
    pub bytes: Vec<u8, MAX_QUEUED_REPORT>,
}

impl QueuedReport {
    pub fn report_id(&self) -> u8 {
        self.bytes.first().copied().unwrap_or(0)
    }
}

/// Reports waiting for the USB task
pub static REPORT_CHANNEL: Channel<CriticalSectionRawMutex, QueuedReport, REPORT_CHANNEL_SIZE> =
    Channel::new();
