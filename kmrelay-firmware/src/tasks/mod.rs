//! Embassy async tasks

mod serial_rx;
mod usb_hid;

pub use serial_rx::serial_rx_task;
pub use usb_hid::usb_hid_task;
