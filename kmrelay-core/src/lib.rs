//! Board-agnostic core logic for the keyboard/mouse relay firmware
//!
//! This crate contains everything between the serial byte stream and the
//! USB HID transport that does not depend on specific hardware:
//!
//! - Report sink trait (the only thing required from the USB side)
//! - Absolute pointer and keyboard report state
//! - Command dispatcher
//! - Byte-in, report-out relay pipeline
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod dispatch;
pub mod hid;
pub mod relay;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, RelayConfig, ReportMode};
pub use dispatch::{Dispatcher, DropReason, Outcome};
pub use hid::{HidOutput, KeyboardState, PointerState};
pub use relay::Relay;
pub use traits::ReportSink;
