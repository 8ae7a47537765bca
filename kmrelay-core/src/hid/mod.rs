//! HID output: absolute pointer and keyboard report state
//!
//! [`PointerState`] and [`KeyboardState`] are plain state with report
//! encoders. [`HidOutput`] owns both plus a [`ReportSink`](crate::ReportSink)
//! and decides when reports are emitted.

pub mod descriptor;
pub mod keyboard;
pub mod output;
pub mod pointer;

pub use descriptor::{KEYBOARD_REPORT_DESCRIPTOR, POINTER_REPORT_DESCRIPTOR};
pub use keyboard::{KeyboardState, KEYBOARD_REPORT_ID, KEYBOARD_REPORT_LEN};
pub use output::HidOutput;
pub use pointer::{PointerState, ABS_MAX, POINTER_REPORT_ID, POINTER_REPORT_LEN, WHEEL_MAX};
