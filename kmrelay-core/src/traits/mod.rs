//! Hardware abstraction traits
//!
//! These traits define the interface between the relay logic and the
//! USB HID transport.

pub mod sink;

pub use sink::ReportSink;
