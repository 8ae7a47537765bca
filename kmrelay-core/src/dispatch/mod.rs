//! Command dispatcher
//!
//! Maps each validated frame to exactly one HID output action. Nothing in
//! here fails loudly: every rejected frame becomes
//! [`Outcome::Dropped`] and the relay keeps accepting bytes.

use kmrelay_protocol::messages::MSG_MOUSE_RESOLUTION;
use kmrelay_protocol::{Command, Frame, FrameError, RELEASE_ALL};

use crate::config::RelayConfig;
use crate::hid::HidOutput;
use crate::traits::ReportSink;

/// Why a byte or frame was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Noise outside a frame
    Framing,
    /// Declared length out of bounds
    Length,
    /// Payload corrupted
    Checksum,
    /// Unsupported type, or payload unusable for the type
    UnknownType(u8),
}

impl From<FrameError> for DropReason {
    fn from(error: FrameError) -> Self {
        match error {
            FrameError::Framing => DropReason::Framing,
            FrameError::Checksum { .. } => DropReason::Checksum,
            FrameError::UnknownType(msg_type) => DropReason::UnknownType(msg_type),
            FrameError::Length(_) | FrameError::PayloadTooLarge | FrameError::BufferTooSmall => {
                DropReason::Length
            }
        }
    }
}

/// Result of handing a byte or frame to the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Byte consumed, frame still incomplete
    Pending,
    /// Command applied and, if due, reported
    Accepted(Command),
    /// Command applied but the report sink rejected the report
    Unreported(Command),
    /// Nothing applied
    Dropped(DropReason),
}

/// Applies decoded commands to the HID output
#[derive(Debug)]
pub struct Dispatcher<S> {
    output: HidOutput<S>,
}

impl<S: ReportSink> Dispatcher<S> {
    pub fn new(config: &RelayConfig, sink: S) -> Self {
        Self {
            output: HidOutput::new(config, sink),
        }
    }

    pub fn output(&self) -> &HidOutput<S> {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut HidOutput<S> {
        &mut self.output
    }

    /// Dispatch a checksum-validated frame
    pub fn dispatch(&mut self, frame: &Frame) -> Outcome {
        match Command::from_frame(frame) {
            Ok(command) => self.apply(command),
            Err(error) => Outcome::Dropped(error.into()),
        }
    }

    /// Apply a single command
    pub fn apply(&mut self, command: Command) -> Outcome {
        let out = &mut self.output;
        let result = match command {
            Command::MoveBy { dx, dy } => out.move_by(dx, dy),
            Command::MoveTo { x, y } => out.set_position(x, y),
            Command::Scroll(step) => out.scroll(step),
            Command::MousePress(mask) => out.press(mask),
            Command::MouseRelease(RELEASE_ALL) => out.release_all_buttons(),
            Command::MouseRelease(mask) => out.release(mask),
            Command::SetResolution { width, height } => {
                if !out.set_resolution(width, height) {
                    return Outcome::Dropped(DropReason::UnknownType(MSG_MOUSE_RESOLUTION));
                }
                Ok(())
            }
            Command::KeyPress(usage) => out.key_press(usage),
            Command::KeyRelease(RELEASE_ALL) => out.release_all_keys(),
            Command::KeyRelease(usage) => out.key_release(usage),
        };

        match result {
            Ok(()) => Outcome::Accepted(command),
            Err(_) => Outcome::Unreported(command),
        }
    }
}
