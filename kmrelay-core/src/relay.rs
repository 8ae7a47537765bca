//! Byte-in, report-out relay pipeline
//!
//! Owns the frame decoder and the dispatcher. Each byte is processed to
//! completion, including any report it triggers, before `feed` returns.

use kmrelay_protocol::FrameDecoder;

use crate::config::RelayConfig;
use crate::dispatch::{Dispatcher, Outcome};
use crate::traits::ReportSink;

/// Serial-to-HID relay
#[derive(Debug)]
pub struct Relay<S> {
    decoder: FrameDecoder,
    dispatcher: Dispatcher<S>,
}

impl<S: ReportSink> Relay<S> {
    pub fn new(config: &RelayConfig, sink: S) -> Self {
        Self {
            decoder: FrameDecoder::new(),
            dispatcher: Dispatcher::new(config, sink),
        }
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    pub fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<S> {
        &mut self.dispatcher
    }

    /// Process one byte from the serial link
    pub fn feed(&mut self, byte: u8) -> Outcome {
        match self.decoder.feed(byte) {
            Ok(None) => Outcome::Pending,
            Ok(Some(frame)) => self.dispatcher.dispatch(&frame),
            Err(error) => Outcome::Dropped(error.into()),
        }
    }
}
