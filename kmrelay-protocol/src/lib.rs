//! Serial framing protocol for the keyboard/mouse relay
//!
//! This crate defines the byte-stream protocol a host uses to drive the
//! relay over a UART. Each frame carries exactly one input command
//! (pointer move, scroll, button or key press/release, resolution update).
//!
//! # Protocol Overview
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 0xAB  │ 2..=6  │ 1B   │ 0–4B        │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! LENGTH counts TYPE, PAYLOAD and CHECKSUM. CHECKSUM is the XOR of TYPE
//! and all PAYLOAD bytes. Multi-byte payload fields are little-endian.
//!
//! There is no retransmission and no timeout: the decoder resynchronizes
//! by discarding bytes until the next START byte.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;

pub use frame::{
    DecoderState, Frame, FrameDecoder, FrameError, DEFAULT_BAUD_RATE, FRAME_START,
    MAX_DATA_LENGTH, MAX_FRAME_LENGTH, MAX_PAYLOAD_SIZE,
};
pub use messages::{Command, RELEASE_ALL};
