//! Frame encoding and decoding for the relay serial link.
//!
//! Frame format:
//! - START (1 byte): 0xAB synchronization byte
//! - LENGTH (1 byte): TYPE + PAYLOAD + CHECKSUM byte count (2-6)
//! - TYPE (1 byte): command type identifier
//! - PAYLOAD (0-4 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of TYPE and all PAYLOAD bytes
//!
//! The decoder is a byte-at-a-time state machine. START detection and TYPE
//! interpretation are separate phases, so the scroll type code (also 0xAB)
//! is never mistaken for a frame boundary once LENGTH has been read.

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAB;

/// Link speed the host side is expected to use
pub const DEFAULT_BAUD_RATE: u32 = 500_000;

/// Maximum LENGTH value: TYPE + 4 payload bytes + CHECKSUM
pub const MAX_DATA_LENGTH: usize = 6;

/// Minimum LENGTH value: TYPE + CHECKSUM
pub const MIN_DATA_LENGTH: usize = 2;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = MAX_DATA_LENGTH - 2;

/// Maximum complete frame size (START + LENGTH + data)
pub const MAX_FRAME_LENGTH: usize = MAX_DATA_LENGTH + 2;

/// Errors that can occur during frame decoding or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Byte outside a frame that is not the START byte
    Framing,
    /// Declared LENGTH outside `MIN_DATA_LENGTH..=MAX_DATA_LENGTH`
    Length(u8),
    /// Checksum mismatch
    Checksum { expected: u8, actual: u8 },
    /// Type code not understood, or payload size wrong for the type
    UnknownType(u8),
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A validated or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Command type identifier
    pub msg_type: u8,
    /// Payload data (checksum excluded)
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

/// XOR checksum over a type byte and its payload
pub fn checksum(msg_type: u8, payload: &[u8]) -> u8 {
    payload.iter().fold(msg_type, |acc, &byte| acc ^ byte)
}

impl Frame {
    /// Create a new frame with the given type and payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// Value of the LENGTH byte for this frame
    pub fn data_length(&self) -> u8 {
        (self.payload.len() + MIN_DATA_LENGTH) as u8
    }

    /// Checksum byte for this frame
    pub fn checksum(&self) -> u8 {
        checksum(self.msg_type, &self.payload)
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = 2 + self.data_length() as usize;
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let payload_end = 3 + self.payload.len();
        buffer[0] = FRAME_START;
        buffer[1] = self.data_length();
        buffer[2] = self.msg_type;
        buffer[3..payload_end].copy_from_slice(&self.payload);
        buffer[payload_end] = self.checksum();

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_LENGTH>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_LENGTH];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderState {
    /// Waiting for START byte
    AwaitingStart,
    /// Got START, waiting for LENGTH
    AwaitingLength,
    /// Accumulating TYPE, PAYLOAD and CHECKSUM
    AwaitingData,
    /// All declared bytes received, checksum pending.
    ///
    /// Only held for the duration of the final `feed` call.
    Complete,
}

/// State machine for decoding incoming frames
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecoderState,
    buffer: [u8; MAX_DATA_LENGTH],
    len: usize,
    expected_len: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new frame decoder
    pub const fn new() -> Self {
        Self {
            state: DecoderState::AwaitingStart,
            buffer: [0; MAX_DATA_LENGTH],
            len: 0,
            expected_len: 0,
        }
    }

    /// Current decoder state
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Drop any partially received frame
    pub fn reset(&mut self) {
        self.state = DecoderState::AwaitingStart;
        self.len = 0;
        self.expected_len = 0;
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is decoded,
    /// `Ok(None)` when more bytes are needed, or `Err` when the byte was
    /// discarded or ended an invalid frame. The decoder is always ready for
    /// the next byte afterwards.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            DecoderState::AwaitingStart => {
                if byte != FRAME_START {
                    return Err(FrameError::Framing);
                }
                self.state = DecoderState::AwaitingLength;
                Ok(None)
            }
            DecoderState::AwaitingLength => {
                let declared = byte as usize;
                if !(MIN_DATA_LENGTH..=MAX_DATA_LENGTH).contains(&declared) {
                    self.reset();
                    return Err(FrameError::Length(byte));
                }
                self.expected_len = declared;
                self.len = 0;
                self.state = DecoderState::AwaitingData;
                Ok(None)
            }
            DecoderState::AwaitingData => {
                self.buffer[self.len] = byte;
                self.len += 1;
                if self.len < self.expected_len {
                    return Ok(None);
                }
                self.state = DecoderState::Complete;
                self.finish()
            }
            DecoderState::Complete => {
                self.reset();
                self.feed(byte)
            }
        }
    }

    /// Feed multiple bytes to the decoder
    ///
    /// Returns the first complete frame or error encountered.
    /// Remaining bytes after that point are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Validate the accumulated bytes and return to `AwaitingStart`
    fn finish(&mut self) -> Result<Option<Frame>, FrameError> {
        let data = &self.buffer[..self.len];
        let (body, tail) = data.split_at(data.len() - 1);
        let actual = tail[0];
        let expected = checksum(body[0], &body[1..]);

        let result = if actual == expected {
            Frame::new(body[0], &body[1..]).map(Some)
        } else {
            Err(FrameError::Checksum { expected, actual })
        };

        self.reset();
        result
    }
}
