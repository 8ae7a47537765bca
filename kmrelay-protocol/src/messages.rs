//! Command types carried by relay frames
//!
//! Every frame maps to exactly one [`Command`]. Multi-byte fields are
//! little-endian. A frame whose payload size does not match its type is
//! treated the same as an unknown type.

use crate::frame::{Frame, FrameError};

// Frame type codes
pub const MSG_MOUSE_MOVE_REL: u8 = 0xA0;
pub const MSG_MOUSE_MOVE: u8 = 0xAA;
pub const MSG_MOUSE_SCROLL: u8 = 0xAB;
pub const MSG_MOUSE_PRESS: u8 = 0xAC;
pub const MSG_MOUSE_RELEASE: u8 = 0xAD;
pub const MSG_MOUSE_RESOLUTION: u8 = 0xAE;
pub const MSG_KEY_PRESS: u8 = 0xBB;
pub const MSG_KEY_RELEASE: u8 = 0xBC;

/// Release code meaning "release everything"
pub const RELEASE_ALL: u8 = 0x00;

/// Mouse button masks
pub const MOUSE_LEFT: u8 = 0x01;
pub const MOUSE_RIGHT: u8 = 0x02;
pub const MOUSE_MIDDLE: u8 = 0x04;

/// Commands decoded from host frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Move pointer by a signed offset in reference coordinates
    MoveBy { dx: i16, dy: i16 },
    /// Move pointer to an absolute position in reference coordinates
    MoveTo { x: u16, y: u16 },
    /// Scroll wheel steps, reported once
    Scroll(i8),
    /// Press mouse buttons (bitmask)
    MousePress(u8),
    /// Release mouse buttons (bitmask, [`RELEASE_ALL`] for every button)
    MouseRelease(u8),
    /// Change the reference resolution coordinates are expressed in
    SetResolution { width: u16, height: u16 },
    /// Press a key (HID usage code)
    KeyPress(u8),
    /// Release a key (HID usage code, [`RELEASE_ALL`] for every key)
    KeyRelease(u8),
}

fn pair(payload: &[u8]) -> Option<([u8; 2], [u8; 2])> {
    match payload {
        &[a0, a1, b0, b1] => Some(([a0, a1], [b0, b1])),
        _ => None,
    }
}

fn single(payload: &[u8]) -> Option<u8> {
    match payload {
        &[value] => Some(value),
        _ => None,
    }
}

impl Command {
    /// Parse a command from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = &frame.payload[..];
        let command = match frame.msg_type {
            MSG_MOUSE_MOVE_REL => pair(payload).map(|(dx, dy)| Command::MoveBy {
                dx: i16::from_le_bytes(dx),
                dy: i16::from_le_bytes(dy),
            }),
            MSG_MOUSE_MOVE => pair(payload).map(|(x, y)| Command::MoveTo {
                x: u16::from_le_bytes(x),
                y: u16::from_le_bytes(y),
            }),
            MSG_MOUSE_SCROLL => single(payload).map(|step| Command::Scroll(step as i8)),
            MSG_MOUSE_PRESS => single(payload).map(Command::MousePress),
            MSG_MOUSE_RELEASE => single(payload).map(Command::MouseRelease),
            MSG_MOUSE_RESOLUTION => pair(payload).map(|(w, h)| Command::SetResolution {
                width: u16::from_le_bytes(w),
                height: u16::from_le_bytes(h),
            }),
            MSG_KEY_PRESS => single(payload).map(Command::KeyPress),
            MSG_KEY_RELEASE => single(payload).map(Command::KeyRelease),
            _ => None,
        };

        command.ok_or(FrameError::UnknownType(frame.msg_type))
    }

    /// Frame type code for this command
    pub fn msg_type(&self) -> u8 {
        match self {
            Command::MoveBy { .. } => MSG_MOUSE_MOVE_REL,
            Command::MoveTo { .. } => MSG_MOUSE_MOVE,
            Command::Scroll(_) => MSG_MOUSE_SCROLL,
            Command::MousePress(_) => MSG_MOUSE_PRESS,
            Command::MouseRelease(_) => MSG_MOUSE_RELEASE,
            Command::SetResolution { .. } => MSG_MOUSE_RESOLUTION,
            Command::KeyPress(_) => MSG_KEY_PRESS,
            Command::KeyRelease(_) => MSG_KEY_RELEASE,
        }
    }

    /// Returns true if this command changes keyboard state
    pub fn is_keyboard(&self) -> bool {
        matches!(self, Command::KeyPress(_) | Command::KeyRelease(_))
    }

    /// Encode this command into a frame (host side and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = [0u8; 4];
        let len = match *self {
            Command::MoveBy { dx, dy } => {
                payload[..2].copy_from_slice(&dx.to_le_bytes());
                payload[2..].copy_from_slice(&dy.to_le_bytes());
                4
            }
            Command::MoveTo { x: a, y: b }
            | Command::SetResolution {
                width: a,
                height: b,
            } => {
                payload[..2].copy_from_slice(&a.to_le_bytes());
                payload[2..].copy_from_slice(&b.to_le_bytes());
                4
            }
            Command::Scroll(step) => {
                payload[0] = step as u8;
                1
            }
            Command::MousePress(code)
            | Command::MouseRelease(code)
            | Command::KeyPress(code)
            | Command::KeyRelease(code) => {
                payload[0] = code;
                1
            }
        };

        Frame::new(self.msg_type(), &payload[..len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameDecoder;

    #[test]
    fn test_move_to_little_endian() {
        let frame = Frame::new(MSG_MOUSE_MOVE, &[0xC0, 0x03, 0x1C, 0x02]).unwrap();
        let cmd = Command::from_frame(&frame).unwrap();
        assert_eq!(cmd, Command::MoveTo { x: 960, y: 540 });
    }

    #[test]
    fn test_move_by_signed() {
        let frame = Frame::new(MSG_MOUSE_MOVE_REL, &[0xF6, 0xFF, 0x05, 0x00]).unwrap();
        let cmd = Command::from_frame(&frame).unwrap();
        assert_eq!(cmd, Command::MoveBy { dx: -10, dy: 5 });
    }

    #[test]
    fn test_scroll_negative() {
        let frame = Frame::new(MSG_MOUSE_SCROLL, &[0xFD]).unwrap();
        assert_eq!(Command::from_frame(&frame), Ok(Command::Scroll(-3)));
    }

    #[test]
    fn test_set_resolution() {
        let frame = Frame::new(MSG_MOUSE_RESOLUTION, &[0x80, 0x07, 0x38, 0x04]).unwrap();
        assert_eq!(
            Command::from_frame(&frame),
            Ok(Command::SetResolution {
                width: 1920,
                height: 1080
            })
        );
    }

    #[test]
    fn test_button_and_key_codes() {
        let cases = [
            (MSG_MOUSE_PRESS, Command::MousePress(MOUSE_LEFT)),
            (MSG_MOUSE_RELEASE, Command::MouseRelease(MOUSE_LEFT)),
            (MSG_KEY_PRESS, Command::KeyPress(MOUSE_LEFT)),
            (MSG_KEY_RELEASE, Command::KeyRelease(MOUSE_LEFT)),
        ];
        for (msg_type, expected) in cases {
            let frame = Frame::new(msg_type, &[MOUSE_LEFT]).unwrap();
            assert_eq!(Command::from_frame(&frame), Ok(expected));
        }
    }

    #[test]
    fn test_is_keyboard() {
        assert!(Command::KeyPress(0x04).is_keyboard());
        assert!(Command::KeyRelease(RELEASE_ALL).is_keyboard());
        assert!(!Command::MousePress(MOUSE_LEFT).is_keyboard());
        assert!(!Command::Scroll(1).is_keyboard());
    }

    #[test]
    fn test_unknown_type() {
        let frame = Frame::new(0x42, &[0x01]).unwrap();
        assert_eq!(
            Command::from_frame(&frame),
            Err(FrameError::UnknownType(0x42))
        );
    }

    #[test]
    fn test_wrong_payload_size_is_unknown() {
        let short_move = Frame::new(MSG_MOUSE_MOVE, &[0x01, 0x02]).unwrap();
        assert_eq!(
            Command::from_frame(&short_move),
            Err(FrameError::UnknownType(MSG_MOUSE_MOVE))
        );

        let empty_press = Frame::empty(MSG_MOUSE_PRESS);
        assert_eq!(
            Command::from_frame(&empty_press),
            Err(FrameError::UnknownType(MSG_MOUSE_PRESS))
        );

        let long_key = Frame::new(MSG_KEY_PRESS, &[0x04, 0x05]).unwrap();
        assert_eq!(
            Command::from_frame(&long_key),
            Err(FrameError::UnknownType(MSG_KEY_PRESS))
        );
    }

    #[test]
    fn test_command_roundtrip_through_wire() {
        let commands = [
            Command::MoveBy { dx: -300, dy: 7 },
            Command::MoveTo { x: 1, y: 65535 },
            Command::Scroll(-128),
            Command::MousePress(MOUSE_RIGHT | MOUSE_MIDDLE),
            Command::MouseRelease(RELEASE_ALL),
            Command::SetResolution {
                width: 2560,
                height: 1440,
            },
            Command::KeyPress(0xE1),
            Command::KeyRelease(0x04),
        ];

        let mut decoder = FrameDecoder::new();
        for original in commands {
            let encoded = original.to_frame().unwrap().encode_to_vec().unwrap();
            let frame = decoder.feed_bytes(&encoded).unwrap().unwrap();
            assert_eq!(Command::from_frame(&frame), Ok(original));
        }
    }
}
