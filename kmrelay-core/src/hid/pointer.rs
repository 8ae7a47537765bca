//! Absolute pointer state
//!
//! Report layout (6 bytes, report ID 1):
//! ```text
//! Byte 0:   Button bitfield (bit 0 = left, bit 1 = right, bit 2 = middle)
//! Byte 1-2: X, little-endian, 0..=32767
//! Byte 3-4: Y, little-endian, 0..=32767
//! Byte 5:   Wheel, signed, reported once
//! ```
//!
//! The host addresses the pointer in its own screen resolution (the
//! reference resolution). Positions are rescaled into the fixed logical
//! range of the report descriptor before they are stored.

/// Logical maximum of the X and Y axes
pub const ABS_MAX: u16 = 32767;

/// Report ID of the pointer report
pub const POINTER_REPORT_ID: u8 = 1;

/// Pointer report body size in bytes
pub const POINTER_REPORT_LEN: usize = 6;

/// Logical maximum of the wheel axis; the minimum is its negation
pub const WHEEL_MAX: i8 = 127;

/// Valid button bits
const BUTTON_MASK: u8 = 0x07;

/// Rescale a reference-space coordinate into `0..=ABS_MAX`
///
/// A reference of exactly `ABS_MAX` passes coordinates through unchanged.
pub fn rescale(value: u32, reference: u32) -> u16 {
    let value = value.min(reference);
    if reference == ABS_MAX as u32 {
        value as u16
    } else {
        (ABS_MAX as u32 * value / reference) as u16
    }
}

fn scale_axis(value: u32, from: u32, to: u32) -> u32 {
    (value as u64 * to as u64 / from as u64) as u32
}

/// Absolute pointer state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerState {
    buttons: u8,
    x: u16,
    y: u16,
    scroll: i8,
    width: u32,
    height: u32,
    /// Last position in reference coordinates, used by relative moves
    cursor: (u32, u32),
}

impl PointerState {
    /// Create pointer state for a reference resolution
    ///
    /// Zero dimensions are raised to 1.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buttons: 0,
            x: 0,
            y: 0,
            scroll: 0,
            width: width.max(1) as u32,
            height: height.max(1) as u32,
            cursor: (0, 0),
        }
    }

    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    /// Normalized position
    pub fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    /// Position in reference coordinates
    pub fn cursor(&self) -> (u32, u32) {
        self.cursor
    }

    /// Pending wheel delta
    pub fn scroll_delta(&self) -> i8 {
        self.scroll
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Move to an absolute position in reference coordinates
    pub fn set_position(&mut self, x: u16, y: u16) {
        self.set_cursor(x as u32, y as u32);
    }

    /// Move by an offset in reference coordinates, clamped to the screen
    pub fn move_by(&mut self, dx: i16, dy: i16) {
        let x = (self.cursor.0 as i64 + dx as i64).clamp(0, self.width as i64);
        let y = (self.cursor.1 as i64 + dy as i64).clamp(0, self.height as i64);
        self.set_cursor(x as u32, y as u32);
    }

    /// Set the one-shot wheel delta
    ///
    /// The wheel's logical range is symmetric, so -128 is sent as -127.
    pub fn scroll(&mut self, step: i8) {
        self.scroll = step.max(-WHEEL_MAX);
    }

    /// Set button bits
    pub fn press(&mut self, mask: u8) {
        self.buttons |= mask & BUTTON_MASK;
    }

    /// Clear button bits
    pub fn release(&mut self, mask: u8) {
        self.buttons &= !mask;
    }

    /// Clear all button bits
    pub fn release_all(&mut self) {
        self.buttons = 0;
    }

    /// Change the reference resolution
    ///
    /// The normalized position is kept and the reference-space cursor is
    /// scaled into the new resolution. Resending the current resolution
    /// changes nothing. Returns `false` and changes nothing if either
    /// dimension is zero.
    pub fn set_resolution(&mut self, width: u16, height: u16) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let (width, height) = (width as u32, height as u32);
        if (width, height) == (self.width, self.height) {
            return true;
        }
        self.cursor = (
            scale_axis(self.cursor.0, self.width, width),
            scale_axis(self.cursor.1, self.height, height),
        );
        self.width = width;
        self.height = height;
        true
    }

    /// Encode the report body
    pub fn to_report(&self) -> [u8; POINTER_REPORT_LEN] {
        let [x_lo, x_hi] = self.x.to_le_bytes();
        let [y_lo, y_hi] = self.y.to_le_bytes();
        [self.buttons, x_lo, x_hi, y_lo, y_hi, self.scroll as u8]
    }

    /// Encode the report body and clear the wheel delta
    pub fn take_report(&mut self) -> [u8; POINTER_REPORT_LEN] {
        let report = self.to_report();
        self.scroll = 0;
        report
    }

    fn set_cursor(&mut self, x: u32, y: u32) {
        self.cursor = (x.min(self.width), y.min(self.height));
        self.x = rescale(self.cursor.0, self.width);
        self.y = rescale(self.cursor.1, self.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rescale_center_of_1080p() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.set_position(960, 540);
        assert_eq!(pointer.position(), (16383, 16383));
    }

    #[test]
    fn test_native_range_passes_through() {
        let mut pointer = PointerState::new(ABS_MAX, ABS_MAX);
        pointer.set_position(1234, 32767);
        assert_eq!(pointer.position(), (1234, 32767));
    }

    #[test]
    fn test_position_clamped_to_reference() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.set_position(5000, 1080);
        assert_eq!(pointer.cursor(), (1920, 1080));
        assert_eq!(pointer.position(), (ABS_MAX, ABS_MAX));
    }

    #[test]
    fn test_move_by_clamps() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.set_position(10, 10);
        pointer.move_by(-50, 20);
        assert_eq!(pointer.cursor(), (0, 30));

        pointer.move_by(i16::MAX, i16::MAX);
        assert_eq!(pointer.cursor(), (1920, 1080));
        assert_eq!(pointer.position(), (ABS_MAX, ABS_MAX));
    }

    #[test]
    fn test_move_by_accumulates() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.move_by(960, 0);
        pointer.move_by(0, 540);
        assert_eq!(pointer.position(), (16383, 16383));
    }

    #[test]
    fn test_buttons_persist_and_mask() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.press(0x01);
        pointer.press(0xFC);
        assert_eq!(pointer.buttons(), 0x05);
        pointer.release(0x01);
        assert_eq!(pointer.buttons(), 0x04);
        pointer.release_all();
        assert_eq!(pointer.buttons(), 0);
    }

    #[test]
    fn test_report_layout() {
        let mut pointer = PointerState::new(ABS_MAX, ABS_MAX);
        pointer.set_position(0x1234, 0x0567);
        pointer.press(0x02);
        pointer.scroll(-2);
        assert_eq!(pointer.to_report(), [0x02, 0x34, 0x12, 0x67, 0x05, 0xFE]);
    }

    #[test]
    fn test_take_report_clears_scroll_only() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.press(0x01);
        pointer.scroll(5);

        assert_eq!(pointer.take_report()[5], 5);
        let second = pointer.take_report();
        assert_eq!(second[5], 0);
        assert_eq!(second[0], 0x01);
    }

    #[test]
    fn test_set_resolution_keeps_position() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.set_position(1920, 1080);
        assert!(pointer.set_resolution(2560, 1440));
        assert_eq!(pointer.position(), (ABS_MAX, ABS_MAX));
        assert_eq!(pointer.cursor(), (2560, 1440));
    }

    #[test]
    fn test_repeated_resolution_keeps_cursor() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.set_position(960, 540);
        assert!(pointer.set_resolution(1920, 1080));
        assert_eq!(pointer.cursor(), (960, 540));

        pointer.move_by(1, 1);
        assert_eq!(pointer.cursor(), (961, 541));
        assert_eq!(pointer.position(), (16400, 16413));
    }

    #[test]
    fn test_set_resolution_scales_exact_cursor() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.set_position(961, 541);
        assert!(pointer.set_resolution(3840, 2160));
        assert_eq!(pointer.cursor(), (1922, 1082));
        assert_eq!(pointer.position(), (16400, 16413));

        assert!(pointer.set_resolution(1920, 1080));
        assert_eq!(pointer.cursor(), (961, 541));
    }

    #[test]
    fn test_scroll_clamped_to_wheel_range() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.scroll(i8::MIN);
        assert_eq!(pointer.scroll_delta(), -127);
        assert_eq!(pointer.to_report()[5], 0x81);

        pointer.scroll(i8::MAX);
        assert_eq!(pointer.scroll_delta(), 127);
    }

    #[test]
    fn test_set_resolution_rejects_zero() {
        let mut pointer = PointerState::new(1920, 1080);
        assert!(!pointer.set_resolution(0, 1080));
        assert_eq!(pointer.resolution(), (1920, 1080));
    }

    proptest! {
        #[test]
        fn prop_rescale_matches_floor_formula(
            reference in 1u32..=u16::MAX as u32,
            value in 0u32..=u16::MAX as u32,
        ) {
            let scaled = rescale(value, reference);
            prop_assert!(scaled <= ABS_MAX);
            if value < reference && reference != ABS_MAX as u32 {
                prop_assert_eq!(scaled as u32, 32767 * value / reference);
            }
        }
    }
}
