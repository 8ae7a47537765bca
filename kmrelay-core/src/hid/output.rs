//! HID output adapter
//!
//! Applies relay actions to pointer and keyboard state and hands the
//! resulting reports to a [`ReportSink`].

use crate::config::{RelayConfig, ReportMode};
use crate::traits::ReportSink;

use super::keyboard::{KeyboardState, KEYBOARD_REPORT_ID};
use super::pointer::{PointerState, POINTER_REPORT_ID};

/// Pointer + keyboard output bound to a report sink
///
/// State the sink has not accepted yet stays pending until a later report
/// or [`HidOutput::flush`] delivers it. Button and key transitions are
/// never merged: a pending transition is sent before the next one is
/// applied.
#[derive(Debug)]
pub struct HidOutput<S> {
    sink: S,
    mode: ReportMode,
    pointer: PointerState,
    keyboard: KeyboardState,
    pointer_pending: bool,
    keyboard_pending: bool,
    /// Button bits changed since the last delivered pointer report
    buttons_pending: bool,
}

impl<S: ReportSink> HidOutput<S> {
    /// Create an output adapter from configuration
    pub fn new(config: &RelayConfig, sink: S) -> Self {
        Self {
            sink,
            mode: config.report_mode,
            pointer: PointerState::new(config.width, config.height),
            keyboard: KeyboardState::new(),
            pointer_pending: false,
            keyboard_pending: false,
            buttons_pending: false,
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn report_mode(&self) -> ReportMode {
        self.mode
    }

    /// True when some state has not reached the sink
    pub fn has_pending(&self) -> bool {
        self.pointer_pending || self.keyboard_pending
    }

    /// Move the pointer to an absolute reference-space position
    pub fn set_position(&mut self, x: u16, y: u16) -> Result<(), S::Error> {
        self.pointer.set_position(x, y);
        self.pointer_changed()
    }

    /// Move the pointer by a reference-space offset
    pub fn move_by(&mut self, dx: i16, dy: i16) -> Result<(), S::Error> {
        self.pointer.move_by(dx, dy);
        self.pointer_changed()
    }

    /// Scroll the wheel once
    pub fn scroll(&mut self, step: i8) -> Result<(), S::Error> {
        self.pointer.scroll(step);
        self.pointer_changed()
    }

    /// Press mouse buttons
    pub fn press(&mut self, mask: u8) -> Result<(), S::Error> {
        self.update_buttons(|pointer| pointer.press(mask))
    }

    /// Release mouse buttons
    pub fn release(&mut self, mask: u8) -> Result<(), S::Error> {
        self.update_buttons(|pointer| pointer.release(mask))
    }

    /// Release every mouse button
    pub fn release_all_buttons(&mut self) -> Result<(), S::Error> {
        self.update_buttons(PointerState::release_all)
    }

    /// Change the reference resolution
    ///
    /// Returns `false` without touching state if either dimension is zero.
    /// Nothing visible changes, so no report is sent.
    pub fn set_resolution(&mut self, width: u16, height: u16) -> bool {
        self.pointer.set_resolution(width, height)
    }

    /// Hold a key
    pub fn key_press(&mut self, usage: u8) -> Result<(), S::Error> {
        self.update_keys(|keyboard| keyboard.press(usage))
    }

    /// Release a key
    pub fn key_release(&mut self, usage: u8) -> Result<(), S::Error> {
        self.update_keys(|keyboard| keyboard.release(usage))
    }

    /// Release every key and modifier
    pub fn release_all_keys(&mut self) -> Result<(), S::Error> {
        self.update_keys(KeyboardState::release_all)
    }

    /// Send the pointer report
    ///
    /// The wheel delta is cleared even if the sink rejects the report.
    pub fn report_pointer(&mut self) -> Result<(), S::Error> {
        let report = self.pointer.take_report();
        match self.sink.send_report(POINTER_REPORT_ID, &report) {
            Ok(()) => {
                self.pointer_pending = false;
                self.buttons_pending = false;
                Ok(())
            }
            Err(error) => {
                self.pointer_pending = true;
                Err(error)
            }
        }
    }

    /// Send the keyboard report
    pub fn report_keyboard(&mut self) -> Result<(), S::Error> {
        let report = self.keyboard.to_report();
        let result = self.sink.send_report(KEYBOARD_REPORT_ID, &report);
        self.keyboard_pending = result.is_err();
        result
    }

    /// Send every report whose state has not reached the sink
    pub fn flush(&mut self) -> Result<(), S::Error> {
        let pointer = if self.pointer_pending {
            self.report_pointer()
        } else {
            Ok(())
        };
        let keyboard = if self.keyboard_pending {
            self.report_keyboard()
        } else {
            Ok(())
        };
        pointer.and(keyboard)
    }

    fn pointer_changed(&mut self) -> Result<(), S::Error> {
        self.pointer_pending = true;
        match self.mode {
            ReportMode::Auto => self.report_pointer(),
            ReportMode::Manual => Ok(()),
        }
    }

    fn update_buttons(&mut self, update: impl FnOnce(&mut PointerState)) -> Result<(), S::Error> {
        let settled = if self.buttons_pending {
            self.report_pointer()
        } else {
            Ok(())
        };

        let before = self.pointer.buttons();
        update(&mut self.pointer);
        self.buttons_pending |= before != self.pointer.buttons();
        settled.and(self.pointer_changed())
    }

    fn update_keys(
        &mut self,
        update: impl FnOnce(&mut KeyboardState) -> bool,
    ) -> Result<(), S::Error> {
        let settled = if self.keyboard_pending {
            self.report_keyboard()
        } else {
            Ok(())
        };

        update(&mut self.keyboard);
        self.keyboard_pending = true;
        let reported = match self.mode {
            ReportMode::Auto => self.report_keyboard(),
            ReportMode::Manual => Ok(()),
        };
        settled.and(reported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;

    fn output(mode: ReportMode) -> HidOutput<RecordingSink> {
        let config = RelayConfig {
            report_mode: mode,
            ..RelayConfig::default()
        };
        HidOutput::new(&config, RecordingSink::new())
    }

    #[test]
    fn test_auto_mode_reports_every_mutation() {
        let mut out = output(ReportMode::Auto);
        out.set_position(960, 540).unwrap();
        out.press(0x01).unwrap();
        out.key_press(0x04).unwrap();

        let sink = out.sink();
        assert_eq!(
            sink.with_id(POINTER_REPORT_ID),
            [
                [0x00, 0xFF, 0x3F, 0xFF, 0x3F, 0x00].to_vec(),
                [0x01, 0xFF, 0x3F, 0xFF, 0x3F, 0x00].to_vec(),
            ]
        );
        assert_eq!(
            sink.last(KEYBOARD_REPORT_ID),
            Some([0, 0, 0x04, 0, 0, 0, 0, 0].to_vec())
        );
    }

    #[test]
    fn test_manual_mode_defers_reports() {
        let mut out = output(ReportMode::Manual);
        out.move_by(100, 100).unwrap();
        out.scroll(3).unwrap();
        assert!(out.sink().reports.is_empty());

        out.report_pointer().unwrap();
        assert_eq!(out.sink().reports.len(), 1);
        assert_eq!(out.sink().last(POINTER_REPORT_ID).unwrap()[5], 3);
    }

    #[test]
    fn test_scroll_is_one_shot() {
        let mut out = output(ReportMode::Auto);
        out.scroll(5).unwrap();
        out.report_pointer().unwrap();

        let reports = out.sink().with_id(POINTER_REPORT_ID);
        assert_eq!(reports[0][5], 5);
        assert_eq!(reports[1][5], 0);
    }

    #[test]
    fn test_scroll_cleared_when_sink_rejects() {
        let config = RelayConfig::default();
        let mut out = HidOutput::new(&config, RecordingSink::failing());
        assert!(out.scroll(5).is_err());
        assert_eq!(out.pointer().scroll_delta(), 0);
    }

    #[test]
    fn test_zero_resolution_rejected_without_report() {
        let mut out = output(ReportMode::Auto);
        assert!(!out.set_resolution(0, 0));
        assert_eq!(out.pointer().resolution(), (1920, 1080));
        assert!(out.sink().reports.is_empty());
    }

    #[test]
    fn test_release_all_keys() {
        let mut out = output(ReportMode::Auto);
        out.key_press(0xE0).unwrap();
        out.key_press(0x06).unwrap();
        out.release_all_keys().unwrap();

        assert!(out.keyboard().is_empty());
        assert_eq!(out.sink().last(KEYBOARD_REPORT_ID), Some([0u8; 8].to_vec()));
    }

    #[test]
    fn test_manual_click_within_one_batch_is_delivered() {
        let mut out = output(ReportMode::Manual);
        out.press(0x01).unwrap();
        out.release(0x01).unwrap();
        out.flush().unwrap();

        assert_eq!(
            out.sink().with_id(POINTER_REPORT_ID),
            [[0x01, 0, 0, 0, 0, 0].to_vec(), [0x00, 0, 0, 0, 0, 0].to_vec()]
        );
        assert!(!out.has_pending());
    }

    #[test]
    fn test_manual_keystroke_within_one_batch_is_delivered() {
        let mut out = output(ReportMode::Manual);
        out.key_press(0x04).unwrap();
        out.key_release(0x04).unwrap();
        out.flush().unwrap();

        assert_eq!(
            out.sink().with_id(KEYBOARD_REPORT_ID),
            [[0, 0, 0x04, 0, 0, 0, 0, 0].to_vec(), [0u8; 8].to_vec()]
        );
    }

    #[test]
    fn test_manual_moves_are_batched() {
        let mut out = output(ReportMode::Manual);
        out.press(0x01).unwrap();
        out.move_by(10, 0).unwrap();
        out.move_by(10, 0).unwrap();
        out.flush().unwrap();

        assert_eq!(out.sink().reports.len(), 1);
        assert_eq!(out.pointer().cursor(), (20, 0));
        assert_eq!(out.sink().last(POINTER_REPORT_ID).unwrap()[0], 0x01);
    }

    #[test]
    fn test_rejected_release_is_retried_on_flush() {
        let mut out = output(ReportMode::Auto);
        out.press(0x01).unwrap();

        out.sink_mut().fail = true;
        assert!(out.release(0x01).is_err());
        assert!(out.has_pending());

        out.sink_mut().fail = false;
        out.flush().unwrap();
        assert!(!out.has_pending());
        assert_eq!(out.sink().last(POINTER_REPORT_ID).unwrap()[0], 0x00);
    }

    #[test]
    fn test_rejected_key_release_sent_before_next_key() {
        let mut out = output(ReportMode::Auto);
        out.key_press(0x04).unwrap();

        out.sink_mut().fail = true;
        assert!(out.key_release(0x04).is_err());

        out.sink_mut().fail = false;
        out.key_press(0x05).unwrap();
        assert_eq!(
            out.sink().with_id(KEYBOARD_REPORT_ID),
            [
                [0, 0, 0x04, 0, 0, 0, 0, 0].to_vec(),
                [0u8; 8].to_vec(),
                [0, 0, 0x05, 0, 0, 0, 0, 0].to_vec(),
            ]
        );
    }

    #[test]
    fn test_flush_without_changes_sends_nothing() {
        let mut out = output(ReportMode::Manual);
        out.flush().unwrap();
        assert!(out.sink().reports.is_empty());
    }
}
