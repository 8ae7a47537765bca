//! HID report sink trait

/// Destination for finished HID input reports
///
/// This is the only operation the relay needs from the USB side. The
/// implementation decides how the report reaches the host (direct endpoint
/// write, queue to a USB task, capture in tests).
pub trait ReportSink {
    /// Error type for report submission
    type Error;

    /// Submit one input report
    ///
    /// - `report_id`: HID report ID declared in the report descriptor
    /// - `report`: report body, without the ID byte
    fn send_report(&mut self, report_id: u8, report: &[u8]) -> Result<(), Self::Error>;
}

impl<T: ReportSink + ?Sized> ReportSink for &mut T {
    type Error = T::Error;

    fn send_report(&mut self, report_id: u8, report: &[u8]) -> Result<(), Self::Error> {
        (**self).send_report(report_id, report)
    }
}
