//! Report sink backed by the USB report channel

use defmt::*;
use heapless::Vec;

use kmrelay_core::ReportSink;

use crate::channels::{QueuedReport, REPORT_CHANNEL};

/// Report submission failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum SinkError {
    /// Report body larger than any declared report
    TooLarge,
    /// USB task is not keeping up
    QueueFull,
}

/// Queues reports for the USB HID task without blocking
///
/// A rejected report is not lost: the output keeps it pending and the
/// serial task retries it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelSink;

impl ReportSink for ChannelSink {
    type Error = SinkError;

    fn send_report(&mut self, report_id: u8, report: &[u8]) -> Result<(), Self::Error> {
        let mut bytes = Vec::new();
        bytes.push(report_id).map_err(|_| SinkError::TooLarge)?;
        bytes
            .extend_from_slice(report)
            .map_err(|_| SinkError::TooLarge)?;

        REPORT_CHANNEL.try_send(QueuedReport { bytes }).map_err(|_| {
            debug!("Report channel full, deferring report {}", report_id);
            SinkError::QueueFull
        })
    }
}
