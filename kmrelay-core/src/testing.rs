//! Test doubles shared by the unit tests

use std::vec::Vec;

use crate::traits::ReportSink;

/// Sink that records every report it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub reports: Vec<(u8, Vec<u8>)>,
    /// Reject every report when set
    pub fail: bool,
}

/// Error returned by a failing [`RecordingSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected;

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            reports: Vec::new(),
            fail: true,
        }
    }

    /// Reports sent with the given ID, in order
    pub fn with_id(&self, report_id: u8) -> Vec<Vec<u8>> {
        self.reports
            .iter()
            .filter(|(id, _)| *id == report_id)
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Most recent report sent with the given ID
    pub fn last(&self, report_id: u8) -> Option<Vec<u8>> {
        self.with_id(report_id).pop()
    }
}

impl ReportSink for RecordingSink {
    type Error = Rejected;

    fn send_report(&mut self, report_id: u8, report: &[u8]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(Rejected);
        }
        self.reports.push((report_id, report.to_vec()));
        Ok(())
    }
}
