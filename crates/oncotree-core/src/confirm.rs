//! Confirmation gate for reported changes.

use crate::errors::Result;
use crate::report::ChangeReport;

/// Ask whoever owns the snapshots whether the reported changes are intentional.
pub trait ChangeConfirmer {
    /// Present the report and return the answer.
    ///
    /// # Errors
    ///
    /// Returns `Confirmation` if no answer could be obtained.
    fn confirm(&self, report: &ChangeReport) -> Result<bool>;
}

/// Accepts every report. Used for unattended runs and tests.
pub struct AlwaysAccept;

impl ChangeConfirmer for AlwaysAccept {
    fn confirm(&self, _: &ChangeReport) -> Result<bool> {
        Ok(true)
    }
}

/// Declines every report.
pub struct AlwaysDecline;

impl ChangeConfirmer for AlwaysDecline {
    fn confirm(&self, _: &ChangeReport) -> Result<bool> {
        Ok(false)
    }
}
