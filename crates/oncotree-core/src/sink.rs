//! Hand-off of an accepted snapshot.

use crate::errors::Result;
use crate::report::ChangeReport;
use crate::snapshot::Snapshot;

/// Receives the validated modified snapshot once its changes are confirmed.
pub trait AcceptedSink {
    /// Take the accepted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Sink` if the snapshot cannot be written out.
    fn accept(&self, modified: &Snapshot, report: &ChangeReport) -> Result<()>;
}

/// Discards the accepted snapshot.
pub struct NoopSink;

impl AcceptedSink for NoopSink {
    fn accept(&self, _: &Snapshot, _: &ChangeReport) -> Result<()> {
        Ok(())
    }
}
