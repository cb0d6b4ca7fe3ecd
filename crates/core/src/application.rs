use crate::domain::Stage;
use crate::error::PipelineError;
use crate::ports::{Fetcher, Notifier, Recorder};
use chrono::Utc;

/// Application service running fetch, notify and record strictly in sequence
pub struct RelayServiceImpl {
    fetcher: Box<dyn Fetcher>,
    notifier: Box<dyn Notifier>,
    recorder: Box<dyn Recorder>,
}

impl RelayServiceImpl {
    /// Creates a new RelayServiceImpl with the given adapters
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        notifier: Box<dyn Notifier>,
        recorder: Box<dyn Recorder>,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            recorder,
        }
    }

    /// Executes one run. The first failing stage aborts the run; nothing already
    /// done (an email sent) is undone.
    pub fn execute_relay(&self) -> Result<(), PipelineError> {
        tracing::info!(stage = %Stage::Fetch, "starting stage");
        let mut record = self.fetcher.fetch()?;
        tracing::debug!(stage = %Stage::Fetch, fields = record.len(), "stage completed");

        tracing::info!(stage = %Stage::Notify, "starting stage");
        self.notifier.notify(&record)?;
        tracing::debug!(stage = %Stage::Notify, "stage completed");

        record.stamp(Utc::now());

        tracing::info!(stage = %Stage::Record, "starting stage");
        self.recorder.record(record)?;
        tracing::debug!(stage = %Stage::Record, "stage completed");

        Ok(())
    }
}
