use crate::domain::Record;
use crate::error::{FetchError, NotifyError, RecordError};

/// Source of the payload for a run
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Fetcher {
    fn fetch(&self) -> Result<Record, FetchError>;
}

/// Sends a rendering of the record to a fixed recipient
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Notifier {
    fn notify(&self, record: &Record) -> Result<(), NotifyError>;
}

/// Persists a stamped record as a single item
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Recorder {
    fn record(&self, record: Record) -> Result<(), RecordError>;
}
