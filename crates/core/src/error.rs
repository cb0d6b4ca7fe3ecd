use crate::domain::Stage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response status: {code}")]
    UnexpectedStatus { code: u16 },

    #[error("failed to decode response body: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
#[error("failed to send email: {0}")]
pub struct NotifyError(pub String);

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to establish store session: {0}")]
    Session(String),

    #[error("failed to convert record: {0}")]
    Conversion(String),

    #[error("failed to write item: {0}")]
    Write(String),
}

/// Fatal failure of a run, tagged with the stage that produced it
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Fetch(_) => Stage::Fetch,
            PipelineError::Notify(_) => Stage::Notify,
            PipelineError::Record(_) => Stage::Record,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {0}: {1}")]
    Invalid(&'static str, String),
}
