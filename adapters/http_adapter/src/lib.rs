use relay_core::config::SourceConfig;
use relay_core::domain::Record;
use relay_core::error::FetchError;
use relay_core::ports::Fetcher;
use reqwest::blocking::Client;
use reqwest::StatusCode;

/// Blocking HTTP implementation of the Fetcher trait
pub struct HttpFetcher {
    url: String,
    client: Client,
}

impl HttpFetcher {
    /// Creates a new HttpFetcher for the configured source URL
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            url: config.url.clone(),
            client: Client::new(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self) -> Result<Record, FetchError> {
        tracing::debug!(url = %self.url, "requesting payload");

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                code: status.as_u16(),
            });
        }

        // Read the whole body before decoding so a truncated stream is a transport error
        let body = response
            .bytes()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        decode_record(&body)
    }
}

/// Decodes a response body into a Record; the top-level value must be a JSON object
pub fn decode_record(body: &[u8]) -> Result<Record, FetchError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let kind = json_kind(&value);
    Record::from_value(value)
        .ok_or_else(|| FetchError::Decode(format!("expected a JSON object, got {}", kind)))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
