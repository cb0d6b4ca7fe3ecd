use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::Client;
use relay_core::config::StoreConfig;
use relay_core::domain::Record;
use relay_core::error::RecordError;
use relay_core::ports::Recorder;
use serde_json::Value;
use std::collections::HashMap;
use tokio::runtime::{Builder, Runtime};

pub use aws_sdk_dynamodb::types::AttributeValue;

/// DynamoDB rejects documents nested deeper than this
pub const MAX_NESTING_DEPTH: usize = 32;

pub type Item = HashMap<String, AttributeValue>;

/// DynamoDB implementation of the Recorder trait.
///
/// The SDK is async only, so the recorder drives each write on its own
/// current-thread runtime and blocks the caller until it finishes.
pub struct DynamoDbRecorder {
    table: String,
    region: String,
    runtime: Runtime,
}

impl DynamoDbRecorder {
    pub fn new(config: &StoreConfig) -> Result<Self, RecordError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RecordError::Session(format!("failed to start runtime: {}", e)))?;

        Ok(Self {
            table: config.table.clone(),
            region: config.region.clone(),
            runtime,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    async fn client(&self) -> Result<Client, RecordError> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .load()
            .await;

        // Credentials resolve before any item is converted or written
        let provider = sdk_config.credentials_provider().ok_or_else(|| {
            RecordError::Session("no credentials provider available".to_string())
        })?;
        provider
            .provide_credentials()
            .await
            .map_err(|e| RecordError::Session(DisplayErrorContext(&e).to_string()))?;

        Ok(Client::new(&sdk_config))
    }
}

impl Recorder for DynamoDbRecorder {
    fn record(&self, record: Record) -> Result<(), RecordError> {
        self.runtime.block_on(async move {
            let client = self.client().await?;
            let item = to_item(record)?;

            tracing::debug!(
                table = %self.table,
                region = %self.region,
                attributes = item.len(),
                "writing item"
            );

            client
                .put_item()
                .table_name(&self.table)
                .set_item(Some(item))
                .send()
                .await
                .map_err(|e| RecordError::Write(DisplayErrorContext(&e).to_string()))?;

            Ok(())
        })
    }
}

/// Converts a record into DynamoDB's attribute representation
pub fn to_item(record: Record) -> Result<Item, RecordError> {
    record
        .into_fields()
        .into_iter()
        .map(|(key, value)| Ok::<_, RecordError>((key, to_attribute(value, 1)?)))
        .collect()
}

fn to_attribute(value: Value, depth: usize) -> Result<AttributeValue, RecordError> {
    let attribute = match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(items) => {
            check_depth(depth)?;
            let list = items
                .into_iter()
                .map(|item| to_attribute(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            AttributeValue::L(list)
        }
        Value::Object(fields) => {
            check_depth(depth)?;
            let map = fields
                .into_iter()
                .map(|(key, value)| Ok::<_, RecordError>((key, to_attribute(value, depth + 1)?)))
                .collect::<Result<HashMap<_, _>, RecordError>>()?;
            AttributeValue::M(map)
        }
    };

    Ok(attribute)
}

fn check_depth(depth: usize) -> Result<(), RecordError> {
    if depth > MAX_NESTING_DEPTH {
        Err(RecordError::Conversion(format!(
            "document nested deeper than {} levels",
            MAX_NESTING_DEPTH
        )))
    } else {
        Ok(())
    }
}
