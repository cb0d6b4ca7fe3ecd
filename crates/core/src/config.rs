use crate::error::ConfigError;
use std::fmt;

pub const DEFAULT_SOURCE_URL: &str = "https://exemplo.com/api/data";
pub const DEFAULT_TABLE: &str = "NomeDaTabelaNoDynamoDB";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SUBJECT: &str = "Site data";

/// Where the payload is fetched from
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub url: String,
}

/// SMTP relay and the account used to authenticate against it
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Envelope of the notification email
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from: String,
    pub to: String,
    pub subject: String,
}

/// Target table for the persisted record
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub table: String,
    pub region: String,
}

/// Process-wide configuration, built once at startup and handed to the adapters
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub source: SourceConfig,
    pub smtp: SmtpConfig,
    pub mail: MailConfig,
    pub store: StoreConfig,
}

impl RelayConfig {
    /// Rejects settings that would only fail later at the network layer
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.source.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("source url", "must not be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(
                "source url",
                format!("expected an http(s) URL, got {}", url),
            ));
        }

        require("smtp host", &self.smtp.host)?;
        if self.smtp.port == 0 {
            return Err(ConfigError::Invalid("smtp port", "must not be 0".into()));
        }
        require("smtp username", &self.smtp.username)?;
        require("mail from", &self.mail.from)?;
        require("mail to", &self.mail.to)?;
        require("table", &self.store.table)?;
        require("region", &self.store.region)?;

        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Invalid(field, "must not be empty".into()))
    } else {
        Ok(())
    }
}
