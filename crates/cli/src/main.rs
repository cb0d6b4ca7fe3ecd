use clap::Parser;
use dynamodb_adapter::DynamoDbRecorder;
use http_adapter::HttpFetcher;
use relay_core::application::RelayServiceImpl;
use relay_core::config::{
    MailConfig, RelayConfig, SmtpConfig, SourceConfig, StoreConfig, DEFAULT_REGION,
    DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, DEFAULT_SOURCE_URL, DEFAULT_SUBJECT, DEFAULT_TABLE,
};
use relay_core::ports::{Fetcher, Notifier, Recorder};
use smtp_adapter::SmtpNotifier;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fetches a JSON payload, emails it, then stores it with a timestamp in DynamoDB
#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(about = "Fetches a JSON payload, emails a rendering of it and records it in DynamoDB")]
#[command(version)]
struct Cli {
    /// URL the JSON payload is fetched from
    #[arg(long, env = "RELAY_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    source_url: String,

    /// DynamoDB table the record is written to
    #[arg(long, env = "RELAY_TABLE", default_value = DEFAULT_TABLE)]
    table: String,

    /// AWS region of the table
    #[arg(long, env = "RELAY_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// SMTP relay host
    #[arg(long, env = "RELAY_SMTP_HOST", default_value = DEFAULT_SMTP_HOST)]
    smtp_host: String,

    /// SMTP relay port (STARTTLS)
    #[arg(long, env = "RELAY_SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
    smtp_port: u16,

    /// Account used to authenticate against the relay
    #[arg(long, env = "RELAY_SMTP_USERNAME")]
    smtp_username: String,

    /// Password for the relay account
    #[arg(long, env = "RELAY_SMTP_PASSWORD", hide_env_values = true)]
    smtp_password: String,

    /// Sender address, defaults to the SMTP username
    #[arg(long, env = "RELAY_MAIL_FROM")]
    mail_from: Option<String>,

    /// Recipient address
    #[arg(long, env = "RELAY_MAIL_TO")]
    mail_to: String,

    /// Subject line of the notification
    #[arg(long, env = "RELAY_SUBJECT", default_value = DEFAULT_SUBJECT)]
    subject: String,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn into_config(self) -> RelayConfig {
        let from = self
            .mail_from
            .unwrap_or_else(|| self.smtp_username.clone());

        RelayConfig {
            source: SourceConfig {
                url: self.source_url,
            },
            smtp: SmtpConfig {
                host: self.smtp_host,
                port: self.smtp_port,
                username: self.smtp_username,
                password: self.smtp_password,
            },
            mail: MailConfig {
                from,
                to: self.mail_to,
                subject: self.subject,
            },
            store: StoreConfig {
                table: self.table,
                region: self.region,
            },
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr; stdout only carries the success line
    let ansi = std::io::stderr().is_terminal();
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let config = cli.into_config();
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }

    // Instantiate concrete implementations of secondary adapters
    let fetcher: Box<dyn Fetcher> = Box::new(HttpFetcher::new(&config.source));

    let notifier: Box<dyn Notifier> = match SmtpNotifier::new(&config.smtp, &config.mail) {
        Ok(notifier) => Box::new(notifier),
        Err(e) => {
            tracing::error!(error = %e, "failed to set up notifier");
            std::process::exit(1);
        }
    };

    let recorder: Box<dyn Recorder> = match DynamoDbRecorder::new(&config.store) {
        Ok(recorder) => Box::new(recorder),
        Err(e) => {
            tracing::error!(error = %e, "failed to set up recorder");
            std::process::exit(1);
        }
    };

    let service = RelayServiceImpl::new(fetcher, notifier, recorder);

    match service.execute_relay() {
        Ok(()) => {
            tracing::info!(table = %config.store.table, "record stored");
            println!("Operation completed successfully!");
        }
        Err(e) => {
            tracing::error!(stage = %e.stage(), error = %e, "run failed");
            std::process::exit(1);
        }
    }
}
