use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use relay_core::config::{MailConfig, SmtpConfig};
use relay_core::domain::Record;
use relay_core::error::NotifyError;
use relay_core::ports::Notifier;
use relay_core::utils::render_fields_html;
use std::fmt::Display;

/// Email notifier sending one HTML message per call through an SMTP transport
pub struct SmtpNotifier<T = SmtpTransport> {
    transport: T,
    from: Mailbox,
    to: Mailbox,
    subject: String,
}

impl SmtpNotifier<SmtpTransport> {
    /// Connects lazily to the relay using STARTTLS and username/password auth
    pub fn new(smtp: &SmtpConfig, mail: &MailConfig) -> Result<Self, NotifyError> {
        let transport = SmtpTransport::starttls_relay(&smtp.host)
            .map_err(|e| NotifyError(format!("invalid relay {}: {}", smtp.host, e)))?
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        Self::with_transport(transport, mail)
    }
}

impl<T> SmtpNotifier<T> {
    pub fn with_transport(transport: T, mail: &MailConfig) -> Result<Self, NotifyError> {
        Ok(Self {
            transport,
            from: parse_mailbox("from", &mail.from)?,
            to: parse_mailbox("to", &mail.to)?,
            subject: mail.subject.clone(),
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the message for a record without sending it
    pub fn build_message(&self, record: &Record) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(render_fields_html(record.fields()))
            .map_err(|e| NotifyError(e.to_string()))
    }
}

impl<T> Notifier for SmtpNotifier<T>
where
    T: Transport,
    T::Error: Display,
{
    fn notify(&self, record: &Record) -> Result<(), NotifyError> {
        let message = self.build_message(record)?;

        self.transport
            .send(&message)
            .map_err(|e| NotifyError(e.to_string()))?;

        tracing::debug!(to = %self.to, "notification sent");
        Ok(())
    }
}

fn parse_mailbox(field: &str, address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|e| NotifyError(format!("invalid {} address {:?}: {}", field, address, e)))
}
