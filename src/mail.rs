//! Outgoing mail: message type, delivery trait and backends.
//!
//! - `SmtpMailer` delivers through an SMTP relay with lettre.
//! - `ConsoleMailer` writes messages to the log (development).
//! - `MemoryMailer` keeps messages in memory (tests).

use std::fmt;
use std::sync::Mutex;

use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{MailBackendKind, MailConfig};

#[derive(Debug)]
pub enum MailError {
    Address(String),
    Build(String),
    Transport(String),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::Address(e) => write!(f, "invalid address: {e}"),
            MailError::Build(e) => write!(f, "could not build message: {e}"),
            MailError::Transport(e) => write!(f, "delivery failed: {e}"),
        }
    }
}

impl std::error::Error for MailError {}

impl From<lettre::address::AddressError> for MailError {
    fn from(e: lettre::address::AddressError) -> Self {
        MailError::Address(e.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(e: lettre::error::Error) -> Self {
        MailError::Build(e.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        MailError::Transport(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBody {
    Text(String),
    Html(String),
    Alternative { text: String, html: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    /// Sender mailbox, e.g. `"Contact us" <a@b.c>`. Backend default when absent.
    pub from: Option<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: MailBody,
    pub extra_headers: Vec<(String, String)>,
}

impl OutgoingMail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: MailBody) -> Self {
        Self {
            to: to.into(),
            from: None,
            reply_to: None,
            subject: subject.into(),
            body,
            extra_headers: Vec::new(),
        }
    }

    /// Apply a rendered `Name: value` header block. From and Reply-To become
    /// the message's sender fields, MIME-Version and Content-Type are implied by
    /// the body, anything else is carried as an extra header.
    pub fn with_header_block(mut self, block: &str) -> Self {
        for line in block.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            match name.to_ascii_lowercase().as_str() {
                "from" => self.from = Some(value.to_string()),
                "reply-to" => self.reply_to = Some(value.to_string()),
                "mime-version" | "content-type" => {}
                _ => self.extra_headers.push((name.to_string(), value.to_string())),
            }
        }
        self
    }
}

#[allow(async_fn_in_trait)]
pub trait Mailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    default_from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let builder = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };
        let mut builder = builder.port(config.smtp_port);
        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(Self {
            transport: builder.build(),
            default_from: config.from.parse()?,
        })
    }

    fn build_message(&self, mail: OutgoingMail) -> Result<Message, MailError> {
        let from = match &mail.from {
            Some(f) => f.parse::<Mailbox>()?,
            None => self.default_from.clone(),
        };
        let mut builder = Message::builder()
            .from(from)
            .to(mail.to.parse::<Mailbox>()?)
            .subject(mail.subject);
        if let Some(reply_to) = &mail.reply_to {
            builder = builder.reply_to(reply_to.parse::<Mailbox>()?);
        }
        for (name, value) in mail.extra_headers {
            let header = HeaderName::new_from_ascii(name.clone())
                .map_err(|e| MailError::Build(format!("header '{name}': {e:?}")))?;
            builder = builder.raw_header(HeaderValue::new(header, value));
        }
        let message = match mail.body {
            MailBody::Text(text) => builder.header(ContentType::TEXT_PLAIN).body(text)?,
            MailBody::Html(html) => builder.header(ContentType::TEXT_HTML).body(html)?,
            MailBody::Alternative { text, html } => {
                builder.multipart(MultiPart::alternative_plain_html(text, html))?
            }
        };
        Ok(message)
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(mail)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConsoleMailer;

impl Mailer for ConsoleMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        log::info!(
            "Mail to {} from {} subject {:?}",
            mail.to,
            mail.from.as_deref().unwrap_or("(default)"),
            mail.subject
        );
        log::debug!("Mail body: {:?}", mail.body);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Mailer for MemoryMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent
            .lock()
            .map_err(|_| MailError::Transport("mail store poisoned".to_string()))?
            .push(mail);
        Ok(())
    }
}

/// The backend the server runs with.
pub enum MailBackend {
    Smtp(SmtpMailer),
    Console(ConsoleMailer),
}

impl Mailer for MailBackend {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        match self {
            MailBackend::Smtp(m) => m.send(mail).await,
            MailBackend::Console(m) => m.send(mail).await,
        }
    }
}

pub fn backend_from_config(config: &MailConfig) -> Result<MailBackend, MailError> {
    match config.backend {
        MailBackendKind::Smtp => Ok(MailBackend::Smtp(SmtpMailer::new(config)?)),
        MailBackendKind::Console => Ok(MailBackend::Console(ConsoleMailer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_block_fills_sender_fields() {
        let mail = OutgoingMail::new("to@example.com", "Hi", MailBody::Text("x".into())).with_header_block(
            "From: \"Contact\" <a@example.com>\r\nReply-To: a@example.com\r\nMIME-Version: 1.0\r\n\
             Content-Type: text/html; charset=ISO-8859-1\r\nX-Site: pages\r\n",
        );
        assert_eq!(mail.from.as_deref(), Some("\"Contact\" <a@example.com>"));
        assert_eq!(mail.reply_to.as_deref(), Some("a@example.com"));
        assert_eq!(mail.extra_headers, vec![("X-Site".to_string(), "pages".to_string())]);
    }
}
