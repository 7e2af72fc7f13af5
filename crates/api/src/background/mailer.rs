//! SMTP email delivery.
//!
//! Delivery runs on a spawned task so the originating request is never
//! blocked or failed by the mail server. When SMTP is not configured the
//! mailer degrades to logging the message it would have sent, which keeps
//! local development and tests free of SMTP requirements.

use std::env;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Errors raised while building or sending an email.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// SMTP connection settings, read from the environment.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub from: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl EmailConfig {
    /// Load SMTP settings from the environment. Returns `None` when
    /// `SMTP_HOST` is unset, meaning email delivery is disabled.
    pub fn from_env() -> Option<Self> {
        let host = env::var("SMTP_HOST").ok()?;
        Some(EmailConfig {
            host,
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@plinth.local".to_string()),
            username: env::var("SMTP_USER").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// A message queued for delivery.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutboundEmail {
    /// The welcome message sent after a user account is created.
    pub fn welcome(to: impl Into<String>, display_name: &str) -> Self {
        OutboundEmail {
            to: to.into(),
            subject: "Welcome aboard".to_string(),
            body: format!(
                "Hi {display_name},\n\nYour account has been created. \
                 You can now sign in with your email address.\n"
            ),
        }
    }
}

/// Asynchronous mail dispatcher backed by an SMTP relay.
pub struct Mailer {
    config: Option<EmailConfig>,
}

impl Mailer {
    pub fn new(config: Option<EmailConfig>) -> Self {
        if config.is_none() {
            tracing::info!("SMTP_HOST not set, email delivery disabled");
        }
        Mailer { config }
    }

    /// Queue an email for delivery without waiting for the result.
    ///
    /// Failures are logged and never propagated to the caller.
    pub fn dispatch(&self, email: OutboundEmail) {
        let Some(config) = self.config.clone() else {
            tracing::debug!(to = %email.to, subject = %email.subject, "Email delivery disabled, dropping message");
            return;
        };

        tokio::spawn(async move {
            let recipient = email.to.clone();
            if let Err(err) = send(&config, email).await {
                tracing::warn!(to = %recipient, error = %err, "Failed to send email");
            } else {
                tracing::info!(to = %recipient, "Email sent");
            }
        });
    }
}

async fn send(config: &EmailConfig, email: OutboundEmail) -> Result<(), EmailError> {
    let message = Message::builder()
        .from(config.from.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(email.body)?;

    let mut builder =
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);

    if let (Some(user), Some(pass)) = (&config.username, &config.password) {
        builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }

    let transport = builder.build();
    transport.send(message).await?;
    Ok(())
}
