//! Password-reset OTP delivery over SMTP.
//!
//! The [`Mailer`] is optional: when `SMTP_HOST` is absent from the
//! environment, [`SmtpConfig::from_env`] yields `None`, no transport is
//! built, and the reset flow logs a warning instead of sending.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failure conditions of mail delivery.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Transport-level SMTP failure (connection, TLS, authentication).
    #[error("SMTP transport failure: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// A sender or recipient address did not parse.
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message itself could not be assembled.
    #[error("could not assemble message: {0}")]
    Message(#[from] lettre::error::Error),
}

// ---------------------------------------------------------------------------
// SmtpConfig
// ---------------------------------------------------------------------------

/// Sender address used when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@taskdeck.local";

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname.
    pub host: String,
    /// Relay port, STARTTLS.
    pub port: u16,
    /// RFC 5322 "From" address on outgoing mail.
    pub from_address: String,
    /// Credentials, used only when both are present.
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Read SMTP settings from environment variables.
    ///
    /// Yields `None` when `SMTP_HOST` is unset, which disables delivery.
    ///
    /// | Env Var         | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | **yes**  | --                       |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@taskdeck.local` |
    /// | `SMTP_USER`     | no       | --                       |
    /// | `SMTP_PASSWORD` | no       | --                       |
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        let port: u16 = crate::config::env_or("SMTP_PORT", "587")
            .parse()
            .expect("SMTP_PORT must be a valid u16");

        Some(Self {
            host,
            port,
            from_address: crate::config::env_or("SMTP_FROM", DEFAULT_FROM_ADDRESS),
            username: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends the password-reset OTP email.
///
/// The transport is built once at startup and reused across sends; lettre
/// pools its SMTP connections internally.
#[derive(Debug)]
pub struct Mailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    /// Build the STARTTLS transport for `config`, attaching credentials when
    /// both username and password are configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from: config.from_address.parse()?,
            transport: builder.build(),
        })
    }

    /// Send the reset code to `to_email`. The OTP appears only in the mail
    /// body, never in logs.
    pub async fn send_password_reset_otp(
        &self,
        to_email: &str,
        otp: &str,
    ) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to_email.parse()?)
            .subject("Reset Password Otp")
            .header(ContentType::TEXT_HTML)
            .body(format!("<h1>Reset password</h1>\n<p>Otp code: {otp}</p>"))?;

        self.transport.send(message).await?;

        tracing::info!(to = to_email, "Password reset email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
