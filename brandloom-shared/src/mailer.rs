/// Transactional email delivery over SMTP
///
/// Used by the voucher-send endpoint to mail discount codes to recipients.
/// The mailer is optional at startup: when SMTP is not configured the API
/// surfaces a generic internal error instead of attempting delivery.
///
/// # Example
///
/// ```no_run
/// use brandloom_shared::mailer::{Mailer, MailerConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = Mailer::new(MailerConfig {
///     host: "smtp.example.com".to_string(),
///     port: 587,
///     username: "postmaster".to_string(),
///     password: "secret".to_string(),
///     from: "Brandloom <no-reply@example.com>".to_string(),
/// })?;
///
/// mailer
///     .send("customer@example.com", "Your voucher", "Code: SPRING20".to_string())
///     .await?;
/// # Ok(())
/// # }
/// ```

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

/// Error type for email delivery
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// Sender or recipient address is not a valid mailbox
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    BuildError(String),

    /// SMTP delivery failed
    #[error("SMTP delivery failed: {0}")]
    TransportError(String),
}

/// SMTP configuration
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP relay host
    pub host: String,

    /// SMTP port (587 for STARTTLS)
    pub port: u16,

    /// SMTP username
    pub username: String,

    /// SMTP password
    pub password: String,

    /// Sender mailbox, e.g. "Brandloom <no-reply@brandloom.app>"
    pub from: String,
}

/// Async SMTP mailer
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Creates a mailer from SMTP configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the relay host or the sender mailbox is invalid
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| MailerError::InvalidAddress(format!("sender: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailerError::TransportError(format!("relay setup failed: {}", e)))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self { transport, from })
    }

    /// Sends a plain-text email
    ///
    /// # Arguments
    ///
    /// * `to` - Recipient address
    /// * `subject` - Message subject
    /// * `body` - Plain-text body
    ///
    /// # Errors
    ///
    /// Returns an error if the recipient address is invalid or SMTP
    /// delivery fails. Nothing is retried.
    pub async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), MailerError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| MailerError::InvalidAddress(format!("recipient: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailerError::BuildError(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::TransportError(e.to_string()))?;

        info!(subject = subject, "Sent transactional email");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailerConfig {
        MailerConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "postmaster".to_string(),
            password: "secret".to_string(),
            from: "Brandloom <no-reply@brandloom.app>".to_string(),
        }
    }

    #[test]
    fn test_mailer_builds_with_valid_config() {
        assert!(Mailer::new(config()).is_ok());
    }

    #[test]
    fn test_mailer_rejects_invalid_sender() {
        let mut bad = config();
        bad.from = "not an address".to_string();

        assert!(matches!(
            Mailer::new(bad),
            Err(MailerError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_send_rejects_invalid_recipient() {
        let mailer = Mailer::new(config()).unwrap();
        let result = mailer
            .send("definitely not an address", "subject", "body".to_string())
            .await;

        assert!(matches!(result, Err(MailerError::InvalidAddress(_))));
    }
}
