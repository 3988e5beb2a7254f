//! Email delivery for contact form notifications

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::{MailConfig, MailSecurity};

/// A plain-text notification addressed to the site owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    /// Address replies should go to, if any
    pub reply_to: Option<String>,
}

/// Delivers notification mail to the site owner
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// SMTP delivery through lettre
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Build the SMTP transport. No connection is made until the first send.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from: Mailbox = config
            .username
            .parse()
            .map_err(|e| anyhow!("Invalid sender address '{}': {}", config.username, e))?;
        let to: Mailbox = config
            .recipient()
            .parse()
            .map_err(|e| anyhow!("Invalid recipient address '{}': {}", config.recipient(), e))?;

        let builder = match config.security {
            MailSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?,
            MailSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
            }
            MailSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };

        let mut builder = builder.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN);

        // Submitters type anything into the email field
        if let Some(reply_to) = mail.reply_to.as_deref() {
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(_) => tracing::debug!("Ignoring unparsable reply-to address: {}", reply_to),
            }
        }

        builder
            .body(mail.body.clone())
            .map_err(|e| anyhow!("Failed to build email: {}", e))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = self.build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;
        tracing::info!("Sent notification mail to {}", self.to);
        Ok(())
    }
}

/// Used when no SMTP account is configured; every send fails.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _mail: &OutgoingMail) -> Result<()> {
        Err(anyhow!("Mail delivery is not configured"))
    }
}
