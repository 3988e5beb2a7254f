//! Contact form handling
//!
//! A submission is stored first and then mailed to the site owner. Mail
//! failures are reported to the caller but never undo the stored record.

use crate::db::repositories::ContactRepository;
use crate::models::{timestamp_now, ContactMessage, NewContactMessage};
use crate::services::email::{Mailer, OutgoingMail};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ContactServiceError {
    /// The message was stored but the notification could not be sent
    #[error("Message {sno} stored but mail delivery failed: {source}")]
    MailFailed {
        sno: i64,
        #[source]
        source: anyhow::Error,
    },

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
    mailer: Arc<dyn Mailer>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self { repo, mailer }
    }

    /// Store a submission and notify the site owner
    pub async fn submit(
        &self,
        input: NewContactMessage,
    ) -> Result<ContactMessage, ContactServiceError> {
        let stored = self
            .repo
            .create(&input.into_message(timestamp_now()))
            .await?;
        tracing::info!("Stored contact message {} from {}", stored.sno, stored.name);

        self.mailer
            .send(&notification(&stored))
            .await
            .map_err(|source| ContactServiceError::MailFailed {
                sno: stored.sno,
                source,
            })?;

        Ok(stored)
    }

    /// Stored messages, newest first
    pub async fn list(&self) -> Result<Vec<ContactMessage>, ContactServiceError> {
        let mut messages = self.repo.list().await?;
        messages.reverse();
        Ok(messages)
    }
}

/// The owner notification for one contact message
pub fn notification(message: &ContactMessage) -> OutgoingMail {
    OutgoingMail {
        subject: format!("New message from {}", message.name),
        body: format!("{}\n{}\n{}", message.phone_num, message.email, message.msg),
        reply_to: (!message.email.is_empty()).then(|| message.email.clone()),
    }
}
