// marketplace/src/services/mailer.rs

//! Outbound email. Delivery itself is an external concern; the server ships a
//! [`LogMailer`] that records and logs each message instead of talking to SMTP.

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
  pub to: String,
  pub from: String,
  pub subject: String,
  pub text_body: String,
}

#[derive(Debug, Clone)]
pub struct SentEmailInfo {
  pub message_id: String,
}

#[derive(Debug, Error)]
pub enum MailError {
  #[error("mail transport rejected message to {to}: {reason}")]
  Rejected { to: String, reason: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, email: OutgoingEmail) -> Result<SentEmailInfo, MailError>;
}

/// Logs every message and keeps a copy in memory.
#[derive(Default)]
pub struct LogMailer {
  fail_sends: bool,
  outbox: Mutex<Vec<OutgoingEmail>>,
}

impl LogMailer {
  pub fn new() -> Self {
    Self::default()
  }

  /// A mailer whose every send fails, for exercising delivery errors.
  pub fn failing() -> Self {
    Self {
      fail_sends: true,
      outbox: Mutex::new(Vec::new()),
    }
  }

  pub fn sent(&self) -> Vec<OutgoingEmail> {
    self.outbox.lock().clone()
  }
}

#[async_trait]
impl Mailer for LogMailer {
  #[instrument(name = "mailer::send", skip(self, email), fields(to = %email.to, subject = %email.subject))]
  async fn send(&self, email: OutgoingEmail) -> Result<SentEmailInfo, MailError> {
    if self.fail_sends {
      warn!("Mail transport configured to fail; dropping message.");
      return Err(MailError::Rejected {
        to: email.to,
        reason: "transport unavailable".to_string(),
      });
    }

    let message_id = format!("log_email_{}", uuid::Uuid::new_v4());
    let body_preview = email.text_body.chars().take(50).collect::<String>();
    info!(%message_id, from = %email.from, %body_preview, "Email accepted for delivery.");
    self.outbox.lock().push(email);
    Ok(SentEmailInfo { message_id })
  }
}
