//! # Dispatch Module
//!
//! The send action that consumes the recipient table: filters and validates
//! recipients, personalizes the message and hands each mail to an opaque
//! [`Transport`]. Progress is reported to a [`LogSink`].
pub mod log;

pub use log::LogEntry;
pub use log::LogFeed;
pub use log::LogKind;
pub use log::LogSink;

use crate::recipients::RecipientRecord;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9_\.-]+)@([\da-z\.-]+)\.([a-z\.]{2,6})$").expect("Hardcode regex pattern")
});

/// Reasons a send run stops before or while sending.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Invalid input: {0} is empty")]
    MissingField(&'static str),

    #[error("{0} recipient(s) are invalid")]
    InvalidRecipients(usize),

    #[error("Sending mail to {address} failed at entry number: {position}: {message}")]
    TransportFailed {
        /// 1-based position among usable recipients
        position: usize,
        address: String,
        message: String,
    },
}

/// What to send, and who sends it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Campaign {
    pub sender: String,
    pub password: String,
    pub subject: String,
    /// Plain text; line breaks become `<br>`
    pub body: String,
}

impl Campaign {
    fn missing_field(&self) -> Option<&'static str> {
        [
            ("sender", &self.sender),
            ("password", &self.password),
            ("subject", &self.subject),
            ("body", &self.body),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// A single personalized mail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Delivers one mail. Implementations own connection and credentials handling.
pub trait Transport {
    fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing to send; reported as a warning
    NoRecipients,
    /// Every usable recipient was sent a mail
    Sent(usize),
}

pub struct SendAction<'a> {
    sink: &'a dyn LogSink,
}

impl<'a> SendAction<'a> {
    pub fn new(sink: &'a dyn LogSink) -> Self {
        Self { sink }
    }

    /// Records with a non-blank email address, in table order.
    pub fn usable_recipients(records: &[RecipientRecord]) -> Vec<&RecipientRecord> {
        records
            .iter()
            .filter(|record| !record.email_address.trim().is_empty())
            .collect()
    }

    /// Sends `campaign` to every usable recipient, one after another.
    ///
    /// Nothing is sent unless every usable recipient is valid. The first
    /// transport failure ends the run.
    pub fn send(
        &self,
        campaign: &Campaign,
        records: &[RecipientRecord],
        transport: &dyn Transport,
    ) -> Result<DispatchOutcome, DispatchError> {
        if let Some(field) = campaign.missing_field() {
            self.sink.error("Invalid input: One of the required fields is empty");
            return Err(DispatchError::MissingField(field));
        }

        let recipients = Self::usable_recipients(records);
        if recipients.is_empty() {
            self.sink.warning("No recipients with an email address to send to");
            return Ok(DispatchOutcome::NoRecipients);
        }

        self.sink.info("Checking if recipients are valid");
        let mut invalid = 0usize;
        for (index, recipient) in recipients.iter().enumerate() {
            if let Some(problem) = validate(recipient) {
                self.sink.error(&format!("Entry at index: {} is invalid: {}", index + 1, problem));
                invalid += 1;
            }
        }
        if invalid > 0 {
            return Err(DispatchError::InvalidRecipients(invalid));
        }
        self.sink.info("Check was successful");

        let body = campaign.body.replace('\n', "<br>");
        for (index, recipient) in recipients.iter().enumerate() {
            let address = recipient.email_address.trim();
            let mail = OutgoingMail {
                from: campaign.sender.clone(),
                to: address.to_owned(),
                subject: campaign.subject.clone(),
                html_body: format!("Dear {},<br><br>{}", recipient.display_name(), body),
            };
            if let Err(error) = transport.send(&mail) {
                if index > 0 {
                    self.sink.error(&format!("Email sent to {} recipient(s)", index));
                }
                self.sink.error(&format!(
                    "Sending mail to {} failed at entry number: {}. The whole process has been terminated",
                    address,
                    index + 1
                ));
                return Err(DispatchError::TransportFailed {
                    position: index + 1,
                    address: address.to_owned(),
                    message: format!("{error:#}"),
                });
            }
            self.sink.info(&format!("Email sent to {} successfully", address));
        }

        Ok(DispatchOutcome::Sent(recipients.len()))
    }
}

/// Describes why a recipient cannot be mailed, `None` when it can.
fn validate(recipient: &RecipientRecord) -> Option<String> {
    if recipient.display_name().is_empty() {
        return Some(format!("No names for {}", recipient.email_address.trim()));
    }
    let address = recipient.email_address.trim();
    if !EMAIL_ADDRESS.is_match(address) {
        return Some(format!("Email is invalid {}", address));
    }
    None
}
