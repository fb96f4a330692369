// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report delivery to a Slack channel's inbound-email address

use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SmtpSettings;
use crate::report::Report;

/// Delivery errors
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A sender or recipient address could not be parsed
    #[error("invalid email address {address:?}: {source}")]
    Address {
        /// The offending address
        address: String,
        /// Parser error
        #[source]
        source: lettre::address::AddressError,
    },

    /// The message could not be assembled
    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connection, TLS, authentication or relay rejection
    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A composed email, ready for a [`Notifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Subject line for the report of `date`
#[must_use]
pub fn subject_for(date: NaiveDate) -> String {
    format!("Daily Work Summary - {}", date.format("%d/%m/%Y"))
}

/// Compose the summary email for `report`
#[must_use]
pub fn compose(from: &str, to: &str, report: &Report) -> Email {
    let body = format!(
        "Daily Work Summary for {date}\n\nCommits Made: {count}\n\n{rendered}\n---\n\
         Generated automatically by daily-standup\n",
        date = report.date().format("%d/%m/%Y"),
        count = report.commit_count(),
        rendered = report.render(),
    );

    Email {
        from: from.to_string(),
        to: to.to_string(),
        subject: subject_for(report.date()),
        body,
    }
}

fn mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse::<Mailbox>().map_err(|source| DeliveryError::Address {
        address: address.to_string(),
        source,
    })
}

/// Build the MIME message for `email`
///
/// # Errors
///
/// Returns `DeliveryError::Address` for unparseable addresses and
/// `DeliveryError::Message` if the message cannot be assembled.
pub fn build_message(email: &Email) -> Result<Message, DeliveryError> {
    Ok(Message::builder()
        .from(mailbox(&email.from)?)
        .to(mailbox(&email.to)?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())?)
}

/// Anything that can deliver a composed email
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `email`
    async fn deliver(&self, email: &Email) -> Result<(), DeliveryError>;
}

/// Sends email through an authenticated STARTTLS relay
///
/// The transport is set up on delivery, so relay problems of any kind
/// surface as a failed notify stage rather than before the run starts.
pub struct SmtpNotifier {
    settings: SmtpSettings,
    credentials: Credentials,
}

impl SmtpNotifier {
    /// Create a notifier for the relay in `settings`, logging in as `username`
    #[must_use]
    pub fn new(settings: &SmtpSettings, username: &str, password: &SecretString) -> Self {
        Self {
            settings: settings.clone(),
            credentials: Credentials::new(
                username.to_string(),
                password.expose_secret().to_string(),
            ),
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)?
                .port(self.settings.port)
                .credentials(self.credentials.clone())
                .timeout(Some(self.settings.timeout))
                .build(),
        )
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn deliver(&self, email: &Email) -> Result<(), DeliveryError> {
        let message = build_message(email)?;
        let transport = self.transport()?;
        debug!(
            to = %email.to,
            subject = %email.subject,
            relay = %self.settings.host,
            port = self.settings.port,
            "sending email"
        );
        transport.send(message).await?;
        info!(to = %email.to, "summary email sent");
        Ok(())
    }
}

/// Logs the email instead of sending it
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn deliver(&self, email: &Email) -> Result<(), DeliveryError> {
        // Address errors still surface in a dry run
        build_message(email)?;
        info!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            "dry run, email not sent"
        );
        debug!(body = %email.body, "dry run email body");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use standup_git::CommitRecord;
    use std::time::Duration;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn report() -> Report {
        Report::new(
            day(),
            vec![CommitRecord {
                hash: "aaaa1111".to_string(),
                author: "Dev".to_string(),
                date: day(),
                message: "fix bug".to_string(),
            }],
            "Fixed a bug.".to_string(),
        )
    }

    #[test]
    fn test_subject_for() {
        assert_eq!(subject_for(day()), "Daily Work Summary - 14/10/2026");
    }

    #[test]
    fn test_compose_includes_report() {
        let report = report();
        let email = compose("me@example.com", "team@example.slack.com", &report);
        assert_eq!(email.subject, "Daily Work Summary - 14/10/2026");
        assert!(email.body.starts_with("Daily Work Summary for 14/10/2026"));
        assert!(email.body.contains("Commits Made: 1"));
        assert!(email.body.contains(&report.render()));
        assert!(email.body.ends_with("Generated automatically by daily-standup\n"));
    }

    #[test]
    fn test_build_message_headers() {
        let email = compose("me@example.com", "team@example.slack.com", &report());
        let message = build_message(&email).expect("valid message");
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("Subject: Daily Work Summary - 14/10/2026"));
        assert!(raw.contains("To: team@example.slack.com"));
    }

    #[test]
    fn test_build_message_invalid_recipient() {
        let email = compose("me@example.com", "not an address", &report());
        match build_message(&email) {
            Err(DeliveryError::Address { address, .. }) => assert_eq!(address, "not an address"),
            other => panic!("expected Address error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dry_run_rejects_invalid_sender() {
        let email = compose("", "team@example.slack.com", &report());
        let result = DryRunNotifier.deliver(&email).await;
        assert!(matches!(result, Err(DeliveryError::Address { .. })));
    }

    #[tokio::test]
    async fn test_dry_run_accepts_valid_email() {
        let email = compose("me@example.com", "team@example.slack.com", &report());
        assert!(DryRunNotifier.deliver(&email).await.is_ok());
    }

    #[tokio::test]
    async fn test_smtp_unreachable_relay_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let settings = SmtpSettings {
            host: "127.0.0.1".to_string(),
            port,
            timeout: Duration::from_secs(2),
        };
        let notifier = SmtpNotifier::new(
            &settings,
            "me@example.com",
            &SecretString::from("secret".to_string()),
        );

        let email = compose("me@example.com", "team@example.slack.com", &report());
        let result = notifier.deliver(&email).await;
        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }
}
