//! Digest email assembly.
//!
//! Turns a user's repository changes into a subject, HTML body and text body
//! and hands them to the mail transport. Page templates and SMTP live behind
//! [`PageRenderer`] and [`MailSender`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::models::Provider;

pub const HTML_TEMPLATE: &str = "changes_mail";
pub const TEXT_TEMPLATE: &str = "changes_mail_text";

const SUBJECT_PREFIX: &str = "[GitNotify] New Updates from your Repositories - ";
const SUBJECT_DATE_FORMAT: &str = "%d %b %Y | %H Hrs";

/// Changes detected on one watched repository since the last digest.
#[derive(Debug, Clone, Serialize)]
pub struct RepoDiff {
    pub full_name: String,
    pub url: String,
    /// One line per change, already summarized
    pub changes: Vec<String>,
}

/// The account a digest is addressed to.
#[derive(Debug, Clone)]
pub struct DigestAccount {
    pub provider: Provider,
    pub user_name: String,
    /// Display name; may be empty
    pub name: String,
    pub email: String,
    /// IANA zone name such as "Asia/Kolkata"
    pub time_zone: String,
}

impl DigestAccount {
    fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.user_name
        } else {
            &self.name
        }
    }
}

/// Data handed to both mail templates.
#[derive(Debug, Clone, Serialize)]
pub struct MailContent {
    pub website_url: String,
    /// `<provider>/<username>`
    pub user: String,
    pub name: String,
    pub data: Vec<RepoDiff>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub address: String,
    pub user_name: String,
    pub provider: Provider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Renders a named page template.
pub trait PageRenderer: Send + Sync {
    fn render(&self, template: &str, content: &MailContent) -> Result<String>;
}

/// Delivers a finished message.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &Recipient, message: &EmailMessage) -> Result<()>;
}

pub struct DigestMailer {
    website_url: String,
    renderer: Box<dyn PageRenderer>,
    sender: Box<dyn MailSender>,
}

impl DigestMailer {
    /// `website_url` is the public site root, see [`crate::config::Config::website_url`].
    pub fn new(
        website_url: impl Into<String>,
        renderer: Box<dyn PageRenderer>,
        sender: Box<dyn MailSender>,
    ) -> Self {
        Self {
            website_url: website_url.into(),
            renderer,
            sender,
        }
    }

    /// Render and send the digest of `diffs` to `account`.
    pub async fn send_digest(&self, diffs: Vec<RepoDiff>, account: &DigestAccount) -> Result<()> {
        let (to, message) = self.compose(diffs, account, Utc::now())?;
        self.sender
            .send(&to, &message)
            .await
            .with_context(|| format!("Failed to send digest to {}/{}", to.provider, to.user_name))?;
        tracing::info!("Sent digest to {}/{}", to.provider, to.user_name);
        Ok(())
    }

    fn compose(
        &self,
        diffs: Vec<RepoDiff>,
        account: &DigestAccount,
        now: DateTime<Utc>,
    ) -> Result<(Recipient, EmailMessage)> {
        let content = MailContent {
            website_url: self.website_url.clone(),
            user: format!("{}/{}", account.provider, account.user_name),
            name: account.display_name().to_string(),
            data: diffs,
        };

        let html_body = self
            .renderer
            .render(HTML_TEMPLATE, &content)
            .with_context(|| format!("Failed to render {HTML_TEMPLATE}"))?;
        let text = self
            .renderer
            .render(TEXT_TEMPLATE, &content)
            .with_context(|| format!("Failed to render {TEXT_TEMPLATE}"))?;

        let to = Recipient {
            name: account.display_name().to_string(),
            address: account.email.clone(),
            user_name: account.user_name.clone(),
            provider: account.provider,
        };
        let message = EmailMessage {
            subject: subject_at(now, &account.time_zone),
            text_body: collapse_blank_lines(&text),
            html_body,
        };
        Ok((to, message))
    }
}

/// Subject line stamped with the hour in the recipient's time zone.
fn subject_at(now: DateTime<Utc>, time_zone: &str) -> String {
    let tz: Tz = time_zone.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown time zone {time_zone:?}, using UTC");
        Tz::UTC
    });
    format!(
        "{SUBJECT_PREFIX}{}",
        now.with_timezone(&tz).format(SUBJECT_DATE_FORMAT)
    )
}

/// Template output leaves runs of empty lines; two passes fold them away.
fn collapse_blank_lines(text: &str) -> String {
    text.replace("\n\n", "\n").replace("\n\n", "\n")
}
