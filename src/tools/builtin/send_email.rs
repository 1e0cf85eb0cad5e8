//! Plain-text email through an SMTP relay.

use crate::tools::traits::{BoundArgs, Tool, ToolSignature};
use crate::types::ToolParameter;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info};

const DEFAULT_SUMMARY: &str = "Send an email through the configured SMTP relay.";

/// SMTP reply codes meaning the relay rejected our credentials.
const AUTH_FAILURE_CODES: &[&str] = &["530", "534", "535"];

/// Relay and sender credentials.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// When false the session stays in plaintext.
    pub starttls: bool,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

enum EmailFault {
    NotConfigured,
    Authentication,
    Smtp(lettre::transport::smtp::Error),
    Other(String),
}

impl From<lettre::transport::smtp::Error> for EmailFault {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        let auth_failure = e
            .status()
            .map(|code| AUTH_FAILURE_CODES.contains(&code.to_string().as_str()))
            .unwrap_or(false);
        if auth_failure {
            Self::Authentication
        } else {
            Self::Smtp(e)
        }
    }
}

pub struct SendEmailTool {
    signature: ToolSignature,
    smtp: SmtpConfig,
}

impl SendEmailTool {
    pub fn new(summary: Option<&str>, smtp: SmtpConfig) -> Self {
        Self {
            signature: ToolSignature::new(
                "send_email",
                summary.unwrap_or(DEFAULT_SUMMARY),
                vec![
                    ToolParameter::required("to_email", "Recipient email address"),
                    ToolParameter::required("subject", "Email subject line"),
                    ToolParameter::required("message", "Email body content"),
                    ToolParameter::optional("cc_email", "Optional CC email address", ""),
                ],
            ),
            smtp,
        }
    }

    async fn send(&self, to: &str, subject: &str, body: &str, cc: &str) -> Result<(), EmailFault> {
        let (Some(username), Some(password)) = (&self.smtp.username, &self.smtp.password) else {
            return Err(EmailFault::NotConfigured);
        };

        let parse = |addr: &str| {
            addr.trim()
                .parse::<Mailbox>()
                .map_err(|e| EmailFault::Other(format!("invalid address '{}': {}", addr, e)))
        };

        let mut builder = Message::builder()
            .from(parse(username.as_str())?)
            .to(parse(to)?)
            .subject(subject);
        if !cc.trim().is_empty() {
            builder = builder.cc(parse(cc)?);
        }
        let email = builder
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailFault::Other(e.to_string()))?;

        let transport = if self.smtp.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.smtp.host)
        };
        let mailer = transport
            .port(self.smtp.port)
            .credentials(Credentials::new(
                username.clone(),
                password.expose_secret().to_string(),
            ))
            .build();

        mailer.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl Tool for SendEmailTool {
    fn signature(&self) -> &ToolSignature {
        &self.signature
    }

    async fn execute(&self, args: &BoundArgs) -> String {
        let to = args.get("to_email").unwrap_or_default();
        let subject = args.get("subject").unwrap_or_default();
        let message = args.get("message").unwrap_or_default();
        let cc = args.get("cc_email").unwrap_or_default();
        info!("Tool 'send_email' invoked for recipient '{}'", to);

        match self.send(to, subject, message, cc).await {
            Ok(()) => {
                info!("Email sent successfully to {}", to);
                format!("Email sent successfully to {}", to)
            }
            Err(EmailFault::NotConfigured) => {
                error!("SMTP credentials not found in environment variables");
                "Email sending failed: SMTP credentials not configured.".to_string()
            }
            Err(EmailFault::Authentication) => {
                error!("SMTP authentication failed");
                "Email sending failed: Authentication error. Please check your SMTP credentials."
                    .to_string()
            }
            Err(EmailFault::Smtp(e)) => {
                error!("SMTP error occurred: {}", e);
                format!("Email sending failed: SMTP error - {}", e)
            }
            Err(EmailFault::Other(e)) => {
                error!("Error sending email: {}", e);
                format!("An error occurred while sending email: {}", e)
            }
        }
    }
}
