use std::time::Duration;

use anyhow::Context;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use secrecy::Secret;

use crate::domain::EmailAddress;

/// A composed message, ready for handoff to the relay
#[derive(Debug, Clone)]
pub struct Email {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// SMTP client for outgoing application mail.
///
/// The transport is only built when credentials are configured; without
/// them every `send` fails fast instead of attempting an anonymous session.
pub struct EmailClient {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Option<String>,
}

impl EmailClient {
    pub fn new(
        host: &str,
        port: u16,
        username: Option<String>,
        password: Option<Secret<String>>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        use secrecy::ExposeSecret;

        let transport = match (&username, &password) {
            (Some(username), Some(password)) => {
                let password = normalize_password(password.expose_secret());
                let credentials = Credentials::new(username.clone(), password);

                // Plain session upgraded via STARTTLS before authenticating
                let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .context("Failed to configure the mail relay")?
                    .port(port)
                    .credentials(credentials)
                    .timeout(Some(timeout))
                    .build();

                Some(transport)
            }
            _ => None,
        };

        Ok(Self {
            transport,
            sender: username,
        })
    }

    /// Hand a composed message to the relay. One attempt, no retry.
    pub async fn send(&self, recipient: &EmailAddress, email: &Email) -> anyhow::Result<()> {
        let transport = self
            .transport
            .as_ref()
            .context("SMTP credentials not configured")?;
        let sender = self
            .sender
            .as_deref()
            .context("SMTP credentials not configured")?;

        let message = Message::builder()
            .from(
                sender
                    .parse::<Mailbox>()
                    .context("Invalid sender address")?,
            )
            .to(recipient
                .as_ref()
                .parse::<Mailbox>()
                .context("Invalid recipient address")?)
            .subject(email.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .context("Failed to build message")?;

        transport
            .send(message)
            .await
            .context("Mail relay rejected the message")?;

        Ok(())
    }
}

/// App-specific relay passwords are often pasted with embedded spaces
fn normalize_password(password: &str) -> String {
    password.replace(' ', "")
}
