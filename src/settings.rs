use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use secrecy::Secret;

use serde::Deserialize;
use serde_aux::prelude::*;

use crate::domain::EmailAddress;

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub database: DatabaseSettings,
    pub smtp: SmtpSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        // Get the path to the settings directory
        let path = env::current_dir()?.join("settings");
        // Get the current environment based on the `APP_ENV` environment variable, default to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }

    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            // Include the base settings
            .add_source(File::from(base_path.join("base")).required(true))
            // Include the runtime settings
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // Override/include any settings from environment variables
            // NOTE: Should be used for any prod secrets. Takes the form `APP_<settings category>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            // The mail relay keeps its conventional variable names
            .set_override_option("smtp.host", env::var("SMTP_HOST").ok())?
            .set_override_option("smtp.port", env::var("SMTP_PORT").ok())?
            .set_override_option("smtp.username", env::var("SMTP_USER").ok())?
            .set_override_option("smtp.password", env::var("SMTP_PASSWORD").ok())?
            .set_override_option(
                "smtp.notification_email",
                env::var("NOTIFICATION_EMAIL").ok(),
            )?
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    uri: Secret<String>,
    name: String,
    collection: String,
}

impl DatabaseSettings {
    /// The document store connection string.
    /// NOTE: May embed credentials, hence the secret wrapper.
    pub fn uri(&self) -> &Secret<String> {
        &self.uri
    }
    /// The database name
    pub fn name(&self) -> &str {
        &self.name
    }
    /// The collection holding captured leads
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[derive(Debug, Deserialize)]
pub struct SmtpSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    username: Option<String>,
    password: Option<Secret<String>>,
    notification_email: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    timeout_seconds: u64,
}

impl SmtpSettings {
    /// The mail relay host
    pub fn host(&self) -> &str {
        &self.host
    }
    /// The mail relay submission port
    pub fn port(&self) -> u16 {
        self.port
    }
    /// The relay account name, which doubles as the sender address.
    /// `None` when credentials are not configured.
    pub fn username(&self) -> Option<String> {
        self.username.clone()
    }
    /// The relay account password, `None` when credentials are not configured
    pub fn password(&self) -> Option<Secret<String>> {
        self.password.clone()
    }
    /// The staff mailbox that receives lead alerts
    pub fn notification_email(&self) -> EmailAddress {
        self.notification_email
            .parse()
            .expect("Failed to parse notification email address")
    }
    /// Bound on relay connect/IO time, so a dead relay cannot hang a request
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
