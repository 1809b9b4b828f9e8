use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use mongodb::bson::Document;
use mongodb::Client;

use secrecy::ExposeSecret;

use leadbox::app;
use leadbox::client::EmailClient;
use leadbox::notify::EmailLeadNotifier;
use leadbox::repo::MongoLeadStore;
use leadbox::settings::Settings;
use leadbox::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber("info".into(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().expect("Failed to load settings");

    let store = {
        let client = Client::with_uri_str(settings.database.uri().expose_secret())
            .await
            .context("Failed to connect to the document store")?;
        let collection = client
            .database(settings.database.name())
            .collection::<Document>(settings.database.collection());

        Arc::new(MongoLeadStore::new(collection))
    };

    let notifier = {
        let email_client = EmailClient::new(
            settings.smtp.host(),
            settings.smtp.port(),
            settings.smtp.username(),
            settings.smtp.password(),
            settings.smtp.timeout(),
        )?;

        Arc::new(EmailLeadNotifier::new(
            email_client,
            settings.smtp.notification_email(),
        ))
    };

    let listener = TcpListener::bind(settings.app.addr())?;

    app::run(listener, store, notifier)?
        .await
        .context("Failed to run app")
}
