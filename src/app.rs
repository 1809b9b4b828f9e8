use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::controller::leads;
use crate::notify::LeadNotifier;
use crate::repo::LeadStore;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("I am alive")
}

/// Run the application on a specified TCP listener.
/// Collaborators are injected here and handed to the handlers as shared
/// application data; nothing reads from global state.
pub fn run(
    listener: TcpListener,
    store: Arc<dyn LeadStore>,
    notifier: Arc<dyn LeadNotifier>,
) -> anyhow::Result<Server> {
    // Wrap application data
    let store: web::Data<dyn LeadStore> = web::Data::from(store);
    let notifier: web::Data<dyn LeadNotifier> = web::Data::from(notifier);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .app_data(notifier.clone())
            .service(health_check)
            .service(leads::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
