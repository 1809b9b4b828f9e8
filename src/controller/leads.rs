use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse, Responder, ResponseError};

use serde::{Deserialize, Serialize};

use thiserror::Error;

use crate::notify::LeadNotifier;
use crate::repo::{Lead, LeadStore, NewLead, StoredLead};

/// Fixed confirmation shown to the submitter
const CONFIRMATION_MESSAGE: &str = "Thank you! We'll contact you within 24 hours.";

/// Form deserialization wrapper for parsing new leads
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadForm {
    course: String,
    full_name: String,
    email: String,
    country_code: String,
    phone: String,
    // Irregular casing on the wire, so spelled out
    #[serde(default, rename = "useWhatsApp")]
    use_whatsapp: bool,
    agree_terms: bool,
}

impl TryInto<NewLead> for LeadForm {
    type Error = String;

    fn try_into(self) -> Result<NewLead, Self::Error> {
        if !self.agree_terms {
            return Err("You must agree to the terms and conditions".into());
        }
        let email = self.email.parse()?;

        Ok(NewLead {
            course: self.course,
            full_name: self.full_name,
            email,
            country_code: self.country_code,
            phone: self.phone,
            use_whatsapp: self.use_whatsapp,
            agree_terms: self.agree_terms,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LeadCreated {
    success: bool,
    message: &'static str,
    lead_id: String,
}

#[derive(Debug, Serialize)]
struct LeadList {
    success: bool,
    count: u64,
    leads: Vec<StoredLead>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Create endpoint for new leads
#[tracing::instrument(name = "Create a new lead", skip(store, notifier, form))]
#[post("")]
async fn create(
    store: web::Data<dyn LeadStore>,
    notifier: web::Data<dyn LeadNotifier>,
    form: web::Json<LeadForm>,
) -> Result<impl Responder, LeadError> {
    // Parse the new lead form
    let new_lead: NewLead = form.into_inner().try_into().map_err(LeadError::ParseError)?;

    // Canonical record: timestamp and source are stamped server-side
    let lead = Lead::new(new_lead);

    // Persist first; the record must be durable before anything else happens
    let lead_id = store.insert(&lead).await?;

    tracing::info!("New lead created: {} - ID: {}", lead.email, lead_id);

    // Advisory from here on: the record is already durable, so a failed
    // notification is logged and swallowed, never surfaced to the caller
    if !notifier.notify(&lead).await {
        tracing::warn!("Lead notification failed for lead: {}", lead_id);
    }

    Ok(HttpResponse::Created().json(LeadCreated {
        success: true,
        message: CONFIRMATION_MESSAGE,
        lead_id,
    }))
}

/// Listing endpoint, newest first
#[tracing::instrument(name = "List leads", skip(store))]
#[get("")]
async fn list(
    store: web::Data<dyn LeadStore>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, LeadError> {
    let leads = store
        .list(query.skip, query.limit)
        .await
        .map_err(LeadError::list)?;
    let count = store.count().await.map_err(LeadError::list)?;

    Ok(HttpResponse::Ok().json(LeadList {
        success: true,
        count,
        leads,
    }))
}

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("{0}")]
    ParseError(String),

    #[error("An error occurred while processing your request. Please try again.")]
    StorageError(anyhow::Error),

    #[error("Failed to fetch leads")]
    ListError(anyhow::Error),
}

impl LeadError {
    fn list(e: anyhow::Error) -> Self {
        tracing::error!("Failed to fetch leads: {:#}", e);
        Self::ListError(e)
    }
}

impl From<anyhow::Error> for LeadError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!("Failed to persist lead: {:#}", e);
        Self::StorageError(e)
    }
}

impl ResponseError for LeadError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_) => StatusCode::BAD_REQUEST,
            Self::StorageError(_) | Self::ListError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Leads API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/leads").service(create).service(list)
}
