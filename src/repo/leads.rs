use anyhow::Context;

use async_trait::async_trait;

use chrono::{DateTime, Utc};

use futures_util::TryStreamExt;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use mongodb::options::FindOptions;
use mongodb::Collection;

use serde::{Deserialize, Serialize};

use crate::domain::EmailAddress;

/// Marker stamped on every record captured by this service
pub const LEAD_SOURCE: &str = "landing_page";

/// New lead request, validated
#[derive(Debug)]
pub struct NewLead {
    pub course: String,
    pub full_name: String,
    pub email: EmailAddress,
    pub country_code: String,
    pub phone: String,
    pub use_whatsapp: bool,
    pub agree_terms: bool,
}

/// Canonical lead record as persisted. Created exactly once per accepted
/// submission, never updated or deleted afterwards.
#[derive(Debug, Clone)]
pub struct Lead {
    pub course: String,
    pub full_name: String,
    pub email: EmailAddress,
    pub country_code: String,
    pub phone: String,
    pub use_whatsapp: bool,
    pub agree_terms: bool,
    /// Stamped at construction; client input never reaches this field
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl Lead {
    pub fn new(new_lead: NewLead) -> Self {
        Self {
            course: new_lead.course,
            full_name: new_lead.full_name,
            email: new_lead.email,
            country_code: new_lead.country_code,
            phone: new_lead.phone,
            use_whatsapp: new_lead.use_whatsapp,
            agree_terms: new_lead.agree_terms,
            timestamp: Utc::now(),
            source: LEAD_SOURCE.into(),
        }
    }
}

/// Stored lead as returned by the listing query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLead {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub course: String,
    #[serde(rename = "useWhatsApp")]
    pub use_whatsapp: bool,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

/// Lead storage trait, must be implemented for each store used.
/// NOTE: Intended to facilitate easier testing/mocking
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert a new lead record, returning the store-assigned identifier
    async fn insert(&self, lead: &Lead) -> anyhow::Result<String>;

    /// Fetch stored leads, newest first, paginated by skip/limit
    async fn list(&self, skip: u64, limit: i64) -> anyhow::Result<Vec<StoredLead>>;

    /// Total number of stored leads
    async fn count(&self) -> anyhow::Result<u64>;
}

/// MongoDB-backed lead store
#[derive(Clone)]
pub struct MongoLeadStore {
    collection: Collection<Document>,
}

impl MongoLeadStore {
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl LeadStore for MongoLeadStore {
    #[tracing::instrument(name = "Insert lead", skip(self, lead))]
    async fn insert(&self, lead: &Lead) -> anyhow::Result<String> {
        let document = doc! {
            "course": &lead.course,
            "fullName": &lead.full_name,
            "email": lead.email.as_ref(),
            "countryCode": &lead.country_code,
            "phone": &lead.phone,
            "useWhatsApp": lead.use_whatsapp,
            "agreeTerms": lead.agree_terms,
            "timestamp": BsonDateTime::from_chrono(lead.timestamp),
            "source": &lead.source,
        };

        let result = self
            .collection
            .insert_one(document, None)
            .await
            .context("Failed to insert lead record")?;

        let id = result
            .inserted_id
            .as_object_id()
            .context("Store did not assign an object id")?;

        Ok(id.to_hex())
    }

    #[tracing::instrument(name = "List leads", skip(self))]
    async fn list(&self, skip: u64, limit: i64) -> anyhow::Result<Vec<StoredLead>> {
        let options = FindOptions::builder()
            // Only fetch the projected fields
            .projection(doc! {
                "_id": 1,
                "fullName": 1,
                "email": 1,
                "phone": 1,
                "countryCode": 1,
                "course": 1,
                "useWhatsApp": 1,
                "timestamp": 1,
                "source": 1,
            })
            .sort(doc! { "timestamp": -1 })
            .skip(skip)
            .limit(limit)
            .build();

        let mut cursor = self
            .collection
            .clone_with_type::<LeadRow>()
            .find(doc! {}, options)
            .await
            .context("Failed to query lead records")?;

        let mut leads = Vec::new();
        while let Some(row) = cursor
            .try_next()
            .await
            .context("Failed to read lead record")?
        {
            leads.push(row.into());
        }

        Ok(leads)
    }

    #[tracing::instrument(name = "Count leads", skip(self))]
    async fn count(&self) -> anyhow::Result<u64> {
        self.collection
            .count_documents(doc! {}, None)
            .await
            .context("Failed to count lead records")
    }
}

/// Store-facing row shape for the listing projection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeadRow {
    #[serde(rename = "_id")]
    id: ObjectId,
    full_name: String,
    email: String,
    phone: String,
    country_code: String,
    course: String,
    #[serde(rename = "useWhatsApp")]
    use_whatsapp: bool,
    timestamp: BsonDateTime,
    source: String,
}

impl From<LeadRow> for StoredLead {
    fn from(row: LeadRow) -> Self {
        Self {
            id: row.id.to_hex(),
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            country_code: row.country_code,
            course: row.course,
            use_whatsapp: row.use_whatsapp,
            timestamp: row.timestamp.to_chrono(),
            source: row.source,
        }
    }
}
