use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use reqwest::{Client, Method, Response};

use serde::Serialize;

use leadbox::app;
use leadbox::notify::LeadNotifier;
use leadbox::repo::{Lead, LeadStore, StoredLead};

/// Lead payload with every field optional, for exercising schema violations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "useWhatsApp")]
    pub use_whatsapp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agree_terms: Option<bool>,
}

impl LeadPayload {
    pub fn valid() -> Self {
        Self {
            course: Some("mba".into()),
            full_name: Some("Jane Doe".into()),
            email: Some("jane@x.com".into()),
            country_code: Some("+44".into()),
            phone: Some("7700900000".into()),
            use_whatsapp: Some(true),
            agree_terms: Some(true),
        }
    }
}

/// In-memory lead store, so the API can be exercised without a live
/// document store
#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: Mutex<Vec<(String, Lead)>>,
    next_id: AtomicUsize,
}

impl InMemoryLeadStore {
    /// Snapshot of the persisted records, insertion order
    pub fn records(&self) -> Vec<Lead> {
        self.leads
            .lock()
            .unwrap()
            .iter()
            .map(|(_, lead)| lead.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn insert(&self, lead: &Lead) -> anyhow::Result<String> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("{:024x}", n);

        self.leads.lock().unwrap().push((id.clone(), lead.clone()));

        Ok(id)
    }

    async fn list(&self, skip: u64, limit: i64) -> anyhow::Result<Vec<StoredLead>> {
        let mut rows = self.leads.lock().unwrap().clone();
        rows.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));

        Ok(rows
            .into_iter()
            .skip(skip as usize)
            .take(limit.max(0) as usize)
            .map(|(id, lead)| StoredLead {
                id,
                full_name: lead.full_name,
                email: lead.email.to_string(),
                phone: lead.phone,
                country_code: lead.country_code,
                course: lead.course,
                use_whatsapp: lead.use_whatsapp,
                timestamp: lead.timestamp,
                source: lead.source,
            })
            .collect())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.leads.lock().unwrap().len() as u64)
    }
}

/// Lead store with the backing service down; every operation fails
pub struct UnavailableLeadStore;

#[async_trait]
impl LeadStore for UnavailableLeadStore {
    async fn insert(&self, _lead: &Lead) -> anyhow::Result<String> {
        anyhow::bail!("store unavailable")
    }

    async fn list(&self, _skip: u64, _limit: i64) -> anyhow::Result<Vec<StoredLead>> {
        anyhow::bail!("store unavailable")
    }

    async fn count(&self) -> anyhow::Result<u64> {
        anyhow::bail!("store unavailable")
    }
}

/// Notifier that records what it was asked to send and reports a fixed
/// delivery outcome
pub struct FakeNotifier {
    outcome: bool,
    notified: Mutex<Vec<String>>,
}

impl FakeNotifier {
    pub fn succeeding() -> Self {
        Self {
            outcome: true,
            notified: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            outcome: false,
            notified: Mutex::new(Vec::new()),
        }
    }

    /// Emails of the leads this notifier was invoked for
    pub fn notified_emails(&self) -> Vec<String> {
        self.notified.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadNotifier for FakeNotifier {
    async fn notify(&self, lead: &Lead) -> bool {
        self.notified.lock().unwrap().push(lead.email.to_string());
        self.outcome
    }
}

pub struct TestApp {
    addr: String,

    pub client: Client,
}

impl TestApp {
    pub async fn spawn(store: Arc<dyn LeadStore>, notifier: Arc<dyn LeadNotifier>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let server = app::run(listener, store, notifier).expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self { addr, client }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn lead_create(&self, payload: &LeadPayload) -> reqwest::Result<Response> {
        self.request(Method::POST, "leads")
            .json(payload)
            .send()
            .await
    }

    pub async fn lead_create_raw(&self, body: &serde_json::Value) -> reqwest::Result<Response> {
        self.request(Method::POST, "leads").json(body).send().await
    }

    pub async fn lead_list(&self, query: &[(&str, String)]) -> reqwest::Result<Response> {
        self.request(Method::GET, "leads")
            .query(query)
            .send()
            .await
    }
}
