mod compose;
mod email;

pub use email::EmailLeadNotifier;

use async_trait::async_trait;

use crate::repo::Lead;

/// Staff alert dispatch for captured leads.
///
/// Implementations absorb every failure behind this boundary: `false`
/// means the alert did not go out, nothing more. A submission must never
/// fail because its notification did.
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, lead: &Lead) -> bool;
}
