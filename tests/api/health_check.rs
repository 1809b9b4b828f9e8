use std::sync::Arc;

use crate::helpers::{FakeNotifier, InMemoryLeadStore, TestApp};

#[tokio::test]
async fn is_present() {
    let app = TestApp::spawn(
        Arc::new(InMemoryLeadStore::default()),
        Arc::new(FakeNotifier::succeeding()),
    )
    .await;

    let res = app.health_check().await.expect("Failed to execute request");

    assert!(res.status().is_success());
}
