//! In-process stub backends for adapter tests.

use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type Captured = Arc<Mutex<Option<Value>>>;

/// Two handles to the same slot: one for the stub handler, one for the test.
pub fn captured() -> (Captured, Captured) {
    let slot = Arc::new(Mutex::new(None));
    (slot.clone(), slot)
}

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}
