//! Stub mirror backend for tests: an axum router answering every request
//! with a fixed status and forwarding what it received.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct ReceivedRow {
    pub method: Method,
    pub path: String,
    pub body: String,
}

#[derive(Clone)]
struct Backend {
    status: StatusCode,
    rows: mpsc::UnboundedSender<ReceivedRow>,
}

async fn record(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let _ = backend.rows.send(ReceivedRow {
        method,
        path: uri.path().to_string(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    (backend.status, "{}")
}

async fn stall() -> StatusCode {
    std::future::pending::<()>().await;
    StatusCode::OK
}

async fn bind(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    base
}

/// Answer every request with `status`; yields each request received.
pub async fn serve_status(status: StatusCode) -> (String, mpsc::UnboundedReceiver<ReceivedRow>) {
    let (rows, rx) = mpsc::unbounded_channel();
    let router = Router::new()
        .fallback(record)
        .with_state(Backend { status, rows });
    (bind(router).await, rx)
}

/// Accept requests and never answer.
pub async fn serve_silently() -> String {
    bind(Router::new().fallback(stall)).await
}
