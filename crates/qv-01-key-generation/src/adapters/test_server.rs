//! Stub QKD provider for adapter tests, served with axum.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub body: String,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    requests: mpsc::UnboundedSender<CapturedRequest>,
}

async fn answer(
    State(reply): State<Reply>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    let _ = reply.requests.send(CapturedRequest {
        method,
        path: uri.path().to_string(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
}

async fn hold_forever() -> StatusCode {
    std::future::pending::<()>().await;
    StatusCode::OK
}

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    base
}

/// Answer every request with `status` and the JSON `body`.
///
/// Returns the base URL and a receiver yielding each request.
pub async fn serve_json(
    status: StatusCode,
    body: impl Into<String>,
) -> (String, mpsc::UnboundedReceiver<CapturedRequest>) {
    let (requests, rx) = mpsc::unbounded_channel();
    let router = Router::new().fallback(answer).with_state(Reply {
        status,
        body: body.into(),
        requests,
    });
    (spawn(router).await, rx)
}

/// Accept requests and never answer.
pub async fn serve_silently() -> String {
    spawn(Router::new().fallback(hold_forever)).await
}

/// Base URL nothing listens on.
pub async fn unused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    base
}
