use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use serde_json::Value;

/// A request the fake service received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
}

#[derive(Clone)]
struct FakeState {
    log: Arc<Mutex<Vec<Recorded>>>,
    post_reply: Arc<String>,
    records: Arc<Value>,
}

/// Score Service stand-in that logs every request and answers with canned bodies.
pub struct FakeScoreService {
    pub addr: SocketAddr,
    log: Arc<Mutex<Vec<Recorded>>>,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl FakeScoreService {
    /// `post_reply` is returned verbatim for POST; `records` for GET.
    pub async fn start(post_reply: &str, records: Value) -> Self {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            log: Arc::clone(&log),
            post_reply: Arc::new(post_reply.to_string()),
            records: Arc::new(records),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            log,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.log.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        body: serde_json::from_str(&body).ok(),
        content_type: header_str(header::CONTENT_TYPE),
        accept: header_str(header::ACCEPT),
    });

    let reply = if method == Method::POST {
        state.post_reply.as_str().to_string()
    } else if method == Method::GET {
        state.records.to_string()
    } else {
        "{}".to_string()
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        reply,
    )
}

/// An address with nothing listening on it.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
