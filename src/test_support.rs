//! In-process fake API server for HTTP-level tests.
//!
//! Binds an axum router to `127.0.0.1:0`, answers each `(method, path)` with a
//! canned response, and records what the client sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::config::ClientConfig;

#[derive(Clone, Debug)]
pub(crate) struct Canned {
    pub status: StatusCode,
    pub body: String,
    pub set_cookie: Option<String>,
}

impl Canned {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.to_string(),
            set_cookie: None,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self { status: StatusCode::from_u16(status).expect("valid status"), body: body.to_owned(), set_cookie: None }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookie = Some(cookie.to_owned());
        self
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub cookie: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct FakeState {
    routes: Arc<HashMap<(String, String), Canned>>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub(crate) struct FakeServer {
    pub base_url: String,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeServer {
    pub async fn start(routes: Vec<(&str, &str, Canned)>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(method, path, canned)| ((method.to_owned(), path.to_owned()), canned))
            .collect::<HashMap<_, _>>();
        let state = FakeState { routes: Arc::new(routes), recorded: Arc::default() };
        let recorded = state.recorded.clone();

        let app = Router::new().fallback(handle).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fake server");
        let addr = listener.local_addr().expect("fake server addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { base_url: format!("http://{addr}"), recorded }
    }

    /// Client config pointed at this server, with no post-register pause.
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::default().with_base_url(&self.base_url);
        config.register_redirect_delay = Duration::ZERO;
        config
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().expect("recorded lock").clone()
    }
}

async fn handle(State(state): State<FakeState>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let header_str = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(ToOwned::to_owned);
    let path = uri.path().to_owned();
    state.recorded.lock().expect("recorded lock").push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        authorization: header_str(header::AUTHORIZATION),
        cookie: header_str(header::COOKIE),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let Some(canned) = state.routes.get(&(method.to_string(), path)).cloned() else {
        return (StatusCode::NOT_FOUND, r#"{"message":"not found"}"#).into_response();
    };
    let mut response = (canned.status, canned.body).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
    if let Some(cookie) = canned.set_cookie {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, header::HeaderValue::from_str(&cookie).expect("cookie header"));
    }
    response
}

/// A base URL nothing is listening on.
pub(crate) async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind unused port");
    let addr = listener.local_addr().expect("unused port addr");
    drop(listener);
    format!("http://{addr}")
}
