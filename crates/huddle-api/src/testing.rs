//! Fakes and helpers shared by the unit tests in this crate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use huddle_types::models::{ChatUser, IdentityUser};
use huddle_webhook::Webhook;

use crate::providers::{ChatProvider, DeleteUserOptions, ProviderError, UserDirectory};
use crate::state::{AppState, AppStateInner};

// base64("huddle-test-signing-secret")
pub const WEBHOOK_SECRET: &str = "whsec_aHVkZGxlLXRlc3Qtc2lnbmluZy1zZWNyZXQ=";

// -- Provider fakes --

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCall {
    Token(String),
    Upsert(ChatUser),
    Delete(String, DeleteUserOptions),
}

#[derive(Default)]
pub struct FakeChat {
    calls: Mutex<Vec<ChatCall>>,
    fail: bool,
}

impl FakeChat {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ChatCall) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(ProviderError::Status {
                status: 500,
                body: "chat unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    fn create_token(&self, user_id: &str) -> Result<String, ProviderError> {
        self.record(ChatCall::Token(user_id.to_string()))?;
        Ok(format!("token-for-{}", user_id))
    }

    async fn upsert_user(&self, user: &ChatUser) -> Result<(), ProviderError> {
        self.record(ChatCall::Upsert(user.clone()))
    }

    async fn delete_user(&self, user_id: &str, options: DeleteUserOptions) -> Result<(), ProviderError> {
        self.record(ChatCall::Delete(user_id.to_string(), options))
    }
}

pub struct FakeDirectory {
    users: Vec<IdentityUser>,
    fail: bool,
}

impl FakeDirectory {
    pub fn with_users(users: Vec<IdentityUser>) -> Self {
        Self { users, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            users: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn list_users(&self) -> Result<Vec<IdentityUser>, ProviderError> {
        if self.fail {
            return Err(ProviderError::Status {
                status: 502,
                body: "directory unavailable".into(),
            });
        }
        Ok(self.users.clone())
    }
}

// -- State & router helpers --

pub struct TestState {
    pub chat: Option<Arc<FakeChat>>,
    pub directory: Option<Arc<FakeDirectory>>,
    pub webhook: Option<Webhook>,
}

impl TestState {
    pub fn empty() -> Self {
        Self {
            chat: None,
            directory: None,
            webhook: None,
        }
    }

    pub fn with_chat(mut self, chat: FakeChat) -> Self {
        self.chat = Some(Arc::new(chat));
        self
    }

    pub fn with_directory(mut self, directory: FakeDirectory) -> Self {
        self.directory = Some(Arc::new(directory));
        self
    }

    pub fn with_webhook(mut self) -> Self {
        self.webhook = Some(Webhook::new(WEBHOOK_SECRET).unwrap());
        self
    }

    pub fn app_state(&self) -> AppState {
        Arc::new(AppStateInner {
            chat: self.chat.clone().map(|c| c as Arc<dyn ChatProvider>),
            directory: self.directory.clone().map(|d| d as Arc<dyn UserDirectory>),
            webhook: self.webhook.clone(),
        })
    }

    pub fn router(&self) -> Router {
        crate::router(self.app_state())
    }

    pub fn chat_calls(&self) -> Vec<ChatCall> {
        self.chat.as_ref().map(|c| c.calls()).unwrap_or_default()
    }
}

/// Drive one request through `router`; returns the status and JSON body.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// -- Recording upstream --

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query
            .as_deref()?
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

pub struct Upstream {
    pub base_url: String,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Upstream {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }
}

/// Start a local HTTP server that records every request and answers with
/// `status` and the JSON `body`.
pub async fn spawn_upstream(status: StatusCode, body: &'static str) -> Upstream {
    let recorded: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
    let sink = recorded.clone();

    let app = Router::new().fallback(move |req: Request<Body>| {
        let sink = sink.clone();
        async move {
            let (parts, req_body) = req.into_parts();
            let bytes = req_body.collect().await.unwrap().to_bytes();
            sink.lock().unwrap().push(RecordedRequest {
                method: parts.method,
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                headers: parts.headers,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
            (status, [(header::CONTENT_TYPE, "application/json")], body)
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream {
        base_url: format!("http://{}", addr),
        recorded,
    }
}
