// In-process fake of the email-tone backend for integration tests.
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
};
use email_toner_client::ClientConfig;
use email_toner_client::frameworks::app::build_state;
use email_toner_client::interface_adapters::state::AppState;
use serde_json::{Value, json};
use std::{
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};
use url::Url;

// One request as the fake backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct FakeState {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct FakeBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeBackend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    // Last request sent to `path`.
    pub fn last(&self, path: &str) -> Recorded {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.path == path)
            .unwrap_or_else(|| panic!("no request to {path}"))
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

// Start the fake on an ephemeral port inside the calling test's runtime.
pub async fn spawn_backend() -> FakeBackend {
    let state = FakeState::default();
    let requests = Arc::clone(&state.requests);
    let app = Router::new().fallback(handle).with_state(state);

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend failed");
    });

    FakeBackend {
        base_url: format!("http://{addr}"),
        requests,
    }
}

// A base URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind scratch port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}")
}

// Client state against `base_url`, persisting the token under `home`.
pub fn client_state(base_url: &str, home: &Path) -> AppState {
    let config = ClientConfig {
        api_url: Url::parse(base_url).expect("valid base url"),
        timeout: Duration::from_secs(5),
        suggest_debounce: Duration::from_millis(20),
        home: home.to_path_buf(),
        clipboard: None,
    };
    build_state(&config).expect("client builds")
}

fn sample_email() -> Value {
    json!({
        "subject": "Leave request",
        "body": "Hi,\nI would like Friday off.",
        "outro": "Thanks,\nAda"
    })
}

async fn handle(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .expect("requests mutex poisoned")
        .push(Recorded {
            method: method.clone(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization: authorization.clone(),
            body: body.clone(),
        });

    match (method, uri.path()) {
        (Method::POST, "/auth/signin") => {
            if body["password"] == "wrong" {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Invalid credentials"})),
                )
            } else {
                (
                    StatusCode::OK,
                    Json(json!({"token": "tok-123", "message": "Login successful"})),
                )
            }
        }
        (Method::POST, "/auth/signup") => {
            if body["email"] == "taken@example.com" {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"message": "User already exists"})),
                )
            } else {
                (StatusCode::OK, Json(json!({"message": "OTP sent"})))
            }
        }
        (Method::POST, "/auth/verify-otp") => {
            (StatusCode::OK, Json(json!({"token": "tok-otp"})))
        }
        (Method::POST, "/auth/forgot-password")
        | (Method::POST, "/auth/verify-reset-otp")
        | (Method::POST, "/auth/reset-password") => {
            (StatusCode::OK, Json(json!({"message": "ok"})))
        }
        (Method::POST, "/auth/logout") => (StatusCode::OK, Json(json!({}))),
        (Method::GET, "/tone/all") => (
            StatusCode::OK,
            Json(json!({
                "designations": ["Manager", "Team Lead"],
                "occasions": ["Leave Request"],
                "tones": ["Formal", "Friendly"]
            })),
        ),
        (Method::POST, "/tone/suggest") => {
            (StatusCode::OK, Json(json!({"suggestedTone": "Formal"})))
        }
        (Method::POST, "/email/generate") if authorization.is_none() => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized"})),
        ),
        (Method::POST, "/email/generate") => {
            (StatusCode::OK, Json(json!({"email": sample_email()})))
        }
        (Method::POST, "/email/rewrite") => {
            let overloaded = body["originalEmail"]
                .as_str()
                .is_some_and(|text| text.contains("overload"));
            if overloaded {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Model overloaded"})),
                )
            } else {
                (
                    StatusCode::OK,
                    Json(json!({"rewrittenEmail": sample_email()})),
                )
            }
        }
        (Method::POST, "/email/save") => {
            (StatusCode::CREATED, Json(json!({"message": "saved"})))
        }
        (Method::GET, "/email/history") => (
            StatusCode::OK,
            Json(json!({
                "emails": [
                    {"_id": "e1", "isGenerated": true, "tone": "Formal", "rewrittenEmail": sample_email()},
                    {"_id": "e2", "isGenerated": false, "tone": "Friendly", "rewrittenEmail": sample_email()}
                ],
                "pagination": {"totalPages": 3}
            })),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))),
    }
}
