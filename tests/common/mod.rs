use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use callsum::api::types::UserProfile;
use callsum::api::ApiClient;
use callsum::session::{Session, SessionHandle};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn test_user() -> UserProfile {
    UserProfile {
        id: "user-1".to_string(),
        email: "ana@example.com".to_string(),
        full_name: Some("Ana".to_string()),
        created_at: None,
    }
}

#[allow(dead_code)]
pub fn signed_in(token: &str) -> SessionHandle {
    SessionHandle::with_session(Some(Session::new(token, test_user())))
}

#[allow(dead_code)]
pub fn signed_out() -> SessionHandle {
    SessionHandle::with_session(None)
}

#[allow(dead_code)]
pub fn client_for(base_url: &str, session: &SessionHandle) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5), Arc::new(session.clone()))
        .expect("failed to build client")
}

#[allow(dead_code)]
pub fn auth_response_json(token: &str) -> Value {
    json!({
        "user": {"id": "user-1", "email": "ana@example.com", "full_name": "Ana"},
        "session": {
            "access_token": token,
            "token_type": "bearer",
            "refresh_token": "refresh-1",
            "user": {"id": "user-1", "email": "ana@example.com", "full_name": "Ana"}
        }
    })
}

// ---------------------------------------------------------------------------
// In-memory conversation backend
// ---------------------------------------------------------------------------

/// Stateful stand-in for the chat persistence endpoints.
///
/// `POST /chat/save` stores the body under a fresh `conv-N` id and returns
/// it; `GET /chat/conv-N` returns what was stored.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct FakeChatBackend {
    conversations: Arc<Mutex<HashMap<String, Value>>>,
    next_id: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FakeChatBackend {
    pub async fn mount(&self, server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/chat/save"))
            .respond_with(SaveResponder(self.clone()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/chat/conv-[0-9]+$"))
            .respond_with(GetResponder(self.clone()))
            .mount(server)
            .await;
    }

    pub fn saved(&self) -> usize {
        self.conversations.lock().unwrap().len()
    }
}

#[allow(dead_code)]
struct SaveResponder(FakeChatBackend);

impl Respond for SaveResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => {
                return ResponseTemplate::new(422)
                    .set_body_json(json!({"error": "Invalid body", "status_code": 422}))
            }
        };
        let n = self.0.next_id.fetch_add(1, Ordering::SeqCst);
        let id = format!("conv-{}", n);
        let stored = json!({
            "id": id.clone(),
            "user_id": "user-1",
            "title": body["title"],
            "messages": body["messages"],
            "created_at": "2025-01-01T10:00:00.000000",
            "updated_at": "2025-01-01T10:00:00.000000"
        });
        self.0
            .conversations
            .lock()
            .unwrap()
            .insert(id, stored.clone());
        ResponseTemplate::new(200).set_body_json(stored)
    }
}

#[allow(dead_code)]
struct GetResponder(FakeChatBackend);

impl Respond for GetResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id = request.url.path().rsplit('/').next().unwrap_or_default();
        match self.0.conversations.lock().unwrap().get(id) {
            Some(conversation) => ResponseTemplate::new(200).set_body_json(conversation.clone()),
            None => ResponseTemplate::new(404)
                .set_body_json(json!({"error": "Conversation not found", "status_code": 404})),
        }
    }
}
