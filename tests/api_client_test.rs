//! API client integration tests
//!
//! Runs `ApiClient` against a `wiremock` backend and checks header
//! injection, failure classification, multipart encoding, and the
//! save-then-fetch round trip.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, header_exists, header_regex, method, path,
    query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use callsum::api::classify::{CONNECTIVITY_MESSAGE, UNEXPECTED_MESSAGE};
use callsum::api::types::{ModelTestRequest, SignInRequest, SignUpRequest};
use callsum::api::{
    ApiClient, CallsumApi, ChatMessage, ChatQueryRequest, Role, SaveConversationRequest,
};
use callsum::audio::AudioFile;
use callsum::error::CallsumError;
use callsum::views::{derive_title, ChatPanel, ChatSettings};

mod common;

// ---------------------------------------------------------------------------
// Authorization header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_bearer_header_sent_with_valid_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/files"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok-1"));
    let files = client.list_files().await.unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_no_header_and_not_blocked_without_session() {
    let server = MockServer::start().await;
    Mock::given(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::auth_response_json("new")))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_out());
    let response = client
        .sign_in(&SignInRequest {
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.session.access_token, "new");
}

#[tokio::test]
async fn test_header_follows_session_changes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/user"))
        .and(header("authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-1",
            "email": "ana@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = common::signed_in("first");
    let client = common::client_for(&server.uri(), &session);
    session.sign_in(callsum::session::Session::new("second", common::test_user()));

    let user = client.current_user().await.unwrap();
    assert_eq!(user.email, "ana@example.com");
}

#[tokio::test]
async fn test_unauthorized_is_classified_without_sign_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Invalid or expired token",
            "status_code": 401
        })))
        .mount(&server)
        .await;

    let session = common::signed_in("stale");
    let client = common::client_for(&server.uri(), &session);
    let err = client.conversation_history(Some(20)).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid or expired token");
    assert!(session.snapshot().is_authenticated());
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_structured_error_body_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "X",
            "status_code": 400
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let err = client
        .summarize_audio(&AudioFile::new("call.wav", vec![1, 2, 3]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "X");
    assert!(matches!(
        err.downcast_ref::<CallsumError>(),
        Some(CallsumError::Api(_))
    ));
}

#[tokio::test]
async fn test_empty_error_body_uses_transport_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/storage/file/abc"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let err = client.delete_file("abc").await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status code 500");
}

#[tokio::test]
async fn test_no_response_gives_connectivity_message() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let client = common::client_for(&uri, &common::signed_out());
    let err = client.health().await.unwrap_err();
    assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn test_timeout_gives_connectivity_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = ApiClient::new(
        &server.uri(),
        Duration::from_millis(200),
        Arc::new(common::signed_out()),
    )
    .unwrap();
    let err = client.health().await.unwrap_err();
    assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn test_undecodable_success_body_is_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/files"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let err = client.list_files().await.unwrap_err();
    assert_eq!(err.to_string(), UNEXPECTED_MESSAGE);
}

// ---------------------------------------------------------------------------
// Request encoding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_summarize_sends_multipart_audio_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains(r#"name="audio_file""#))
        .and(body_string_contains(r#"filename="standup.mp3""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "summary": "Weekly standup",
            "duration_minutes": 12.5,
            "no_of_participants": 4,
            "sentiment": "positive",
            "key_aspects": ["release", "hiring"],
            "metadata": {"file_name": "standup.mp3", "file_size": 3, "processing_time": 1.2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let summary = client
        .summarize_audio(&AudioFile::new("standup.mp3", vec![1, 2, 3]))
        .await
        .unwrap();
    assert_eq!(summary.summary, "Weekly standup");
    assert_eq!(summary.no_of_participants, Some(4));
    assert_eq!(summary.key_aspects.unwrap().len(), 2);
}

#[tokio::test]
async fn test_upload_file_sends_multipart_audio_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/upload"))
        .and(body_string_contains(r#"name="audio_file""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file_id": "f-1",
            "filename": "call.wav",
            "storage_url": "user-1/f-1.wav",
            "message": "File uploaded successfully"
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let uploaded = client
        .upload_file(&AudioFile::new("call.wav", vec![0; 8]))
        .await
        .unwrap();
    assert_eq!(uploaded.file_id, "f-1");
    assert_eq!(uploaded.filename, "call.wav");
    assert_eq!(uploaded.storage_url, "user-1/f-1.wav");
    assert_eq!(uploaded.message, "File uploaded successfully");
}

#[tokio::test]
async fn test_transcribe_sends_multipart_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcript"))
        .and(header("authorization", "Bearer tok"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains(r#"name="audio_file""#))
        .and(body_string_contains(r#"filename="interview.flac""#))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(" Thanks for joining the call.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let transcript = client
        .transcribe(&AudioFile::new("interview.flac", vec![1, 2, 3]))
        .await
        .unwrap();
    assert_eq!(transcript, " Thanks for joining the call.");
}

#[tokio::test]
async fn test_transcribe_failure_uses_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcript"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to process audio file: decoder error",
            "status_code": 500
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let err = client
        .transcribe(&AudioFile::new("call.wav", vec![0; 4]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to process audio file: decoder error");
}

#[tokio::test]
async fn test_json_calls_send_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"user_choice": 2, "query": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Model 2 answered",
            "model_info": {"llm_model": ["gemini-pro", "llama3"], "rag_enabled": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_out());
    let response = client
        .test_model(&ModelTestRequest {
            user_choice: 2,
            query: "hello".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.message, "Model 2 answered");
    assert_eq!(response.model_info.unwrap().rag_enabled, Some(true));
}

#[tokio::test]
async fn test_history_sends_limit_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "c2", "title": "Newest", "message_count": 4,
             "created_at": "2025-01-02T09:00:00", "updated_at": "2025-01-02T09:30:00"},
            {"id": "c1", "title": "Older", "message_count": 2,
             "created_at": "2025-01-01T09:00:00", "updated_at": "2025-01-01T09:30:00"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let items = client.conversation_history(None).await.unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["c2", "c1"]);
}

// ---------------------------------------------------------------------------
// Conversation round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_saved_conversation_round_trips_in_order() {
    let server = MockServer::start().await;
    let backend = common::FakeChatBackend::default();
    backend.mount(&server).await;

    let messages = vec![
        ChatMessage::assistant("Hi!"),
        ChatMessage::user("What did the client ask for?"),
        ChatMessage::assistant("A revised quote."),
        ChatMessage::user("By when?"),
    ];
    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let saved = client
        .save_conversation(&SaveConversationRequest {
            title: derive_title(&messages),
            messages: messages.clone(),
        })
        .await
        .unwrap();
    let id = saved.id.expect("server assigns an id");

    let fetched = client.get_conversation(&id).await.unwrap();
    assert_eq!(fetched.title, "What did the client ask for?");
    assert_eq!(fetched.messages.len(), messages.len());
    for (got, want) in fetched.messages.iter().zip(&messages) {
        assert_eq!(got.role, want.role);
        assert_eq!(got.content, want.content);
    }
}

#[tokio::test]
async fn test_missing_conversation_message() {
    let server = MockServer::start().await;
    common::FakeChatBackend::default().mount(&server).await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let err = client.get_conversation("conv-99").await.unwrap_err();
    assert_eq!(err.to_string(), "Conversation not found");
}

#[tokio::test]
async fn test_chat_panel_against_backend() {
    let server = MockServer::start().await;
    let backend = common::FakeChatBackend::default();
    backend.mount(&server).await;
    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let mut panel = ChatPanel::new(ChatSettings {
        reply_delay: Duration::from_millis(10),
        ..ChatSettings::default()
    });
    panel.send(&client, "Summarize the budget talk").await.unwrap();

    assert_eq!(backend.saved(), 2);
    let id = panel.conversation_id().unwrap().to_string();
    let stored = client.get_conversation(&id).await.unwrap();
    let roles: Vec<Role> = stored.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
}

// ---------------------------------------------------------------------------
// Endpoint shapes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_conversation_issues_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/chat/conv-7"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Conversation deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    client.delete_conversation("conv-7").await.unwrap();
}

#[tokio::test]
async fn test_query_chat_sends_history_and_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "question": "Who owns the follow-up?",
            "chat_history": [
                {"role": "assistant", "content": "Hi!"},
                {"role": "user", "content": "Summarize the call"}
            ],
            "model_choice": "groq"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Ben sends the quote by Friday.",
            "sources": [{"content": "Ben: I'll send it Friday", "metadata": {"chunk": 3}}],
            "model_used": "groq"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let response = client
        .query_chat(&ChatQueryRequest {
            question: "Who owns the follow-up?".to_string(),
            chat_history: Some(vec![
                ChatMessage::assistant("Hi!"),
                ChatMessage::user("Summarize the call"),
            ]),
            model_choice: Some("groq".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(response.answer, "Ben sends the quote by Friday.");
    assert_eq!(response.model_used, "groq");
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].metadata["chunk"], json!(3));
}

#[tokio::test]
async fn test_sign_up_sends_credentials_without_header() {
    let server = MockServer::start().await;
    Mock::given(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(json!({
            "email": "ana@example.com",
            "password": "secret1",
            "full_name": "Ana"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::auth_response_json("fresh")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_out());
    let response = client
        .sign_up(&SignUpRequest {
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
            full_name: Some("Ana".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(response.session.access_token, "fresh");
    assert_eq!(response.user.full_name.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_sign_up_omits_missing_full_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(json!({"email": "ben@example.com", "password": "secret1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::auth_response_json("tok")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_out());
    client
        .sign_up(&SignUpRequest {
            email: "ben@example.com".to_string(),
            password: "secret1".to_string(),
            full_name: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sign_out_posts_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signout"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Successfully signed out"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let response = client.sign_out().await.unwrap();
    assert_eq!(response.message, "Successfully signed out");
}

#[tokio::test]
async fn test_get_file_returns_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/file/f-1"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file_id": "f-1",
            "filename": "client-call.wav",
            "url": "https://storage.example.com/signed/f-1",
            "file_size": 2048,
            "created_at": "2025-01-01T10:00:00.000000"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri(), &common::signed_in("tok"));
    let details = client.get_file("f-1").await.unwrap();
    assert_eq!(details.filename, "client-call.wav");
    assert_eq!(details.url, "https://storage.example.com/signed/f-1");
    assert_eq!(details.file_size, 2048);
    assert!(details.created_at.is_some());
}
