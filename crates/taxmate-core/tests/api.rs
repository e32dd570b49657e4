//! Round-trip tests for the assistant client against a mock HTTP server.

use serde_json::json;
use taxmate_core::{ApiError, AssistantClient, ChatSession, Role, FALLBACK_REPLY};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/api/chatbot/chat/";

async fn mount_reply(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn success_envelope_returns_reply_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_json(json!({ "message": "What is VAT?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": "VAT is a consumption tax."
        })))
        .mount(&server)
        .await;

    let client = AssistantClient::new(&server.uri());
    let reply = client.send("What is VAT?").await.unwrap();
    assert_eq!(reply, "VAT is a consumption tax.");
}

#[tokio::test]
async fn message_goes_on_the_wire_untrimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_json(json!({ "message": "  help  \n" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": "Sure."
        })))
        .mount(&server)
        .await;

    let client = AssistantClient::new(&server.uri());
    let reply = client.send("  help  \n").await.unwrap();
    assert_eq!(reply, "Sure.");
}

#[tokio::test]
async fn unsuccessful_envelope_is_an_error() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        200,
        json!({ "success": false, "response": "ignored" }),
    )
    .await;

    let client = AssistantClient::new(&server.uri());
    let err = client.send("help").await.unwrap_err();
    assert!(matches!(err, ApiError::Unsuccessful));
}

#[tokio::test]
async fn success_without_reply_text_is_an_error() {
    let server = MockServer::start().await;
    mount_reply(&server, 200, json!({ "success": true })).await;

    let client = AssistantClient::new(&server.uri());
    let err = client.send("help").await.unwrap_err();
    assert!(matches!(err, ApiError::Unsuccessful));
}

#[tokio::test]
async fn http_error_status_is_an_error() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        500,
        json!({ "success": false, "response": "server blew up" }),
    )
    .await;

    let client = AssistantClient::new(&server.uri());
    let err = client.send("help").await.unwrap_err();
    assert!(matches!(err, ApiError::Status(code) if code.as_u16() == 500));
}

#[tokio::test]
async fn non_json_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = AssistantClient::new(&server.uri());
    let err = client.send("help").await.unwrap_err();
    assert!(matches!(err, ApiError::Malformed(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind a listener just to learn a free port, then close it so the
    // connection is refused. A dropped wiremock `MockServer` cannot serve
    // this purpose: `MockServer::start()` leases from a global pool that
    // keeps the listener open, so the port would still answer with 404.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = AssistantClient::new(&format!("http://127.0.0.1:{port}"));
    let err = client.send("help").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn blank_input_never_reaches_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = AssistantClient::new(&server.uri());
    let mut session = ChatSession::new();
    for raw in ["", "   ", "\n\t "] {
        // Drive the session the way the UI does: only an accepted
        // submission produces a network call.
        if let Some(text) = session.submit(raw) {
            let _ = client.send(&text).await;
        }
    }

    assert!(session.conversation().is_empty());
    assert!(!session.is_busy());
    // Dropping the server verifies the zero-call expectation.
}

#[tokio::test]
async fn round_trip_success_records_both_messages() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        200,
        json!({ "success": true, "response": "VAT is a consumption tax." }),
    )
    .await;

    let client = AssistantClient::new(&server.uri());
    let mut session = ChatSession::new();

    let text = session.submit("What is VAT?").unwrap();
    assert!(session.is_busy());
    session.settle(client.send(&text).await);

    let messages = session.conversation().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "What is VAT?");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "VAT is a consumption tax.");
    assert!(!session.is_busy());
}

#[tokio::test]
async fn round_trip_failure_records_fallback() {
    let server = MockServer::start().await;
    mount_reply(&server, 503, json!({ "detail": "maintenance" })).await;

    let client = AssistantClient::new(&server.uri());
    let mut session = ChatSession::new();

    let text = session.submit("help").unwrap();
    session.settle(client.send(&text).await);

    let messages = session.conversation().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, FALLBACK_REPLY);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn sequential_round_trips_alternate_user_and_assistant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_json(json!({ "message": "first" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": "one"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_json(json!({ "message": "second" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": "two"
        })))
        .mount(&server)
        .await;

    let client = AssistantClient::new(&server.uri());
    let mut session = ChatSession::new();

    for raw in ["first", "second"] {
        let text = session.submit(raw).unwrap();
        session.settle(client.send(&text).await);
    }

    let contents: Vec<&str> = session
        .conversation()
        .messages()
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, ["first", "one", "second", "two"]);
}
