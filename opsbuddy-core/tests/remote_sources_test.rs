use opsbuddy_core::{
    BackendStatus, ChatConfig, ChatEvent, ChatSession, Dispatcher, OpsBuddyConfig, ResponseMode,
    Severity, BACKEND_FALLBACK_MESSAGE,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(backend: &str, llm: &str, key: Option<&str>) -> OpsBuddyConfig {
    let mut config = OpsBuddyConfig::default();
    config.chat = ChatConfig::instant();
    config.chat.mode = ResponseMode::Backend;
    config.backend.url = backend.to_string();
    config.backend.probe_timeout_ms = 500;
    config.llm.api_base = llm.to_string();
    config.llm.api_key = key.map(str::to_string);
    config
}

async fn mount_llm(server: &MockServer, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": answer}}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_backend_answers_fallback_questions() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "intent": "Dependency Impact Analysis",
            "sub_intent": "None",
            "response": {
                "ci": "DB-PROD-03",
                "dependencies": {"upstream": [], "downstream": []}
            }
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let d = Dispatcher::from_config(&config(&backend.uri(), "http://127.0.0.1:9", None)).unwrap();
    let reply = d.dispatch("what breaks if DB-PROD-03 goes down").await;
    assert!(reply
        .content
        .starts_with("Dependency Impact Analysis for DB-PROD-03:"));
}

#[tokio::test]
async fn test_dataset_intents_never_hit_the_backend() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let d = Dispatcher::from_config(&config(&backend.uri(), "http://127.0.0.1:9", None)).unwrap();
    let reply = d.dispatch("summary").await;
    assert!(reply.content.contains("Total incidents: 10"));
}

#[tokio::test]
async fn test_backend_error_falls_through_to_llm() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"error": "Critical data files are missing or invalid."})),
        )
        .mount(&backend)
        .await;

    let llm = MockServer::start().await;
    mount_llm(&llm, "Check the replica's disk first.").await;

    let d = Dispatcher::from_config(&config(&backend.uri(), &llm.uri(), Some("sk-config-key")))
        .unwrap();
    let reply = d.dispatch("why are reads stale").await;
    assert_eq!(reply.content, "Check the replica's disk first.");
    assert_eq!(reply.severity, Severity::Info);
}

#[tokio::test]
async fn test_unreachable_remotes_degrade_to_canned() {
    let d = Dispatcher::from_config(&config("http://127.0.0.1:9", "http://127.0.0.1:9", None))
        .unwrap();
    let reply = d.dispatch("why is the network slow").await;

    assert_eq!(reply.severity, Severity::Warning);
    assert!(reply.content.starts_with(BACKEND_FALLBACK_MESSAGE));
    assert!(reply.content.contains("network related"));
}

#[tokio::test]
async fn test_pasted_key_enables_llm_in_local_mode() {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header(
            "authorization",
            "Bearer sk-pastedkey0123456789abcdefgh",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Roll back the release."}}]
        })))
        .expect(1)
        .mount(&llm)
        .await;

    let mut cfg = config("http://127.0.0.1:9", &llm.uri(), None);
    cfg.chat.mode = ResponseMode::Local;
    let dispatcher = Arc::new(Dispatcher::from_config(&cfg).unwrap());
    let mut session = ChatSession::new(dispatcher.clone(), cfg.chat.clone());
    let mut events = session.subscribe();

    let ack = session
        .send("sk-pastedkey0123456789abcdefgh")
        .await
        .unwrap();
    assert_eq!(ack.severity(), Some(Severity::Resolved));
    assert!(dispatcher.has_llm().await);

    let reply = session.send("what should we do now").await.unwrap();
    assert_eq!(reply.content(), "Roll back the release.");
    assert_eq!(session.len(), 5);

    let mut appended = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, ChatEvent::MessageAppended(_)) {
            appended += 1;
        }
    }
    assert_eq!(appended, 4);
}

#[tokio::test]
async fn test_probe_reports_status() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&backend)
        .await;

    let client = opsbuddy_core::BackendClient::new(&config(&backend.uri(), "", None).backend)
        .unwrap();
    assert_eq!(client.probe().await, BackendStatus::Fallback);
}
