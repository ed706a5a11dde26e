use placement_assistant::llm_interaction::respond;
use placement_assistant::{constants, GenerationError, OllamaResponder, Responder};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn responder(server: &MockServer) -> OllamaResponder {
    OllamaResponder::new(server.uri(), "test-model", None).unwrap()
}

#[tokio::test]
async fn test_generate_sends_decoding_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "prompt": "How do I negotiate a stipend?",
            "stream": false,
            "options": {
                "num_predict": 150,
                "num_return_sequences": 1,
                "num_beams": 5,
                "no_repeat_ngram_size": 2,
                "early_stopping": true
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test-model",
            "created_at": "2024-01-01T00:00:00Z",
            "response": "  Research market rates first.  ",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = responder(&server)
        .generate("How do I negotiate a stipend?")
        .await
        .unwrap();
    assert_eq!(text, "Research market rates first.");
}

#[tokio::test]
async fn test_generate_backend_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not found"))
        .mount(&server)
        .await;

    let err = responder(&server).generate("anything").await.unwrap_err();
    match err {
        GenerationError::Backend { status, ref body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let err = responder(&server).generate("anything").await.unwrap_err();
    assert!(matches!(err, GenerationError::Decode(_)));
}

#[tokio::test]
async fn test_respond_guards_against_echo() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Tell me about campus drives. Tell me about",
            "done": true
        })))
        .mount(&server)
        .await;

    let reply = respond(&responder(&server), "tell me about CAMPUS DRIVES").await;
    assert_eq!(reply, constants::CLARIFICATION_REPLY);
}
