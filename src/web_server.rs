use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    serve, Json, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::{Deserialize, Serialize};
use std::{
    future::Future,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::dispatcher::QueryDispatcher;

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    // Absent and null both mean "no message".
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    /// Parses a request body, which must be a JSON object.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        // Derived structs also accept a sequence, so check the shape first.
        match serde_json::from_slice::<serde_json::Value>(body)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
}

// Shared application state
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    dispatcher: QueryDispatcher,
}

impl AppState {
    pub fn new(templates: AutoReloader, dispatcher: QueryDispatcher) -> Self {
        Self {
            templates: Arc::new(templates),
            dispatcher,
        }
    }
}

/// Where the page template and its assets live on disk.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

// Minijinja Environment setup
pub fn create_minijinja_env(templates_dir: impl Into<PathBuf>) -> AutoReloader {
    let templates_dir = templates_dir.into();
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(&templates_dir));
        // Watch the templates directory for changes
        notifier.watch_path(&templates_dir, true);
        Ok(env)
    })
}

async fn index_handler(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    state
        .templates
        .acquire_env()
        .and_then(|env| {
            env.get_template("index.html").and_then(|tmpl| {
                let context = minijinja::context! {
                    title => "AI-Powered Placement Assistant",
                };
                tmpl.render(context)
            })
        })
        .map(Html)
        .map_err(|e| {
            error!("Failed to get or render template: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Internal Server Error: {}", e)),
            )
        })
}

// Always answers 200; failures are described in the reply text.
async fn chat_handler(State(state): State<AppState>, body: Bytes) -> Json<ChatReply> {
    let reply = match ChatRequest::from_body(&body) {
        Ok(request) => {
            state
                .dispatcher
                .dispatch(request.message.as_deref())
                .await
                .reply
        }
        Err(e) => {
            warn!(error = %e, "Rejected malformed chat request");
            format!("An error occurred while processing your query: {}", e)
        }
    };
    Json(ChatReply { reply })
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/chat", post(chat_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http()) // Add request logging
}

// Completes only when `signal` fires. If the signal cannot be installed the
// server keeps running rather than shutting down at once.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, initiating shutdown...");
}

pub async fn start_web_server(config: ServerConfig, dispatcher: QueryDispatcher) -> Result<()> {
    let state = AppState::new(create_minijinja_env(&config.templates_dir), dispatcher);
    // Fail at startup rather than on the first page load.
    state
        .templates
        .acquire_env()
        .context("Failed to initialize template engine")?;

    let app = router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await
        .context("Web server failed")?;

    info!("Shutdown complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_body_object() {
        let request = ChatRequest::from_body(br#"{"message": "hi"}"#).unwrap();
        assert_eq!(request.message.as_deref(), Some("hi"));
        assert_eq!(ChatRequest::from_body(b"{}").unwrap().message, None);
        assert_eq!(
            ChatRequest::from_body(br#"{"message": null}"#).unwrap().message,
            None
        );
    }

    #[test]
    fn test_from_body_rejects_non_objects() {
        let bodies: [&[u8]; 5] = [b"[]", b"[\"hi\"]", b"\"hi\"", b"42", b"null"];
        for body in bodies {
            assert!(ChatRequest::from_body(body).is_err(), "{:?}", body);
        }
        let err = ChatRequest::from_body(b"[]").unwrap_err();
        assert!(err.to_string().contains("expected a JSON object, found an array"));
    }

    #[test]
    fn test_from_body_rejects_non_string_message() {
        assert!(ChatRequest::from_body(br#"{"message": 7}"#).is_err());
    }

    #[tokio::test]
    async fn test_shutdown_waits_when_signal_unavailable() {
        let failed = std::future::ready(Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no signal handler",
        )));
        let waited = tokio::time::timeout(Duration::from_millis(100), shutdown_on(failed)).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_on_signal() {
        let fired = tokio::time::timeout(
            Duration::from_millis(100),
            shutdown_on(std::future::ready(Ok(()))),
        )
        .await;
        assert!(fired.is_ok());
    }
}
