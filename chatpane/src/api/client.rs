//! `reqwest` implementation of [`ChatBackend`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use super::types::{
    CreateSessionRequest, ErrorBody, HistoryResponse, ModelsResponse, RenameRequest, SendRequest,
    SendResponse,
};
use super::ChatBackend;
use crate::models::{Message, ModelInfo, SessionSummary};

/// Talks to the chat backend over HTTP.
///
/// No timeout or retry is configured: each call is a single attempt bounded
/// only by the network stack.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the backend rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// URL for an endpoint that ends in a session id.
    fn session_url(&self, prefix: &str, session_id: &str) -> String {
        self.url(&format!("{prefix}/{}", urlencoding::encode(session_id)))
    }

    /// Send a request, turning transport failures and non-2xx statuses into errors.
    async fn dispatch(request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        let resp = request.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body).map_or(body, |b| b.error);
        Err(ApiError::Status { status, message })
    }

    async fn decode<T: DeserializeOwned>(resp: Response, url: &str) -> Result<T, ApiError> {
        resp.json().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ApiError> {
        let url = self.url("/api/chats");
        debug!(%url, "listing sessions");

        let resp = Self::dispatch(self.client.get(&url), &url).await?;
        Self::decode(resp, &url).await
    }

    async fn session_history(&self, session_id: &str) -> Result<Vec<Message>, ApiError> {
        let url = self.session_url("/api/chat/history", session_id);
        debug!(%url, "fetching history");

        let resp = Self::dispatch(self.client.get(&url), &url).await?;
        let history: HistoryResponse = Self::decode(resp, &url).await?;
        Ok(history.history.into_iter().map(Message::from).collect())
    }

    async fn send_message(&self, request: &SendRequest) -> Result<String, ApiError> {
        let url = self.url("/api/chat");
        debug!(%url, session_id = %request.session_id, model = %request.model, "sending message");

        let resp = Self::dispatch(self.client.post(&url).json(request), &url).await?;
        let reply: SendResponse = Self::decode(resp, &url).await?;
        Ok(reply.response)
    }

    async fn clear_history(&self, session_id: &str) -> Result<(), ApiError> {
        let url = self.session_url("/api/chat/clear", session_id);
        debug!(%url, "clearing history");

        Self::dispatch(self.client.delete(&url), &url).await?;
        Ok(())
    }

    async fn create_session(&self, title: Option<&str>) -> Result<SessionSummary, ApiError> {
        let url = self.url("/api/chats");
        debug!(%url, ?title, "creating session");

        let body = CreateSessionRequest { title };
        let resp = Self::dispatch(self.client.post(&url).json(&body), &url).await?;
        Self::decode(resp, &url).await
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<(), ApiError> {
        let url = self.session_url("/api/chats", session_id);
        debug!(%url, title, "renaming session");

        let body = RenameRequest { title };
        Self::dispatch(self.client.patch(&url).json(&body), &url).await?;
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), ApiError> {
        let url = self.session_url("/api/chats", session_id);
        debug!(%url, "deleting session");

        Self::dispatch(self.client.delete(&url), &url).await?;
        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        let url = self.url("/api/models");
        debug!(%url, "listing models");

        let resp = Self::dispatch(self.client.get(&url), &url).await?;
        let models: ModelsResponse = Self::decode(resp, &url).await?;
        Ok(models.models)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        routing::{delete, get, patch, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::sync::Mutex;

    use super::*;
    use crate::models::Sender;

    /// In-memory stand-in for the chat backend.
    #[derive(Default)]
    struct FakeServer {
        chats: Mutex<BTreeMap<String, String>>,
        next_id: Mutex<u32>,
    }

    async fn list_chats(State(s): State<Arc<FakeServer>>) -> Json<Value> {
        let chats = s.chats.lock().await;
        let list: Vec<Value> = chats
            .iter()
            .map(|(id, title)| json!({"sessionId": id, "title": title}))
            .collect();
        Json(Value::Array(list))
    }

    async fn create_chat(State(s): State<Arc<FakeServer>>, Json(body): Json<Value>) -> Json<Value> {
        let mut next = s.next_id.lock().await;
        *next += 1;
        let id = format!("sess-{next}");
        let title = body["title"].as_str().unwrap_or("Untitled").to_string();
        s.chats.lock().await.insert(id.clone(), title.clone());
        Json(json!({"sessionId": id, "title": title}))
    }

    async fn rename_chat(
        State(s): State<Arc<FakeServer>>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let title = body["title"].as_str().unwrap_or_default().to_string();
        s.chats.lock().await.insert(id.clone(), title.clone());
        Json(json!({"sessionId": id, "title": title}))
    }

    async fn delete_chat(State(s): State<Arc<FakeServer>>, Path(id): Path<String>) -> StatusCode {
        if s.chats.lock().await.remove(&id).is_some() {
            StatusCode::OK
        } else {
            StatusCode::NOT_FOUND
        }
    }

    async fn chat(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["message"].as_str().unwrap_or_default().is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Message is required"})),
            );
        }
        let echo = format!(
            "{}|{}|{}|{}",
            body["message"].as_str().unwrap_or_default(),
            body["session_id"].as_str().unwrap_or_default(),
            body["model"].as_str().unwrap_or_default(),
            body["hinglish_mode"].as_bool().unwrap_or_default(),
        );
        (StatusCode::OK, Json(json!({"response": echo})))
    }

    async fn history(Path(id): Path<String>) -> Json<Value> {
        Json(json!({"history": [
            {"content": format!("question for {id}"), "role": "user", "timestamp": "2024-01-01T00:00:00Z"},
            {"content": "answer", "role": "assistant", "timestamp": "not-a-date"},
        ]}))
    }

    async fn clear(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
        if id == "broken" {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "vector store offline"})),
            );
        }
        (StatusCode::OK, Json(json!({"message": "Chat history cleared successfully"})))
    }

    async fn models() -> Json<Value> {
        Json(json!({"models": [
            {"id": "gemini", "name": "Google Gemini", "description": "Google's latest AI model"},
            {"id": "groq", "name": "Groq LLM"},
        ]}))
    }

    async fn spawn_server() -> HttpBackend {
        let state = Arc::new(FakeServer::default());
        let app = Router::new()
            .route("/api/chats", get(list_chats).post(create_chat))
            .route("/api/chats/{id}", patch(rename_chat).delete(delete_chat))
            .route("/api/chat", post(chat))
            .route("/api/chat/history/{id}", get(history))
            .route("/api/chat/clear/{id}", delete(clear))
            .route("/api/models", get(models))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        HttpBackend::new(&format!("http://{addr}/")).unwrap()
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            HttpBackend::new("ftp://example.com"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            HttpBackend::new("not a url"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://localhost:5001/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5001");
        assert_eq!(
            backend.session_url("/api/chats", "a b/c"),
            "http://localhost:5001/api/chats/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn session_crud_round_trip() {
        let backend = spawn_server().await;

        assert!(backend.list_sessions().await.unwrap().is_empty());

        let first = backend.create_session(Some("Chat 1")).await.unwrap();
        assert_eq!(first.title, "Chat 1");
        let second = backend.create_session(None).await.unwrap();
        assert_eq!(second.title, "Untitled");

        backend
            .rename_session(&second.session_id, "Groceries")
            .await
            .unwrap();
        let listed = backend.list_sessions().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|s| s.title == "Groceries"));

        backend.delete_session(&first.session_id).await.unwrap();
        let listed = backend.list_sessions().await.unwrap();
        assert_eq!(
            listed,
            vec![SessionSummary {
                session_id: second.session_id.clone(),
                title: "Groceries".to_string(),
            }]
        );

        let err = backend.delete_session("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn send_carries_all_request_fields() {
        let backend = spawn_server().await;
        let reply = backend
            .send_message(&SendRequest {
                message: "hello".to_string(),
                session_id: "s-9".to_string(),
                model: "groq".to_string(),
                hinglish_mode: true,
            })
            .await
            .unwrap();
        assert_eq!(reply, "hello|s-9|groq|true");
    }

    #[tokio::test]
    async fn error_body_is_surfaced_in_status_error() {
        let backend = spawn_server().await;
        let err = backend
            .send_message(&SendRequest {
                message: String::new(),
                session_id: "s-1".to_string(),
                model: "gemini".to_string(),
                hinglish_mode: false,
            })
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
                assert_eq!(message, "Message is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = backend.clear_history("broken").await.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        backend.clear_history("fine").await.unwrap();
    }

    #[tokio::test]
    async fn history_maps_roles_to_senders() {
        let backend = spawn_server().await;
        let messages = backend.session_history("abc").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "question for abc");
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].sender, Sender::Bot);
    }

    #[tokio::test]
    async fn models_are_listed() {
        let backend = spawn_server().await;
        let models = backend.list_models().await.unwrap();
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["gemini", "groq"]);
        assert!(models[1].description.is_none());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::new(&format!("http://{addr}")).unwrap();
        let err = backend.list_sessions().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
        assert!(err.status().is_none());
    }
}
