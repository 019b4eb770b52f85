use crate::services::chat::{send_message, ChatError, ChatTranscript, ChatWidget, Exchange};
use crate::services::responder::AssistantKind;
use crate::state::SharedState;
use crate::web::session::Authenticated;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize, Default)]
pub struct OpenRequest {
    #[serde(default)]
    pub assistant: AssistantKind,
    pub context: Option<String>,
}

#[derive(Deserialize)]
pub struct SendRequest {
    pub message: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/widgets", post(open_widget))
        .route("/widgets/:id", get(history).delete(close_widget))
        .route("/widgets/:id/messages", post(send))
        .with_state(state)
}

fn chat_status(e: ChatError) -> StatusCode {
    match e {
        ChatError::NotFound => StatusCode::NOT_FOUND,
        ChatError::Empty => StatusCode::BAD_REQUEST,
    }
}

async fn open_widget(
    Authenticated(ws): Authenticated,
    State(state): State<SharedState>,
    Json(payload): Json<OpenRequest>,
) -> (StatusCode, Json<ChatTranscript>) {
    let context = payload.context.filter(|c| !c.trim().is_empty());
    let widget = ChatWidget::open(
        payload.assistant,
        payload.assistant.strategy(state.catalog),
        context,
    );
    let transcript = widget.transcript();
    ws.lock().await.chats.insert(widget.id(), widget);
    tracing::debug!("Opened {:?} chat widget {}", payload.assistant, transcript.id);
    (StatusCode::CREATED, Json(transcript))
}

async fn history(
    Authenticated(ws): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatTranscript>, StatusCode> {
    let guard = ws.lock().await;
    let widget = guard.chats.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(widget.transcript()))
}

async fn send(
    Authenticated(ws): Authenticated,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SendRequest>,
) -> Result<Json<Exchange>, StatusCode> {
    let exchange = send_message(&ws, &state.pacer, id, &payload.message)
        .await
        .map_err(|e| {
            tracing::warn!("Chat message to {} rejected: {}", id, e);
            chat_status(e)
        })?;
    Ok(Json(exchange))
}

async fn close_widget(
    Authenticated(ws): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    ws.lock()
        .await
        .chats
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(chat_status(ChatError::NotFound))
}

#[cfg(test)]
mod tests {
    use crate::web::testing::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_widget_lifecycle() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;

        let (status, _, body) = call(
            &app,
            "POST",
            "/chat/widgets",
            Some(&cookie),
            Some(json!({"context": "Due Diligence"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["assistant"], "platform");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        let id = body["id"].as_str().unwrap().to_string();

        let (status, _, body) = call(
            &app,
            "POST",
            &format!("/chat/widgets/{id}/messages"),
            Some(&cookie),
            Some(json!({"message": "Any risk to compliance?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["sender"], "user");
        let reply = body["reply"]["message"].as_str().unwrap();
        assert!(reply.contains("compliance"));

        let (_, _, body) =
            call(&app, "GET", &format!("/chat/widgets/{id}"), Some(&cookie), None).await;
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["typing"], false);

        let (status, _, _) =
            call(&app, "DELETE", &format!("/chat/widgets/{id}"), Some(&cookie), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _, _) =
            call(&app, "GET", &format!("/chat/widgets/{id}"), Some(&cookie), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_knowledge_widget_offers_suggestions() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;
        let (_, _, body) = call(
            &app,
            "POST",
            "/chat/widgets",
            Some(&cookie),
            Some(json!({"assistant": "knowledge"})),
        )
        .await;
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let state = test_state();
        let app = app(&state);
        let cookie = login(&app).await;
        let (_, _, body) =
            call(&app, "POST", "/chat/widgets", Some(&cookie), Some(json!({}))).await;
        let id = body["id"].as_str().unwrap().to_string();
        let (status, _, _) = call(
            &app,
            "POST",
            &format!("/chat/widgets/{id}/messages"),
            Some(&cookie),
            Some(json!({"message": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
