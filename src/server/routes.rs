//! HTTP route handlers for the SafeGuard API.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;

use crate::complaints::ComplaintRecord;
use crate::conversation::{
    ConversationError, ExternalReply, Intent, Message, MessageId, PendingTurn, SessionId,
};
use crate::features::{FakeCallPlan, FeatureAction, FeatureModal};
use crate::identity::{Profile, ProfileError, SosContacts, UserId};
use crate::lawyers::{LawyerQuery, LookupOutcome};

use super::state::{AppState, ChatSession, SharedSession};

/// Error response: status and plain-text reason.
type ApiError = (StatusCode, String);

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", delete(close_session))
        .route("/api/sessions/{id}/messages", get(get_session).post(submit_message))
        .route("/api/sessions/{id}/messages/{message_id}", delete(delete_message))
        .route("/api/sessions/{id}/undo", post(undo_last))
        .route("/api/sessions/{id}/clear", post(clear_session))
        .route("/api/sessions/{id}/features", post(submit_feature))
        .route("/api/sessions/{id}/sign-in", post(sign_in))
        .route("/api/sessions/{id}/sign-out", post(sign_out))
        .route("/api/history", get(complaint_history))
        .route("/api/profile/{uid}", get(get_profile).put(put_profile))
        .route("/api/profile/{uid}/sos", get(get_sos_contacts).put(put_sos_contacts))
        .route("/api/demo/queue", get(queue_all).post(queue_add))
        .route("/api/demo/queue/poll", post(queue_poll))
        .route("/api/gemini", post(placeholder_reply))
        .fallback_service(static_dir)
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "safeguard",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn conversation_error(e: ConversationError) -> ApiError {
    let status = match e {
        ConversationError::Busy | ConversationError::StalePending(_) => StatusCode::CONFLICT,
        ConversationError::InvalidPattern(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

fn find_session(state: &AppState, id: SessionId) -> Result<SharedSession, ApiError> {
    state
        .session(id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown session: {id}")))
}

/// Projection of a session for the chat view and history sidebar.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// Session id.
    pub id: SessionId,
    /// Messages in insertion order.
    pub messages: Vec<Message>,
    /// Whether a lookup is pending; clients disable input while set.
    pub busy: bool,
    /// Signed-in user, if any.
    pub user: Option<UserId>,
}

impl SessionView {
    fn of(id: SessionId, session: &ChatSession) -> Self {
        Self {
            id,
            messages: session.engine.messages().to_vec(),
            busy: session.engine.is_busy(),
            user: session.context.current_user(),
        }
    }
}

/// Open a session holding only the welcome message.
async fn create_session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SessionView>) {
    let (id, session) = state.create_session();
    let session = session.lock().await;
    (StatusCode::CREATED, Json(SessionView::of(id, &session)))
}

/// Close a session; its log and auth context are dropped.
async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    if state.close_session(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, format!("Unknown session: {id}")))
    }
}

/// Read the conversation.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let session = find_session(&state, id)?;
    let session = session.lock().await;
    Ok(Json(SessionView::of(id, &session)))
}

/// Text typed by the user.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Raw input.
    pub text: String,
}

/// Result of a submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Intent that produced the reply; absent when blank input was ignored.
    pub intent: Option<Intent>,
    /// Updated session.
    pub session: SessionView,
}

/// Submit user text for classification.
async fn submit_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let session = find_session(&state, id)?;
    let mut session = session.lock().await;
    let intent = session
        .engine
        .submit_user_text(&request.text)
        .map_err(conversation_error)?;

    Ok(Json(SubmitResponse {
        intent,
        session: SessionView::of(id, &session),
    }))
}

/// Result of an undo.
#[derive(Debug, Serialize)]
pub struct UndoResponse {
    /// Messages removed, oldest first.
    pub removed: Vec<Message>,
    /// Updated session.
    pub session: SessionView,
}

/// Undo the last turn.
async fn undo_last(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<UndoResponse>, ApiError> {
    let session = find_session(&state, id)?;
    let mut session = session.lock().await;
    let removed = session.engine.undo_last().map_err(conversation_error)?;

    Ok(Json(UndoResponse {
        removed,
        session: SessionView::of(id, &session),
    }))
}

/// Result of a delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether a message with that id existed.
    pub deleted: bool,
    /// Updated session.
    pub session: SessionView,
}

/// Delete one message by id; unknown ids succeed with `deleted: false`.
async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path((id, message_id)): Path<(SessionId, MessageId)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let session = find_session(&state, id)?;
    let mut session = session.lock().await;
    let deleted = session
        .engine
        .delete_by_id(message_id)
        .map_err(conversation_error)?
        .is_some();

    Ok(Json(DeleteResponse {
        deleted,
        session: SessionView::of(id, &session),
    }))
}

/// Reset the conversation to the welcome message.
async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let session = find_session(&state, id)?;
    let mut session = session.lock().await;
    session.engine.clear().map_err(conversation_error)?;
    Ok(Json(SessionView::of(id, &session)))
}

/// Result of a feature submission.
#[derive(Debug, Serialize)]
pub struct FeatureResponse {
    /// Feature tag.
    pub kind: &'static str,
    /// Fake call to play, for the fake-call feature.
    pub fake_call: Option<FakeCallPlan>,
    /// Updated session.
    pub session: SessionView,
}

/// Apply a submitted feature modal to the conversation.
async fn submit_feature(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(modal): Json<FeatureModal>,
) -> Result<Json<FeatureResponse>, ApiError> {
    let shared = find_session(&state, id)?;
    let today = Utc::now().date_naive();
    tracing::debug!(session = %id, kind = modal.kind(), "feature submitted");

    let mut session = shared.lock().await;
    let touches_log = !matches!(modal, FeatureModal::FakeCall { .. });
    if touches_log && session.engine.is_busy() {
        return Err(conversation_error(ConversationError::Busy));
    }
    // Documents are written before the log so a failed save leaves no confirmation behind.
    if let Some(user) = session.context.current_user() {
        record_side_effects(&state, &user, &modal, today).await?;
    }

    let mut fake_call = None;
    let lookup = match modal.action(today) {
        FeatureAction::SubmitText(text) => {
            session
                .engine
                .submit_user_text(&text)
                .map_err(conversation_error)?;
            None
        }
        FeatureAction::AppendPair {
            user,
            reply: ExternalReply::Ready(content),
        } => {
            let pending = session
                .engine
                .begin_external(user)
                .map_err(conversation_error)?;
            session
                .engine
                .complete_external(pending, content)
                .map_err(conversation_error)?;
            None
        }
        FeatureAction::AppendPair {
            user,
            reply: ExternalReply::LawyerLookup(query),
        } => {
            let pending = session
                .engine
                .begin_external(user)
                .map_err(conversation_error)?;
            Some((pending, query))
        }
        FeatureAction::FakeCall(plan) => {
            fake_call = Some(plan);
            None
        }
    };
    drop(session);

    if let Some((pending, query)) = lookup {
        spawn_lawyer_lookup(&state, Arc::clone(&shared), pending, query)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Lookup task failed: {e}")))?
            .map_err(conversation_error)?;
    }

    let session = shared.lock().await;
    Ok(Json(FeatureResponse {
        kind: modal.kind(),
        fake_call,
        session: SessionView::of(id, &session),
    }))
}

/// Resolve a lawyer lookup and complete the pending turn on a detached task,
/// so the turn completes even if the client goes away. A lookup that dies
/// completes the turn with the not-found reply.
fn spawn_lawyer_lookup(
    state: &AppState,
    session: SharedSession,
    pending: PendingTurn,
    query: LawyerQuery,
) -> JoinHandle<Result<(), ConversationError>> {
    let lookup = state.lawyers.clone();
    tokio::spawn(async move {
        let resolving = {
            let query = query.clone();
            tokio::spawn(async move { lookup.resolve(&query).await })
        };
        let outcome = match resolving.await {
            Ok(outcome) => {
                tracing::debug!(source = ?outcome.source, "lawyer lookup resolved");
                outcome
            }
            Err(e) => {
                tracing::warn!("lawyer lookup task failed: {e}");
                LookupOutcome::not_found()
            }
        };
        let reply = outcome.reply(&query);
        let mut session = session.lock().await;
        session.engine.complete_external(pending, reply)?;
        Ok(())
    })
}

/// Save SOS contacts and attribute complaint drafts for the signed-in user.
async fn record_side_effects(
    state: &AppState,
    user: &UserId,
    modal: &FeatureModal,
    today: chrono::NaiveDate,
) -> Result<(), ApiError> {
    if let Some(contacts) = modal.sos_contacts() {
        state
            .profiles
            .save_sos_contacts(user, contacts.clone())
            .await
            .map_err(profile_error)?;
    }
    if let Some(record) = modal.complaint_record(today) {
        state.complaints.add(user, record);
    }
    Ok(())
}

/// Sign-in notification from the identity backend.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    /// Opaque user id.
    pub uid: String,
}

/// Attach a signed-in user to the session.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionView>, ApiError> {
    if request.uid.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "uid is required".to_string()));
    }
    let session = find_session(&state, id)?;
    let session = session.lock().await;
    session.context.sign_in(UserId::new(request.uid));
    Ok(Json(SessionView::of(id, &session)))
}

/// Detach the signed-in user.
async fn sign_out(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let session = find_session(&state, id)?;
    let session = session.lock().await;
    session.context.sign_out();
    Ok(Json(SessionView::of(id, &session)))
}

/// History query parameters.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// User whose complaints to list.
    pub uid: Option<String>,
}

/// Complaint history of a user; empty for unknown or missing ids.
async fn complaint_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<ComplaintRecord>> {
    let history = params
        .uid
        .filter(|uid| !uid.is_empty())
        .map(|uid| state.complaints.for_user(&UserId::new(uid)))
        .unwrap_or_default();
    Json(history)
}

fn profile_error(e: ProfileError) -> ApiError {
    let status = match e {
        ProfileError::Invalid(_) => StatusCode::BAD_REQUEST,
        ProfileError::Backend(_) => StatusCode::BAD_GATEWAY,
    };
    (status, e.to_string())
}

/// Read a profile document; `null` when absent.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<Option<Profile>>, ApiError> {
    let profile = state
        .profiles
        .profile(&UserId::new(uid))
        .await
        .map_err(profile_error)?;
    Ok(Json(profile))
}

/// Replace a profile document.
async fn put_profile(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(profile): Json<Profile>,
) -> Result<StatusCode, ApiError> {
    state
        .profiles
        .save_profile(&UserId::new(uid), profile)
        .await
        .map_err(profile_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Read SOS contacts; `null` when absent.
async fn get_sos_contacts(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<Option<SosContacts>>, ApiError> {
    let contacts = state
        .profiles
        .sos_contacts(&UserId::new(uid))
        .await
        .map_err(profile_error)?;
    Ok(Json(contacts))
}

/// Replace SOS contacts.
async fn put_sos_contacts(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(contacts): Json<SosContacts>,
) -> Result<StatusCode, ApiError> {
    state
        .profiles
        .save_sos_contacts(&UserId::new(uid), contacts)
        .await
        .map_err(profile_error)?;
    Ok(StatusCode::NO_CONTENT)
}

fn queue_client(state: &AppState) -> Result<&crate::queue::PriorityQueueClient, ApiError> {
    state.queue.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Priority queue service is not configured".to_string(),
        )
    })
}

fn queue_error(e: crate::queue::QueueError) -> ApiError {
    (StatusCode::BAD_GATEWAY, format!("Queue error: {e}"))
}

/// List the queue.
async fn queue_all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    let items = queue_client(&state)?.all().await.map_err(queue_error)?;
    Ok(Json(items))
}

/// Add a plain-text item to the queue.
async fn queue_add(State(state): State<Arc<AppState>>, body: String) -> Result<StatusCode, ApiError> {
    let added = queue_client(&state)?.add(&body).await.map_err(queue_error)?;
    Ok(if added {
        StatusCode::CREATED
    } else {
        StatusCode::NO_CONTENT
    })
}

/// Remove the highest-priority item.
async fn queue_poll(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    queue_client(&state)?.poll().await.map_err(queue_error)
}

/// Placeholder assistant request.
#[derive(Debug, Deserialize)]
pub struct PlaceholderRequest {
    /// Prompt text.
    pub prompt: Option<String>,
}

/// Static placeholder reply standing in for a reasoning service.
async fn placeholder_reply(
    Json(request): Json<PlaceholderRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let Some(prompt) = request.prompt.filter(|p| !p.is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Prompt is required" })),
        ));
    };

    Ok(Json(serde_json::json!({
        "response": format!("You asked: \"{prompt}\". [This is a static placeholder reply.]")
    })))
}
