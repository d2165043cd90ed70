use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use crate::board::BoardView;
use crate::error::AppError;
use crate::models::*;
use crate::services::{ContactCard, Summary, ToggleOutcome, auth_service, contact_service, summary_service};
use crate::state::AppState;
use crate::store::Collection;

#[derive(Deserialize)]
struct BoardQueryParams {
    #[serde(default)]
    search: Option<String>,
}

#[derive(Deserialize)]
struct ContactQueryParams {
    /// Name of the logged-in user, added as a temporary contact if missing.
    #[serde(default)]
    user: Option<String>,
}

#[derive(Serialize)]
struct ToggleResponse {
    outcome: ToggleOutcome,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/board", get(show_board))
        .route("/board/drop", post(drop_task))
        .route("/tasks", post(create_task))
        .route("/tasks/{id}", put(update_task).delete(delete_task))
        .route("/tasks/{id}/drag", post(start_dragging))
        .route("/tasks/{id}/subtasks/toggle", post(toggle_subtask))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/{id}", put(update_contact).delete(delete_contact))
        .route("/login", post(log_in))
        .route("/login/guest", post(log_in_as_guest))
        .route("/signup", post(sign_up))
        .route("/summary", get(summary))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.fetch_all(Collection::Users).await?;
    Ok(StatusCode::OK)
}

async fn show_board(
    State(state): State<AppState>,
    Query(params): Query<BoardQueryParams>,
) -> Result<Json<BoardView>, AppError> {
    let view = state.board.board(params.search.as_deref()).await?;
    Ok(Json(view))
}

async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<NewTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = state.board.create_task(req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let task = state.board.update_task(id, req).await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, AppError> {
    state.board.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn start_dragging(State(state): State<AppState>, Path(id): Path<TaskId>) -> StatusCode {
    state.board.start_dragging(id).await;
    StatusCode::NO_CONTENT
}

async fn drop_task(
    State(state): State<AppState>,
    Json(req): Json<DropRequest>,
) -> Result<Json<Task>, AppError> {
    let task = state.board.move_to(req.status).await?;
    Ok(Json(task))
}

async fn toggle_subtask(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(req): Json<ToggleSubtaskRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let outcome = state
        .board
        .toggle_subtask(id, &req.text, req.from, req.to)
        .await?;
    Ok(Json(ToggleResponse { outcome }))
}

async fn list_contacts(
    State(state): State<AppState>,
    Query(params): Query<ContactQueryParams>,
) -> Result<Json<Vec<ContactCard>>, AppError> {
    let contacts = contact_service::list_contacts(state.store.as_ref()).await?;
    let contacts = contact_service::ensure_current_user(contacts, params.user.as_deref());
    Ok(Json(contacts.into_iter().map(ContactCard::from).collect()))
}

async fn create_contact(
    State(state): State<AppState>,
    Json(req): Json<NewContactRequest>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let contact = contact_service::create_contact(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewContactRequest>,
) -> Result<Json<Contact>, AppError> {
    let contact = contact_service::update_contact(state.store.as_ref(), &id, req).await?;
    Ok(Json(contact))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    contact_service::delete_contact(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn log_in(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = auth_service::log_in(state.store.as_ref(), &req).await?;
    Ok(Json(response))
}

async fn log_in_as_guest() -> Json<LoginResponse> {
    Json(auth_service::log_in_as_guest())
}

async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let contact = auth_service::sign_up(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn summary(State(state): State<AppState>) -> Result<Json<Summary>, AppError> {
    let summary = summary_service::load_summary(state.store.as_ref()).await?;
    Ok(Json(summary))
}
