use axum::Json;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{Course, CourseDraft};
use crate::services::CommitOutcome;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/courses", get(list_courses).post(create_course))
        .route("/api/generate", post(generate_courses))
        .route("/api/preview", get(current_preview).delete(discard_preview))
        .route("/api/preview/commit", post(commit_preview))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let workflow = state.workflow.lock().await;
    Ok(Json(workflow.catalog().to_vec()))
}

async fn create_course(
    State(state): State<AppState>,
    Json(draft): Json<CourseDraft>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let mut workflow = state.workflow.lock().await;
    let course = workflow.add_course(draft).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn generate_courses(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Vec<CourseDraft>>, AppError> {
    let mut workflow = state.workflow.lock().await;
    let batch = workflow.generate_preview(&req.prompt).await?;
    Ok(Json(batch.to_vec()))
}

async fn current_preview(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseDraft>>, AppError> {
    let workflow = state.workflow.lock().await;
    Ok(Json(workflow.preview().to_vec()))
}

async fn commit_preview(
    State(state): State<AppState>,
) -> Result<Json<CommitOutcome>, AppError> {
    let mut workflow = state.workflow.lock().await;
    let outcome = workflow.commit_preview().await?;
    Ok(Json(outcome))
}

async fn discard_preview(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let mut workflow = state.workflow.lock().await;
    workflow.discard_preview();
    Ok(StatusCode::NO_CONTENT)
}
