//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! orchestrator, store, and catalog view model; every error becomes a JSON
//! body with a user-facing message and an appropriate status code.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, instrument};

use crate::catalog::build_catalog;
use crate::error::{GenerateError, StoreError};
use crate::protocol::*;
use crate::state::AppState;

/// Route-level error: wraps the domain taxonomy and maps it onto HTTP.
#[derive(Debug)]
pub enum ApiError {
    Generate(GenerateError),
    List(StoreError),
    Delete(StoreError),
    Busy,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Generate(e) => (generate_status(&e), e.to_string()),
            ApiError::List(e) => {
                error!(target: "exogen_backend", error = %e, "Listing exercises failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Erreur lors du chargement des exercices.".to_string(),
                )
            }
            ApiError::Delete(e) => {
                error!(target: "exogen_backend", error = %e, "Deleting exercise failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Erreur lors de la suppression de l'exercice.".to_string(),
                )
            }
            ApiError::Busy => (
                StatusCode::CONFLICT,
                "Une génération est déjà en cours.".to_string(),
            ),
        };
        (status, Json(ErrorOut { message })).into_response()
    }
}

fn generate_status(e: &GenerateError) -> StatusCode {
    match e {
        GenerateError::EmptyTopic => StatusCode::BAD_REQUEST,
        GenerateError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        GenerateError::NoExercisesFound => StatusCode::UNPROCESSABLE_ENTITY,
        GenerateError::Auth
        | GenerateError::Network(_)
        | GenerateError::UnexpectedResponse { .. } => StatusCode::BAD_GATEWAY,
    }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
    Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state), fields(category = %q.category.clone().unwrap_or_default()))]
pub async fn http_list_exercises(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CatalogQuery>,
) -> Result<Json<CatalogOut>, ApiError> {
    let list = state.store.list().await.map_err(ApiError::List)?;
    // An empty string means "all categories", same as no filter at all.
    let filter = q.category.as_deref().filter(|c| !c.is_empty());
    let view = build_catalog(list, filter);
    info!(target: "exogen_backend", shown = view.exercises.len(), categories = view.categories.len(), "Catalog served");
    Ok(Json(CatalogOut {
        exercises: view.exercises.iter().map(to_out).collect(),
        categories: view.categories,
    }))
}

#[instrument(level = "info", skip(state, body), fields(subject_len = body.subject.len()))]
pub async fn http_generate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateIn>,
) -> Result<Json<GenerateOut>, ApiError> {
    // One generation sequence at a time; concurrent submissions get 409
    // instead of queueing behind an unbounded lock.
    let _gate = state
        .generation_gate
        .try_lock()
        .map_err(|_| ApiError::Busy)?;

    let report = state
        .orchestrator
        .generate(&body.subject)
        .await
        .map_err(ApiError::Generate)?;

    info!(target: "generation", saved = report.saved.len(), failed = report.failed, "HTTP generate finished");
    Ok(Json(GenerateOut {
        exercises: report.saved.iter().map(to_out).collect(),
        attempted: report.attempted,
        failed: report.failed,
        error: report.error,
    }))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedOut>, ApiError> {
    state.store.delete(id).await.map_err(ApiError::Delete)?;
    info!(target: "exogen_backend", %id, "HTTP delete finished");
    Ok(Json(DeletedOut { ok: true }))
}
