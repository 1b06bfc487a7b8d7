use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::data::{Dataset, GridSnapshot, LabUsage, RunReport, ScheduleRequest, SemesterId};
use crate::error::Error;
use crate::scheduler::LabScheduler;
use crate::store::{InMemoryStore, SchedulingStore};

pub struct AppState {
    pub scheduler: LabScheduler<InMemoryStore>,
    pub run_timeout: Duration,
}

pub enum ApiError {
    Scheduler(Error),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Scheduler(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Scheduler(e) => {
                let status = match e {
                    Error::RegistrationNotFound(_) | Error::SemesterNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    Error::GridDimensionMismatch { .. }
                    | Error::GridLabMismatch { .. }
                    | Error::InvalidSemester { .. }
                    | Error::InvalidTeaching { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    Error::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn schedule_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<RunReport>, ApiError> {
    // the run checks the deadline itself right before committing, so a 504
    // always means nothing was written
    let deadline = Instant::now().checked_add(state.run_timeout);
    let task =
        tokio::task::spawn_blocking(move || state.scheduler.run_with_deadline(&request, deadline));
    match task.await {
        Ok(report) => Ok(Json(report?)),
        Err(e) => {
            error!("Scheduling task failed: {e}");
            Err(ApiError::Internal(format!("Scheduling task failed: {e}")))
        }
    }
}

async fn lab_usages_handler(
    State(state): State<Arc<AppState>>,
    Path(semester_id): Path<SemesterId>,
) -> Result<Json<Vec<LabUsage>>, ApiError> {
    let store = state.scheduler.store();
    store.semester(semester_id)?;
    Ok(Json(store.lab_usages(semester_id)?))
}

async fn grid_handler(
    State(state): State<Arc<AppState>>,
    Path(semester_id): Path<SemesterId>,
) -> Result<Json<Option<GridSnapshot>>, ApiError> {
    let semester = state.scheduler.store().semester(semester_id)?;
    Ok(Json(semester.grid))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/lab-usage/schedule", post(schedule_handler))
        .route("/v1/semesters/:id/lab-usages", get(lab_usages_handler))
        .route("/v1/semesters/:id/grid", get(grid_handler))
        .with_state(state)
}

pub async fn run_server(config: &Config) -> Result<(), Error> {
    let dataset = match &config.data {
        Some(path) => Dataset::from_path(path)?,
        None => Dataset::default(),
    };
    let state = Arc::new(AppState {
        scheduler: LabScheduler::new(Arc::new(InMemoryStore::new(dataset))),
        run_timeout: config.run_timeout(),
    });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
