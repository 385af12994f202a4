// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
// Handlers stay async for axum even though the persistence adapter is
// synchronous and nothing awaits.
#![allow(clippy::multiple_crate_versions, clippy::unused_async)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use gradetrack::EnrollmentPolicy;
use gradetrack_api::{
    ApiError, CountResponse, CreateGradeRequest, DeleteGradeResponse, EndEnrollmentRequest,
    EnrollStudentRequest, EnrollmentCheckResponse, EnrollmentListResponse, EnrollmentResponse,
    GradeExistsResponse, GradeListResponse, GradeResponse, GraduateStudentRequest,
    RemoveEnrollmentResponse, SetGradeActiveResponse, TransferStudentRequest, UpdateGradeRequest,
    handlers,
};
use gradetrack_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// GradeTrack Server - HTTP server for the student enrollment service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer backing the grade catalog and enrollment store.
    persistence: Arc<Persistence>,
    /// The enrollment policy engine.
    policy: Arc<EnrollmentPolicy>,
}

/// Query parameters for the active-on-date endpoint.
#[derive(Debug, Deserialize)]
struct DateQuery {
    /// The instant to evaluate (RFC 3339).
    date: String,
}

/// Query parameters for the student date-range endpoint.
#[derive(Debug, Deserialize)]
struct DateRangeQuery {
    /// The range start (RFC 3339).
    start_date: String,
    /// The range end (RFC 3339).
    end_date: String,
}

/// Query parameters for the enrollment-status endpoint.
#[derive(Debug, Deserialize)]
struct EnrollmentStatusQuery {
    /// When present, checks enrollment in this specific grade.
    grade_id: Option<i64>,
}

/// Query parameters for the grade-by-name endpoint.
#[derive(Debug, Deserialize)]
struct GradeNameQuery {
    /// The grade name to look up.
    name: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::Conflict { .. } => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal API error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

// ============================================================================
// Enrollment lifecycle endpoints
// ============================================================================

/// Handler for POST `/enrollments` endpoint.
///
/// Enrolls a student into a grade.
async fn handle_enroll_student(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<EnrollStudentRequest>,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    let response: EnrollmentResponse =
        handlers::enroll_student(&app_state.persistence, &app_state.policy, &req)?;
    Ok(Json(response))
}

/// Handler for POST `/enrollments/transfer` endpoint.
///
/// Transfers a student between grades.
async fn handle_transfer_student(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<TransferStudentRequest>,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    let response: EnrollmentResponse =
        handlers::transfer_student(&app_state.persistence, &app_state.policy, &req)?;
    Ok(Json(response))
}

/// Handler for POST `/enrollments/end` endpoint.
///
/// Ends a student's active enrollment in a grade.
async fn handle_end_enrollment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<EndEnrollmentRequest>,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    let response: EnrollmentResponse =
        handlers::end_enrollment(&app_state.persistence, &app_state.policy, &req)?;
    Ok(Json(response))
}

/// Handler for POST `/enrollments/graduate` endpoint.
///
/// Graduates a student from their current grade.
async fn handle_graduate_student(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<GraduateStudentRequest>,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    let response: EnrollmentResponse =
        handlers::graduate_student(&app_state.persistence, &app_state.policy, &req)?;
    Ok(Json(response))
}

/// Handler for DELETE `/enrollments/{enrollment_id}` endpoint.
///
/// Permanently removes an ended enrollment record.
async fn handle_remove_enrollment(
    AxumState(app_state): AxumState<AppState>,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<RemoveEnrollmentResponse>, HttpError> {
    let response: RemoveEnrollmentResponse =
        handlers::remove_enrollment(&app_state.persistence, &app_state.policy, enrollment_id)?;
    Ok(Json(response))
}

// ============================================================================
// Enrollment query endpoints
// ============================================================================

/// Handler for GET `/enrollments/{enrollment_id}` endpoint.
async fn handle_get_enrollment(
    AxumState(app_state): AxumState<AppState>,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    let response: EnrollmentResponse =
        handlers::get_enrollment(&app_state.persistence, enrollment_id)?;
    Ok(Json(response))
}

/// Handler for GET `/enrollments/active` endpoint.
async fn handle_list_all_active_enrollments(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<EnrollmentListResponse>, HttpError> {
    let response: EnrollmentListResponse =
        handlers::list_all_active_enrollments(&app_state.persistence)?;
    Ok(Json(response))
}

/// Handler for GET `/enrollments/active_on_date` endpoint.
async fn handle_list_enrollments_active_on_date(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<DateQuery>,
) -> Result<Json<EnrollmentListResponse>, HttpError> {
    let response: EnrollmentListResponse =
        handlers::list_enrollments_active_on_date(&app_state.persistence, &params.date)?;
    Ok(Json(response))
}

/// Handler for GET `/students/{student_id}/enrollments` endpoint.
async fn handle_list_enrollments_by_student(
    AxumState(app_state): AxumState<AppState>,
    Path(student_id): Path<i64>,
) -> Result<Json<EnrollmentListResponse>, HttpError> {
    let response: EnrollmentListResponse =
        handlers::list_enrollments_by_student(&app_state.persistence, student_id)?;
    Ok(Json(response))
}

/// Handler for GET `/students/{student_id}/enrollments/current` endpoint.
async fn handle_get_current_enrollment(
    AxumState(app_state): AxumState<AppState>,
    Path(student_id): Path<i64>,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    let response: EnrollmentResponse =
        handlers::get_current_enrollment(&app_state.persistence, student_id)?;
    Ok(Json(response))
}

/// Handler for GET `/students/{student_id}/enrollments/count` endpoint.
async fn handle_count_enrollments_for_student(
    AxumState(app_state): AxumState<AppState>,
    Path(student_id): Path<i64>,
) -> Result<Json<CountResponse>, HttpError> {
    let response: CountResponse =
        handlers::count_enrollments_for_student(&app_state.persistence, student_id)?;
    Ok(Json(response))
}

/// Handler for GET `/students/{student_id}/enrollments/range` endpoint.
async fn handle_list_enrollments_in_date_range(
    AxumState(app_state): AxumState<AppState>,
    Path(student_id): Path<i64>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<EnrollmentListResponse>, HttpError> {
    let response: EnrollmentListResponse = handlers::list_enrollments_in_date_range(
        &app_state.persistence,
        student_id,
        &params.start_date,
        &params.end_date,
    )?;
    Ok(Json(response))
}

/// Handler for GET `/students/{student_id}/enrollment_status` endpoint.
///
/// With a `grade_id` query parameter, checks enrollment in that grade;
/// without one, checks for any active enrollment.
async fn handle_enrollment_status(
    AxumState(app_state): AxumState<AppState>,
    Path(student_id): Path<i64>,
    Query(params): Query<EnrollmentStatusQuery>,
) -> Result<Json<EnrollmentCheckResponse>, HttpError> {
    let response: EnrollmentCheckResponse = match params.grade_id {
        Some(grade_id) => {
            handlers::check_enrolled_in_grade(&app_state.persistence, student_id, grade_id)?
        }
        None => handlers::check_has_active_enrollment(&app_state.persistence, student_id)?,
    };
    Ok(Json(response))
}

/// Handler for GET `/grades/{grade_id}/enrollments` endpoint.
async fn handle_list_enrollments_by_grade(
    AxumState(app_state): AxumState<AppState>,
    Path(grade_id): Path<i64>,
) -> Result<Json<EnrollmentListResponse>, HttpError> {
    let response: EnrollmentListResponse =
        handlers::list_enrollments_by_grade(&app_state.persistence, grade_id)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/{grade_id}/enrollments/active` endpoint.
async fn handle_list_active_enrollments_by_grade(
    AxumState(app_state): AxumState<AppState>,
    Path(grade_id): Path<i64>,
) -> Result<Json<EnrollmentListResponse>, HttpError> {
    let response: EnrollmentListResponse =
        handlers::list_active_enrollments_by_grade(&app_state.persistence, grade_id)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/{grade_id}/enrollments/active/count` endpoint.
async fn handle_count_active_enrollments_for_grade(
    AxumState(app_state): AxumState<AppState>,
    Path(grade_id): Path<i64>,
) -> Result<Json<CountResponse>, HttpError> {
    let response: CountResponse =
        handlers::count_active_enrollments_for_grade(&app_state.persistence, grade_id)?;
    Ok(Json(response))
}

// ============================================================================
// Grade catalog endpoints
// ============================================================================

/// Handler for POST `/grades` endpoint.
async fn handle_create_grade(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateGradeRequest>,
) -> Result<Json<GradeResponse>, HttpError> {
    let response: GradeResponse = handlers::create_grade(&app_state.persistence, &req)?;
    Ok(Json(response))
}

/// Handler for GET `/grades` endpoint.
async fn handle_list_all_grades(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<GradeListResponse>, HttpError> {
    let response: GradeListResponse = handlers::list_all_grades(&app_state.persistence)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/active` endpoint.
async fn handle_list_active_grades(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<GradeListResponse>, HttpError> {
    let response: GradeListResponse = handlers::list_active_grades(&app_state.persistence)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/inactive` endpoint.
async fn handle_list_inactive_grades(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<GradeListResponse>, HttpError> {
    let response: GradeListResponse = handlers::list_inactive_grades(&app_state.persistence)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/exists/{grade_id}` endpoint.
async fn handle_check_grade_exists(
    AxumState(app_state): AxumState<AppState>,
    Path(grade_id): Path<i64>,
) -> Result<Json<GradeExistsResponse>, HttpError> {
    let response: GradeExistsResponse =
        handlers::check_grade_exists(&app_state.persistence, grade_id)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/exists/name/{name}` endpoint.
async fn handle_check_grade_exists_by_name(
    AxumState(app_state): AxumState<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GradeExistsResponse>, HttpError> {
    let response: GradeExistsResponse =
        handlers::check_grade_exists_by_name(&app_state.persistence, &name)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/exists/level/{level}` endpoint.
async fn handle_check_grade_exists_by_level(
    AxumState(app_state): AxumState<AppState>,
    Path(level): Path<u8>,
) -> Result<Json<GradeExistsResponse>, HttpError> {
    let response: GradeExistsResponse =
        handlers::check_grade_exists_by_level(&app_state.persistence, level)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/count` endpoint.
async fn handle_count_grades(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<CountResponse>, HttpError> {
    let response: CountResponse = handlers::count_grades(&app_state.persistence)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/active/count` endpoint.
async fn handle_count_active_grades(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<CountResponse>, HttpError> {
    let response: CountResponse = handlers::count_active_grades(&app_state.persistence)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/{grade_id}` endpoint.
async fn handle_get_grade(
    AxumState(app_state): AxumState<AppState>,
    Path(grade_id): Path<i64>,
) -> Result<Json<GradeResponse>, HttpError> {
    let response: GradeResponse = handlers::get_grade(&app_state.persistence, grade_id)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/by_name` endpoint.
async fn handle_find_grade_by_name(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<GradeNameQuery>,
) -> Result<Json<GradeResponse>, HttpError> {
    let response: GradeResponse =
        handlers::find_grade_by_name(&app_state.persistence, &params.name)?;
    Ok(Json(response))
}

/// Handler for GET `/grades/by_level/{level}` endpoint.
async fn handle_find_grade_by_level(
    AxumState(app_state): AxumState<AppState>,
    Path(level): Path<u8>,
) -> Result<Json<GradeResponse>, HttpError> {
    let response: GradeResponse = handlers::find_grade_by_level(&app_state.persistence, level)?;
    Ok(Json(response))
}

/// Handler for PUT `/grades/{grade_id}` endpoint.
async fn handle_update_grade(
    AxumState(app_state): AxumState<AppState>,
    Path(grade_id): Path<i64>,
    Json(req): Json<UpdateGradeRequest>,
) -> Result<Json<GradeResponse>, HttpError> {
    let response: GradeResponse = handlers::update_grade(&app_state.persistence, grade_id, &req)?;
    Ok(Json(response))
}

/// Handler for POST `/grades/{grade_id}/activate` endpoint.
async fn handle_activate_grade(
    AxumState(app_state): AxumState<AppState>,
    Path(grade_id): Path<i64>,
) -> Result<Json<SetGradeActiveResponse>, HttpError> {
    let response: SetGradeActiveResponse =
        handlers::activate_grade(&app_state.persistence, grade_id)?;
    Ok(Json(response))
}

/// Handler for POST `/grades/{grade_id}/deactivate` endpoint.
async fn handle_deactivate_grade(
    AxumState(app_state): AxumState<AppState>,
    Path(grade_id): Path<i64>,
) -> Result<Json<SetGradeActiveResponse>, HttpError> {
    let response: SetGradeActiveResponse =
        handlers::deactivate_grade(&app_state.persistence, grade_id)?;
    Ok(Json(response))
}

/// Handler for DELETE `/grades/{grade_id}` endpoint.
async fn handle_delete_grade(
    AxumState(app_state): AxumState<AppState>,
    Path(grade_id): Path<i64>,
) -> Result<Json<DeleteGradeResponse>, HttpError> {
    let response: DeleteGradeResponse = handlers::delete_grade(&app_state.persistence, grade_id)?;
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/enrollments", post(handle_enroll_student))
        .route("/enrollments/transfer", post(handle_transfer_student))
        .route("/enrollments/end", post(handle_end_enrollment))
        .route("/enrollments/graduate", post(handle_graduate_student))
        .route("/enrollments/active", get(handle_list_all_active_enrollments))
        .route(
            "/enrollments/active_on_date",
            get(handle_list_enrollments_active_on_date),
        )
        .route("/enrollments/{enrollment_id}", get(handle_get_enrollment))
        .route(
            "/enrollments/{enrollment_id}",
            delete(handle_remove_enrollment),
        )
        .route(
            "/students/{student_id}/enrollments",
            get(handle_list_enrollments_by_student),
        )
        .route(
            "/students/{student_id}/enrollments/current",
            get(handle_get_current_enrollment),
        )
        .route(
            "/students/{student_id}/enrollments/count",
            get(handle_count_enrollments_for_student),
        )
        .route(
            "/students/{student_id}/enrollments/range",
            get(handle_list_enrollments_in_date_range),
        )
        .route(
            "/students/{student_id}/enrollment_status",
            get(handle_enrollment_status),
        )
        .route(
            "/grades/{grade_id}/enrollments",
            get(handle_list_enrollments_by_grade),
        )
        .route(
            "/grades/{grade_id}/enrollments/active",
            get(handle_list_active_enrollments_by_grade),
        )
        .route(
            "/grades/{grade_id}/enrollments/active/count",
            get(handle_count_active_enrollments_for_grade),
        )
        .route("/grades", post(handle_create_grade))
        .route("/grades", get(handle_list_all_grades))
        .route("/grades/active", get(handle_list_active_grades))
        .route("/grades/inactive", get(handle_list_inactive_grades))
        .route("/grades/exists/{grade_id}", get(handle_check_grade_exists))
        .route(
            "/grades/exists/name/{name}",
            get(handle_check_grade_exists_by_name),
        )
        .route(
            "/grades/exists/level/{level}",
            get(handle_check_grade_exists_by_level),
        )
        .route("/grades/count", get(handle_count_grades))
        .route("/grades/active/count", get(handle_count_active_grades))
        .route("/grades/by_name", get(handle_find_grade_by_name))
        .route("/grades/by_level/{level}", get(handle_find_grade_by_level))
        .route("/grades/{grade_id}", get(handle_get_grade))
        .route("/grades/{grade_id}", put(handle_update_grade))
        .route("/grades/{grade_id}", delete(handle_delete_grade))
        .route("/grades/{grade_id}/activate", post(handle_activate_grade))
        .route(
            "/grades/{grade_id}/deactivate",
            post(handle_deactivate_grade),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing GradeTrack Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(persistence),
        policy: Arc::new(EnrollmentPolicy::new()),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
