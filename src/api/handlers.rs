//! HTTP request handlers for the coverage and time-accounting API.
//!
//! Every route is scoped under `/:clinic`; the clinic id is an opaque path
//! segment that flows into every core operation. Each handler tags its log
//! lines with a per-request correlation id.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{attendance, coverage, leave, payroll};

use super::request::{
    AssignRequest, BulkStatusRequest, ClockRequest, CoverRequest, CreateBlockRequest,
    CreateLeaveRequest, CreateStaffRequest, ExportQuery, ListBlocksQuery, ListLeaveQuery,
    ListPayrollQuery, ReviewLeaveRequest, SetStatusRequest, SummaryQuery, UpdateBlockRequest,
    UpsertPayrollRequest,
};
use super::response::{ApiError, ApiErrorResponse, BulkStatusResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/:clinic/staff",
            get(list_staff_handler).post(create_staff_handler),
        )
        .route(
            "/:clinic/schedule-blocks",
            get(list_blocks_handler).post(create_block_handler),
        )
        .route(
            "/:clinic/schedule-blocks/:id",
            put(update_block_handler).delete(delete_block_handler),
        )
        .route("/:clinic/schedule-blocks/:id/assign", put(assign_handler))
        .route("/:clinic/schedule-blocks/:id/locum", put(locum_handler))
        .route("/:clinic/attendance/clock-in", post(clock_in_handler))
        .route("/:clinic/attendance/clock-out", post(clock_out_handler))
        .route("/:clinic/attendance/summary", get(summary_handler))
        .route("/:clinic/attendance/export", get(export_handler))
        .route(
            "/:clinic/leave",
            get(list_leave_handler).post(create_leave_handler),
        )
        .route(
            "/:clinic/leave/:id",
            patch(review_leave_handler).delete(delete_leave_handler),
        )
        .route(
            "/:clinic/payroll",
            get(list_payroll_handler).post(upsert_payroll_handler),
        )
        .route("/:clinic/payroll/bulk-status", put(bulk_status_handler))
        .route("/:clinic/payroll/:key/status", put(set_status_handler))
        .with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into a 400 response.
fn parse_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries the detailed serde error.
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") || body_text.contains("unknown field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err((StatusCode::BAD_REQUEST, Json(error)).into_response())
        }
    }
}

/// Unwraps a query string, turning extractor rejections into a 400 response.
fn parse_query<T>(
    query: Result<Query<T>, QueryRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    match query {
        Ok(Query(value)) => Ok(value),
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Query string error"
            );
            let error = ApiError::validation_error(rejection.body_text());
            Err((StatusCode::BAD_REQUEST, Json(error)).into_response())
        }
    }
}

/// Logs a failed core operation and renders it as an error response.
fn core_failure(correlation_id: Uuid, operation: &str, err: crate::error::CoreError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        operation = operation,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    api_error.into_response()
}

async fn list_staff_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
) -> Response {
    let staff = state.store().list_staff(&clinic).await;
    (StatusCode::OK, Json(staff)).into_response()
}

async fn create_staff_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    payload: Result<Json<CreateStaffRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let staff = match request.into_staff(&clinic) {
        Ok(staff) => staff,
        Err(err) => return core_failure(correlation_id, "create_staff", err),
    };
    match state.store().insert_staff(staff).await {
        Ok(staff) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                staff_id = %staff.id,
                "Staff member created"
            );
            (StatusCode::CREATED, Json(staff)).into_response()
        }
        Err(err) => core_failure(correlation_id, "create_staff", err),
    }
}

async fn list_blocks_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    query: Result<Query<ListBlocksQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(query, correlation_id) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let blocks = coverage::list_blocks(state.store(), &clinic, &query.into()).await;
    (StatusCode::OK, Json(blocks)).into_response()
}

async fn create_block_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    payload: Result<Json<CreateBlockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match coverage::create_block(state.store(), &clinic, request.into()).await {
        Ok(block) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                block_id = %block.id,
                date = %block.date,
                "Schedule block created"
            );
            (StatusCode::CREATED, Json(block)).into_response()
        }
        Err(err) => core_failure(correlation_id, "create_block", err),
    }
}

async fn update_block_handler(
    State(state): State<AppState>,
    Path((clinic, block_id)): Path<(String, Uuid)>,
    payload: Result<Json<UpdateBlockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match coverage::update_block(state.store(), &clinic, block_id, request.into()).await {
        Ok(block) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                block_id = %block_id,
                date = %block.date,
                "Schedule block updated"
            );
            (StatusCode::OK, Json(block)).into_response()
        }
        Err(err) => core_failure(correlation_id, "update_block", err),
    }
}

async fn delete_block_handler(
    State(state): State<AppState>,
    Path((clinic, block_id)): Path<(String, Uuid)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match coverage::delete_block(state.store(), &clinic, block_id).await {
        Ok(()) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                block_id = %block_id,
                "Schedule block deleted"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => core_failure(correlation_id, "delete_block", err),
    }
}

async fn assign_handler(
    State(state): State<AppState>,
    Path((clinic, block_id)): Path<(String, Uuid)>,
    payload: Result<Json<AssignRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match coverage::assign_staff(
        state.store(),
        state.policy(),
        &clinic,
        block_id,
        request.staff_id,
        request.action,
    )
    .await
    {
        Ok(block) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                block_id = %block_id,
                staff_id = %request.staff_id,
                fill_count = block.fill_count(),
                "Assignment updated"
            );
            (StatusCode::OK, Json(block)).into_response()
        }
        Err(err) => core_failure(correlation_id, "assign_staff", err),
    }
}

async fn locum_handler(
    State(state): State<AppState>,
    Path((clinic, block_id)): Path<(String, Uuid)>,
    payload: Result<Json<CoverRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let action = match request.into_action() {
        Ok(action) => action,
        Err(err) => return core_failure(correlation_id, "cover_block", err),
    };
    match coverage::cover_block(state.store(), state.policy(), &clinic, block_id, action).await {
        Ok(block) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                block_id = %block_id,
                fill_count = block.fill_count(),
                "Locum cover updated"
            );
            (StatusCode::OK, Json(block)).into_response()
        }
        Err(err) => core_failure(correlation_id, "cover_block", err),
    }
}

async fn clock_in_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match attendance::clock_in(state.store(), &clinic, request.staff_id, request.at).await {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                staff_id = %request.staff_id,
                date = %record.date,
                "Clock-in recorded"
            );
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(err) => core_failure(correlation_id, "clock_in", err),
    }
}

async fn clock_out_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match attendance::clock_out(
        state.store(),
        &state.policy().attendance,
        &clinic,
        request.staff_id,
        request.at,
    )
    .await
    {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                staff_id = %request.staff_id,
                date = %record.date,
                status = ?record.status,
                "Clock-out recorded"
            );
            (StatusCode::OK, Json(record)).into_response()
        }
        Err(err) => core_failure(correlation_id, "clock_out", err),
    }
}

async fn summary_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(query, correlation_id) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let summaries =
        attendance::summarize(state.store(), &clinic, query.from, query.to, query.staff_id).await;
    (StatusCode::OK, Json(summaries)).into_response()
}

async fn export_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(query, correlation_id) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match attendance::export_csv(state.store(), &clinic, query.from, query.to).await {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            csv,
        )
            .into_response(),
        Err(err) => core_failure(correlation_id, "export_csv", err),
    }
}

async fn list_leave_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    query: Result<Query<ListLeaveQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(query, correlation_id) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let requests =
        leave::list_requests(state.store(), &clinic, query.status, query.staff_id).await;
    (StatusCode::OK, Json(requests)).into_response()
}

async fn create_leave_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    payload: Result<Json<CreateLeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match leave::create_request(state.store(), &state.policy().leave, &clinic, request.into()).await
    {
        Ok(created) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                request_id = %created.id,
                days_count = created.days_count,
                "Leave request created"
            );
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(err) => core_failure(correlation_id, "create_leave", err),
    }
}

async fn review_leave_handler(
    State(state): State<AppState>,
    Path((clinic, request_id)): Path<(String, Uuid)>,
    payload: Result<Json<ReviewLeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let action = match request.into_action() {
        Ok(action) => action,
        Err(err) => return core_failure(correlation_id, "review_leave", err),
    };
    match leave::review(state.store(), &clinic, request_id, action).await {
        Ok(reviewed) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                request_id = %request_id,
                status = ?reviewed.status,
                "Leave request reviewed"
            );
            (StatusCode::OK, Json(reviewed)).into_response()
        }
        Err(err) => core_failure(correlation_id, "review_leave", err),
    }
}

async fn delete_leave_handler(
    State(state): State<AppState>,
    Path((clinic, request_id)): Path<(String, Uuid)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match leave::delete_request(state.store(), &clinic, request_id).await {
        Ok(()) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                request_id = %request_id,
                "Leave request deleted"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => core_failure(correlation_id, "delete_leave", err),
    }
}

async fn list_payroll_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    query: Result<Query<ListPayrollQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(query, correlation_id) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let entries = payroll::list_entries(state.store(), &clinic, query.status).await;
    (StatusCode::OK, Json(entries)).into_response()
}

async fn upsert_payroll_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    payload: Result<Json<UpsertPayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match payroll::upsert_entry(state.store(), &clinic, request.into()).await {
        Ok(entry) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                payroll_key = %entry.payroll_key,
                amount = %entry.amount,
                "Payroll entry upserted"
            );
            (StatusCode::OK, Json(entry)).into_response()
        }
        Err(err) => core_failure(correlation_id, "upsert_payroll", err),
    }
}

async fn set_status_handler(
    State(state): State<AppState>,
    Path((clinic, payroll_key)): Path<(String, String)>,
    payload: Result<Json<SetStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match payroll::set_status(state.store(), &clinic, &payroll_key, request.status).await {
        Ok(entry) => {
            info!(
                correlation_id = %correlation_id,
                clinic = %clinic,
                payroll_key = %payroll_key,
                status = ?entry.status,
                "Payroll status advanced"
            );
            (StatusCode::OK, Json(entry)).into_response()
        }
        Err(err) => core_failure(correlation_id, "set_payroll_status", err),
    }
}

async fn bulk_status_handler(
    State(state): State<AppState>,
    Path(clinic): Path<String>,
    payload: Result<Json<BulkStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let affected = payroll::bulk_set_status(
        state.store(),
        &clinic,
        &request.payroll_keys,
        request.status,
    )
    .await;
    info!(
        correlation_id = %correlation_id,
        clinic = %clinic,
        requested = request.payroll_keys.len(),
        affected = affected,
        status = ?request.status,
        "Bulk payroll status applied"
    );
    (StatusCode::OK, Json(BulkStatusResponse { affected })).into_response()
}
