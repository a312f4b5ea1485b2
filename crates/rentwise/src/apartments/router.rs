use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::domain::{ApartmentId, CostCategory, Direction, MoveInFee, PhotoId, ScalarField, UserId};
use super::repository::{ApartmentRepository, PhotoStore, PhotoUpload};
use super::service::{ComparisonService, ComparisonServiceError};
use crate::error::service_status;
use crate::import::{parse_model_reply, ImportedListing};

type SharedService<R, P> = Arc<ComparisonService<R, P>>;

/// Router exposing one owner's apartment list under `/api/v1/lists/:user_id`.
pub fn comparison_router<R, P>(service: SharedService<R, P>) -> Router
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/lists/:user_id",
            get(snapshot_handler::<R, P>).delete(clear_handler::<R, P>),
        )
        .route("/api/v1/lists/:user_id/report", get(report_handler::<R, P>))
        .route(
            "/api/v1/lists/:user_id/apartments",
            post(add_handler::<R, P>),
        )
        .route(
            "/api/v1/lists/:user_id/apartments/:apartment_id",
            delete(remove_handler::<R, P>),
        )
        .route(
            "/api/v1/lists/:user_id/apartments/:apartment_id/duplicate",
            post(duplicate_handler::<R, P>),
        )
        .route(
            "/api/v1/lists/:user_id/apartments/:apartment_id/move",
            post(reorder_handler::<R, P>),
        )
        .route(
            "/api/v1/lists/:user_id/apartments/:apartment_id/costs",
            put(set_cost_handler::<R, P>),
        )
        .route(
            "/api/v1/lists/:user_id/apartments/:apartment_id/move-in-fees",
            put(set_move_in_fee_handler::<R, P>),
        )
        .route(
            "/api/v1/lists/:user_id/apartments/:apartment_id/fields",
            put(set_field_handler::<R, P>),
        )
        .route(
            "/api/v1/lists/:user_id/apartments/:apartment_id/photos",
            post(upload_photo_handler::<R, P>),
        )
        .route(
            "/api/v1/lists/:user_id/apartments/:apartment_id/photos/:photo_id",
            delete(remove_photo_handler::<R, P>),
        )
        .route(
            "/api/v1/lists/:user_id/compare/:apartment_id",
            post(toggle_compare_handler::<R, P>),
        )
        .route("/api/v1/lists/:user_id/active", put(set_active_handler::<R, P>))
        .route("/api/v1/lists/:user_id/import", post(import_handler::<R, P>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveRequest {
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CostRequest {
    pub category: CostCategory,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveInFeeRequest {
    pub fee: MoveInFee,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldRequest {
    pub field: ScalarField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActiveRequest {
    pub apartment_id: Option<ApartmentId>,
}

/// Either the structured listing or the model's raw reply text.
#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    #[serde(default)]
    pub listing: Option<ImportedListing>,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub unit_index: usize,
    #[serde(default)]
    pub apartment_id: Option<ApartmentId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoRequest {
    pub file_name: String,
    pub content_type: String,
    pub data: String,
}

pub(crate) async fn snapshot_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(StatusCode::OK, service.snapshot(&UserId(user_id)))
}

pub(crate) async fn report_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(StatusCode::OK, service.report(&UserId(user_id)))
}

pub(crate) async fn add_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(StatusCode::CREATED, service.add(&UserId(user_id)))
}

pub(crate) async fn duplicate_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path((user_id, apartment_id)): Path<(String, String)>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(
        StatusCode::CREATED,
        service.duplicate(&UserId(user_id), &ApartmentId(apartment_id)),
    )
}

pub(crate) async fn remove_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path((user_id, apartment_id)): Path<(String, String)>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(
        StatusCode::OK,
        service.remove(&UserId(user_id), &ApartmentId(apartment_id)),
    )
}

pub(crate) async fn reorder_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path((user_id, apartment_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<MoveRequest>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(
        StatusCode::OK,
        service.reorder(
            &UserId(user_id),
            &ApartmentId(apartment_id),
            request.direction,
        ),
    )
}

pub(crate) async fn set_cost_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path((user_id, apartment_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<CostRequest>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(
        StatusCode::OK,
        service.set_cost(
            &UserId(user_id),
            &ApartmentId(apartment_id),
            request.category,
            request.value,
        ),
    )
}

pub(crate) async fn set_move_in_fee_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path((user_id, apartment_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<MoveInFeeRequest>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(
        StatusCode::OK,
        service.set_move_in_fee(
            &UserId(user_id),
            &ApartmentId(apartment_id),
            request.fee,
            request.value,
        ),
    )
}

pub(crate) async fn set_field_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path((user_id, apartment_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<FieldRequest>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(
        StatusCode::OK,
        service.set_scalar_field(
            &UserId(user_id),
            &ApartmentId(apartment_id),
            request.field,
            request.value,
        ),
    )
}

pub(crate) async fn toggle_compare_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path((user_id, apartment_id)): Path<(String, String)>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(
        StatusCode::OK,
        service.toggle_compare(&UserId(user_id), &ApartmentId(apartment_id)),
    )
}

pub(crate) async fn set_active_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<ActiveRequest>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(
        StatusCode::OK,
        service.set_active(&UserId(user_id), request.apartment_id.as_ref()),
    )
}

pub(crate) async fn clear_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(StatusCode::OK, service.clear_all(&UserId(user_id)))
}

pub(crate) async fn import_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<ImportRequest>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    let listing = match (request.listing, request.reply) {
        (Some(listing), _) => listing,
        (None, Some(reply)) => match parse_model_reply(&reply) {
            Ok(listing) => listing,
            Err(error) => return failure(StatusCode::BAD_REQUEST, error.to_string()),
        },
        (None, None) => {
            return failure(
                StatusCode::UNPROCESSABLE_ENTITY,
                "either listing or reply is required".to_string(),
            )
        }
    };

    let owner = UserId(user_id);
    debug!(%owner, unit_index = request.unit_index, "import requested");
    respond(
        StatusCode::OK,
        service.apply_listing(
            &owner,
            &listing,
            request.unit_index,
            request.apartment_id.as_ref(),
        ),
    )
}

pub(crate) async fn upload_photo_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path((user_id, apartment_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<PhotoRequest>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    let content_type = match request.content_type.parse::<mime::Mime>() {
        Ok(content_type) => content_type,
        Err(_) => {
            return failure(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("'{}' is not a media type", request.content_type),
            )
        }
    };

    let upload = PhotoUpload {
        file_name: request.file_name,
        content_type,
        data: request.data,
    };
    respond(
        StatusCode::CREATED,
        service.upload_photo(&UserId(user_id), &ApartmentId(apartment_id), upload),
    )
}

pub(crate) async fn remove_photo_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path((user_id, apartment_id, photo_id)): Path<(String, String, String)>,
) -> Response
where
    R: ApartmentRepository + 'static,
    P: PhotoStore + 'static,
{
    respond(
        StatusCode::OK,
        service.remove_photo(
            &UserId(user_id),
            &ApartmentId(apartment_id),
            &PhotoId(photo_id),
        ),
    )
}

fn respond<T: Serialize>(success: StatusCode, result: Result<T, ComparisonServiceError>) -> Response {
    match result {
        Ok(value) => (success, axum::Json(value)).into_response(),
        Err(error) => failure(service_status(&error), error.to_string()),
    }
}

fn failure(status: StatusCode, message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
