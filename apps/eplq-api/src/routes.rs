use axum::{
	Json, Router,
	extract::{Path, State, rejection::JsonRejection},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use eplq_domain::poi::PoiInput;
use eplq_service::{
	BatchUploadRequest, BatchUploadResponse, DeleteRequest, DeleteResponse, DetailsRequest,
	Error, ListRequest, ListResponse, PoiDetails, SearchRequest, SearchResponse, UpdateRequest,
	UpdateResponse, UploadRequest, UploadResponse,
};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/pois", post(upload).get(list))
		.route("/v1/pois/batch", post(upload_batch))
		.route("/v1/pois/{id}", get(details).put(update).delete(delete))
		.route("/v1/search", post(search))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
struct BatchBody {
	pois: Vec<PoiInput>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
	latitude: f64,
	longitude: f64,
	radius_km: f64,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn upload(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Result<Json<PoiInput>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
	let Json(poi) = body.map_err(|rejection| body_error(rejection, "invalid_request"))?;
	let (user_id, user_email) = identity(&headers)?;
	let response = state.service.upload(UploadRequest { user_id, user_email, poi }).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn upload_batch(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Result<Json<BatchBody>, JsonRejection>,
) -> Result<Json<BatchUploadResponse>, ApiError> {
	let Json(body) = body.map_err(|rejection| body_error(rejection, "invalid_request"))?;
	let (user_id, user_email) = identity(&headers)?;
	let response = state
		.service
		.upload_batch(BatchUploadRequest { user_id, user_email, pois: body.pois })
		.await?;

	Ok(Json(response))
}

async fn list(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ListResponse>, ApiError> {
	let (user_id, _) = identity(&headers)?;
	let response = state.service.list_uploads(ListRequest { user_id }).await?;

	Ok(Json(response))
}

async fn details(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<Uuid>,
) -> Result<Json<PoiDetails>, ApiError> {
	let response = state.service.details(DetailsRequest { id, user_id: user_id(&headers) }).await?;

	Ok(Json(response))
}

async fn update(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<Uuid>,
	body: Result<Json<PoiInput>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
	let Json(poi) = body.map_err(|rejection| body_error(rejection, "invalid_request"))?;
	let response =
		state.service.update(UpdateRequest { id, user_id: user_id(&headers), poi }).await?;

	Ok(Json(response))
}

async fn delete(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let response = state.service.delete(DeleteRequest { id, user_id: user_id(&headers) }).await?;

	Ok(Json(response))
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(body) = body.map_err(|rejection| body_error(rejection, "invalid_query"))?;
	let response = state
		.service
		.search(SearchRequest {
			latitude: body.latitude,
			longitude: body.longitude,
			radius_km: body.radius_km,
			user_id: user_id(&headers),
		})
		.await?;

	Ok(Json(response))
}

fn user_id(headers: &HeaderMap) -> Option<String> {
	header(headers, USER_ID_HEADER)
}

fn identity(headers: &HeaderMap) -> Result<(String, String), ApiError> {
	let Some(user_id) = header(headers, USER_ID_HEADER) else {
		return Err(missing_header(USER_ID_HEADER));
	};
	let Some(user_email) = header(headers, USER_EMAIL_HEADER) else {
		return Err(missing_header(USER_EMAIL_HEADER));
	};

	Ok((user_id, user_email))
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
	headers
		.get(name)
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.map(str::to_string)
}

fn missing_header(name: &str) -> ApiError {
	json_error(
		StatusCode::BAD_REQUEST,
		"invalid_request",
		format!("The {name} header is required."),
		Some(vec![name.to_string()]),
	)
}

fn body_error(rejection: JsonRejection, code: &str) -> ApiError {
	let status = match rejection {
		JsonRejection::MissingJsonContentType(_) => rejection.status(),
		_ => StatusCode::BAD_REQUEST,
	};
	let text = rejection.body_text();
	let fields = rejection_field(&text).map(|field| vec![field]);

	json_error(status, code, text, fields)
}

/// Field path named by a JSON body rejection, such as `latitude` or `pois[2].name`.
fn rejection_field(text: &str) -> Option<String> {
	let detail = text.split_once("target type: ").map_or(text, |(_, rest)| rest);

	if let Some((_, rest)) = detail.split_once("missing field `") {
		return rest.split_once('`').map(|(field, _)| field.to_string());
	}

	let (path, _) = detail.split_once(": ")?;

	(!path.is_empty() && path != "." && !path.contains(' ')).then(|| path.to_string())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::Validation { field, message } =>
				json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_failed", message, Some(vec![field])),
			Error::InvalidQuery { field, message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_query", message, Some(vec![field])),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			Error::Decryption { reason, .. } => json_error(
				StatusCode::UNPROCESSABLE_ENTITY,
				"decryption_failed",
				format!("The record could not be decrypted ({reason})."),
				None,
			),
			Error::Encryption { message } => {
				tracing::error!(%message, "Encryption failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"encryption_failed",
					"The record could not be encrypted.",
					None,
				)
			},
			Error::Storage { message } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message, None),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
