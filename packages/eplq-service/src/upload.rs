use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, PoiService, Result};
use eplq_domain::{
	audit::AuditEvent,
	geometry::Region,
	poi::{PoiDraft, PoiInput},
};
use eplq_storage::models::NewEncryptedRecord;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadRequest {
	pub user_id: String,
	pub user_email: String,
	pub poi: PoiInput,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
	pub id: Uuid,
	pub approximate_region: Region,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchUploadRequest {
	pub user_id: String,
	pub user_email: String,
	pub pois: Vec<PoiInput>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchUploadError {
	/// Zero-based row position in the request.
	pub index: usize,
	pub name: String,
	pub error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchUploadResponse {
	pub succeeded: usize,
	pub failed: usize,
	pub ids: Vec<Uuid>,
	pub errors: Vec<BatchUploadError>,
}

impl PoiService {
	pub async fn upload(&self, req: UploadRequest) -> Result<UploadResponse> {
		let user_id = crate::required("user_id", &req.user_id)?.to_string();
		let user_email = crate::required("user_email", &req.user_email)?.to_string();
		let name = req.poi.name.clone();

		match self.store_new(user_id.as_str(), user_email, req.poi).await {
			Ok(response) => {
				self.emit(
					AuditEvent::success("POI uploaded successfully")
						.with("poiId", response.id.to_string())
						.with("regionLat", response.approximate_region.lat)
						.with("regionLng", response.approximate_region.lng),
					Some(user_id.as_str()),
				);

				Ok(response)
			},
			Err(err) => {
				self.emit(
					AuditEvent::error("POI upload failed")
						.with("name", name)
						.with("error", err.to_string()),
					Some(user_id.as_str()),
				);

				Err(err)
			},
		}
	}

	/// Uploads each row independently. A failing row is reported and does not stop the rest.
	pub async fn upload_batch(&self, req: BatchUploadRequest) -> Result<BatchUploadResponse> {
		let user_id = crate::required("user_id", &req.user_id)?.to_string();
		let user_email = crate::required("user_email", &req.user_email)?.to_string();
		let mut ids = Vec::with_capacity(req.pois.len());
		let mut errors = Vec::new();

		for (index, poi) in req.pois.into_iter().enumerate() {
			let name = poi.name.clone();
			let upload = UploadRequest {
				user_id: user_id.clone(),
				user_email: user_email.clone(),
				poi,
			};

			match self.upload(upload).await {
				Ok(response) => ids.push(response.id),
				Err(err) => errors.push(BatchUploadError { index, name, error: err.to_string() }),
			}
		}

		let response = BatchUploadResponse { succeeded: ids.len(), failed: errors.len(), ids, errors };

		self.emit(
			AuditEvent::info("Bulk POI upload completed")
				.with("successCount", response.succeeded)
				.with("errorCount", response.failed),
			Some(user_id.as_str()),
		);

		Ok(response)
	}

	async fn store_new(
		&self,
		user_id: &str,
		user_email: String,
		poi: PoiInput,
	) -> Result<UploadResponse> {
		let draft = PoiDraft::new(poi)?;
		let now = OffsetDateTime::now_utc();
		let encrypted_data = self.codec.seal_poi(&draft.stamp(now))?;
		let approximate_region = draft.region();
		let id = self
			.store
			.insert(NewEncryptedRecord {
				encrypted_data,
				approximate_region,
				uploaded_by: user_id.to_string(),
				uploaded_by_email: user_email,
				uploaded_at: now,
			})
			.await
			.map_err(Error::from)?;

		tracing::info!(poi_id = %id, "POI stored.");

		Ok(UploadResponse { id, approximate_region })
	}
}
