use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{PoiService, Result};
use eplq_domain::{
	audit::AuditEvent,
	geometry::Region,
	poi::{PoiDraft, PoiInput},
};
use eplq_storage::models::RecordUpdate;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateRequest {
	pub id: Uuid,
	#[serde(default)]
	pub user_id: Option<String>,
	pub poi: PoiInput,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
	pub id: Uuid,
	pub approximate_region: Region,
}

impl PoiService {
	/// Re-encrypts the record with a fresh timestamp and replaces the stored blob and region.
	///
	/// There is no version check; concurrent updates resolve as last write wins.
	pub async fn update(&self, req: UpdateRequest) -> Result<UpdateResponse> {
		let actor = req.user_id.as_deref();
		let id = req.id;

		match self.replace(id, req.poi).await {
			Ok(response) => {
				self.emit(
					AuditEvent::success("POI updated successfully").with("poiId", id.to_string()),
					actor,
				);

				Ok(response)
			},
			Err(err) => {
				self.emit(
					AuditEvent::error("POI update failed")
						.with("poiId", id.to_string())
						.with("error", err.to_string()),
					actor,
				);

				Err(err)
			},
		}
	}

	async fn replace(&self, id: Uuid, poi: PoiInput) -> Result<UpdateResponse> {
		let draft = PoiDraft::new(poi)?;
		let now = OffsetDateTime::now_utc();
		let encrypted_data = self.codec.seal_poi(&draft.stamp(now))?;
		let approximate_region = draft.region();

		self.store
			.update(id, RecordUpdate { encrypted_data, approximate_region, updated_at: now })
			.await?;

		Ok(UpdateResponse { id, approximate_region })
	}
}
