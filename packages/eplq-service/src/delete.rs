use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PoiService, Result};
use eplq_domain::audit::AuditEvent;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteRequest {
	pub id: Uuid,
	#[serde(default)]
	pub user_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
	pub id: Uuid,
	/// False when no record had this id.
	pub deleted: bool,
}

impl PoiService {
	pub async fn delete(&self, req: DeleteRequest) -> Result<DeleteResponse> {
		let actor = req.user_id.as_deref();

		match self.store.delete(req.id).await {
			Ok(deleted) => {
				if deleted {
					self.emit(
						AuditEvent::success("POI deleted successfully").with("poiId", req.id.to_string()),
						actor,
					);
				}

				Ok(DeleteResponse { id: req.id, deleted })
			},
			Err(err) => {
				let err = crate::Error::from(err);

				self.emit(
					AuditEvent::error("POI deletion failed")
						.with("poiId", req.id.to_string())
						.with("error", err.to_string()),
					actor,
				);

				Err(err)
			},
		}
	}
}
