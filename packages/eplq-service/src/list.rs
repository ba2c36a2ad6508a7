use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{PoiService, Result};
use eplq_domain::{audit::AuditEvent, geometry::Region};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListRequest {
	pub user_id: String,
}

/// Storage metadata only; listing never decrypts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
	pub id: Uuid,
	pub approximate_region: Region,
	pub uploaded_by_email: String,
	#[serde(with = "time::serde::rfc3339")]
	pub uploaded_at: OffsetDateTime,
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
	pub items: Vec<ListItem>,
}

impl PoiService {
	/// Records uploaded by the caller, newest first.
	pub async fn list_uploads(&self, req: ListRequest) -> Result<ListResponse> {
		let user_id = crate::required("user_id", &req.user_id)?;

		match self.store.list_by_uploader(user_id).await {
			Ok(records) => Ok(ListResponse {
				items: records
					.into_iter()
					.map(|record| ListItem {
						id: record.id,
						approximate_region: record.approximate_region,
						uploaded_by_email: record.uploaded_by_email,
						uploaded_at: record.uploaded_at,
						updated_at: record.updated_at,
					})
					.collect(),
			}),
			Err(err) => {
				let err = crate::Error::from(err);

				self.emit(
					AuditEvent::error("Failed to retrieve POIs").with("error", err.to_string()),
					Some(user_id),
				);

				Err(err)
			},
		}
	}
}
