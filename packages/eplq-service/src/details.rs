use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, PoiService, Result};
use eplq_domain::{audit::AuditEvent, geometry::Region};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetailsRequest {
	pub id: Uuid,
	#[serde(default)]
	pub user_id: Option<String>,
}

/// A single decrypted record with its storage metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoiDetails {
	pub id: Uuid,
	pub name: String,
	pub latitude: f64,
	pub longitude: f64,
	pub description: String,
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	pub approximate_region: Region,
	pub uploaded_by_email: String,
	#[serde(with = "time::serde::rfc3339")]
	pub uploaded_at: OffsetDateTime,
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}

impl PoiService {
	/// Unlike search, a decryption failure here is returned to the caller.
	pub async fn details(&self, req: DetailsRequest) -> Result<PoiDetails> {
		let result = self.load_details(req.id).await;

		if let Err(err) = &result {
			self.emit(
				AuditEvent::error("Failed to get POI details")
					.with("poiId", req.id.to_string())
					.with("error", err.to_string()),
				req.user_id.as_deref(),
			);
		}

		result
	}

	async fn load_details(&self, id: Uuid) -> Result<PoiDetails> {
		let record = self
			.store
			.fetch(id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("POI {id} does not exist.") })?;
		let poi = self.codec.decrypt_poi(&record.encrypted_data)?;

		Ok(PoiDetails {
			id: record.id,
			name: poi.name,
			latitude: poi.latitude,
			longitude: poi.longitude,
			description: poi.description,
			timestamp: poi.timestamp,
			approximate_region: record.approximate_region,
			uploaded_by_email: record.uploaded_by_email,
			uploaded_at: record.uploaded_at,
			updated_at: record.updated_at,
		})
	}
}
