use time::OffsetDateTime;
use uuid::Uuid;

use eplq_domain::geometry::Region;

/// A stored POI. Only `approximate_region` and the uploader metadata are readable without the key.
#[derive(Debug, Clone, PartialEq)]
pub struct EncryptedRecord {
	pub id: Uuid,
	pub encrypted_data: String,
	pub approximate_region: Region,
	pub uploaded_by: String,
	pub uploaded_by_email: String,
	pub uploaded_at: OffsetDateTime,
	pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEncryptedRecord {
	pub encrypted_data: String,
	pub approximate_region: Region,
	pub uploaded_by: String,
	pub uploaded_by_email: String,
	pub uploaded_at: OffsetDateTime,
}
impl NewEncryptedRecord {
	pub fn into_record(self, id: Uuid) -> EncryptedRecord {
		EncryptedRecord {
			id,
			encrypted_data: self.encrypted_data,
			approximate_region: self.approximate_region,
			uploaded_by: self.uploaded_by,
			uploaded_by_email: self.uploaded_by_email,
			uploaded_at: self.uploaded_at,
			updated_at: None,
		}
	}
}

/// Replacement blob and region for an existing record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordUpdate {
	pub encrypted_data: String,
	pub approximate_region: Region,
	pub updated_at: OffsetDateTime,
}
