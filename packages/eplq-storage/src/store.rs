use std::{future::Future, pin::Pin};

use uuid::Uuid;

use crate::{
	Result,
	models::{EncryptedRecord, NewEncryptedRecord, RecordUpdate},
};
use eplq_domain::geometry::BoundingBox;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read/write interface over the encrypted POI collection.
///
/// Each call returns a complete snapshot or fails outright. Retries belong to the implementation,
/// not to callers.
pub trait PoiStore
where
	Self: Send + Sync,
{
	/// Every record, oldest upload first.
	fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<EncryptedRecord>>>;

	/// Records whose approximate region lies inside `bounds`, oldest upload first.
	fn fetch_in_region(&self, bounds: BoundingBox) -> BoxFuture<'_, Result<Vec<EncryptedRecord>>>;

	fn fetch(&self, id: Uuid) -> BoxFuture<'_, Result<Option<EncryptedRecord>>>;

	/// Records uploaded by `user_id`, newest first.
	fn list_by_uploader<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<EncryptedRecord>>>;

	fn insert(&self, record: NewEncryptedRecord) -> BoxFuture<'_, Result<Uuid>>;

	/// Fails with [`crate::Error::NotFound`] when no record has `id`.
	fn update(&self, id: Uuid, update: RecordUpdate) -> BoxFuture<'_, Result<()>>;

	/// Returns whether a record was removed.
	fn delete(&self, id: Uuid) -> BoxFuture<'_, Result<bool>>;
}
