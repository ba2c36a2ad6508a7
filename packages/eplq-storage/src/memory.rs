use std::{
	future,
	sync::{Mutex, MutexGuard},
};

use uuid::Uuid;

use crate::{
	BoxFuture, Error, PoiStore, Result,
	models::{EncryptedRecord, NewEncryptedRecord, RecordUpdate},
};
use eplq_domain::geometry::BoundingBox;

/// Process-local store. Records keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
	records: Mutex<Vec<EncryptedRecord>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	fn lock(&self) -> MutexGuard<'_, Vec<EncryptedRecord>> {
		self.records.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl PoiStore for MemoryStore {
	fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<EncryptedRecord>>> {
		let records = self.lock().clone();

		Box::pin(future::ready(Ok(records)))
	}

	fn fetch_in_region(&self, bounds: BoundingBox) -> BoxFuture<'_, Result<Vec<EncryptedRecord>>> {
		let records = self
			.lock()
			.iter()
			.filter(|record| {
				bounds.contains(record.approximate_region.lat, record.approximate_region.lng)
			})
			.cloned()
			.collect();

		Box::pin(future::ready(Ok(records)))
	}

	fn fetch(&self, id: Uuid) -> BoxFuture<'_, Result<Option<EncryptedRecord>>> {
		let record = self.lock().iter().find(|record| record.id == id).cloned();

		Box::pin(future::ready(Ok(record)))
	}

	fn list_by_uploader<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<EncryptedRecord>>> {
		let mut records: Vec<EncryptedRecord> =
			self.lock().iter().filter(|record| record.uploaded_by == user_id).cloned().collect();

		records.reverse();
		records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

		Box::pin(future::ready(Ok(records)))
	}

	fn insert(&self, record: NewEncryptedRecord) -> BoxFuture<'_, Result<Uuid>> {
		let id = Uuid::new_v4();

		self.lock().push(record.into_record(id));

		Box::pin(future::ready(Ok(id)))
	}

	fn update(&self, id: Uuid, update: RecordUpdate) -> BoxFuture<'_, Result<()>> {
		let result = match self.lock().iter_mut().find(|record| record.id == id) {
			Some(record) => {
				record.encrypted_data = update.encrypted_data;
				record.approximate_region = update.approximate_region;
				record.updated_at = Some(update.updated_at);

				Ok(())
			},
			None => Err(Error::NotFound(format!("POI {id} does not exist."))),
		};

		Box::pin(future::ready(result))
	}

	fn delete(&self, id: Uuid) -> BoxFuture<'_, Result<bool>> {
		let mut records = self.lock();
		let before = records.len();

		records.retain(|record| record.id != id);

		let deleted = records.len() != before;

		drop(records);

		Box::pin(future::ready(Ok(deleted)))
	}
}
