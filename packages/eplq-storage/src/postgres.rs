use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	BoxFuture, Error, PoiStore, Result,
	db::Db,
	models::{EncryptedRecord, NewEncryptedRecord, RecordUpdate},
	schema,
};
use eplq_domain::geometry::{BoundingBox, Region};

const RECORD_COLUMNS: &str = "id, encrypted_data, region_lat, region_lng, uploaded_by, \
	uploaded_by_email, uploaded_at, updated_at";

/// Postgres-backed store over the table named by the configured collection.
pub struct PgPoiStore {
	pool: PgPool,
	table: String,
}
impl PgPoiStore {
	pub fn new(db: Db, collection: &str) -> Result<Self> {
		schema::ensure_collection(collection)?;

		Ok(Self { pool: db.pool, table: collection.to_string() })
	}

	async fn select(&self, filter: &str, order: &str, binds: Binds<'_>) -> Result<Vec<RecordRow>> {
		let sql = format!("SELECT {RECORD_COLUMNS} FROM {} {filter} ORDER BY {order}", self.table);
		let mut query = sqlx::query_as::<_, RecordRow>(sql.as_str());

		match binds {
			Binds::None => {},
			Binds::Id(id) => query = query.bind(id),
			Binds::Uploader(user_id) => query = query.bind(user_id),
			Binds::Bounds(bounds) =>
				query = query
					.bind(bounds.min_lat)
					.bind(bounds.max_lat)
					.bind(bounds.min_lng)
					.bind(bounds.max_lng),
		}

		Ok(query.fetch_all(&self.pool).await?)
	}
}
impl PoiStore for PgPoiStore {
	fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<EncryptedRecord>>> {
		Box::pin(async move {
			let rows = self.select("", "uploaded_at ASC, id ASC", Binds::None).await?;

			Ok(rows.into_iter().map(RecordRow::into_record).collect())
		})
	}

	fn fetch_in_region(&self, bounds: BoundingBox) -> BoxFuture<'_, Result<Vec<EncryptedRecord>>> {
		Box::pin(async move {
			let rows = self
				.select(
					"WHERE region_lat BETWEEN $1 AND $2 AND region_lng BETWEEN $3 AND $4",
					"uploaded_at ASC, id ASC",
					Binds::Bounds(bounds),
				)
				.await?;

			Ok(rows.into_iter().map(RecordRow::into_record).collect())
		})
	}

	fn fetch(&self, id: Uuid) -> BoxFuture<'_, Result<Option<EncryptedRecord>>> {
		Box::pin(async move {
			let rows = self.select("WHERE id = $1", "id", Binds::Id(id)).await?;

			Ok(rows.into_iter().next().map(RecordRow::into_record))
		})
	}

	fn list_by_uploader<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<EncryptedRecord>>> {
		Box::pin(async move {
			let rows = self
				.select("WHERE uploaded_by = $1", "uploaded_at DESC, id DESC", Binds::Uploader(user_id))
				.await?;

			Ok(rows.into_iter().map(RecordRow::into_record).collect())
		})
	}

	fn insert(&self, record: NewEncryptedRecord) -> BoxFuture<'_, Result<Uuid>> {
		Box::pin(async move {
			let id = Uuid::new_v4();
			let sql = format!(
				"\
INSERT INTO {} (
	id,
	encrypted_data,
	region_lat,
	region_lng,
	uploaded_by,
	uploaded_by_email,
	uploaded_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
				self.table
			);

			sqlx::query(sql.as_str())
				.bind(id)
				.bind(record.encrypted_data.as_str())
				.bind(record.approximate_region.lat)
				.bind(record.approximate_region.lng)
				.bind(record.uploaded_by.as_str())
				.bind(record.uploaded_by_email.as_str())
				.bind(record.uploaded_at)
				.execute(&self.pool)
				.await?;

			Ok(id)
		})
	}

	fn update(&self, id: Uuid, update: RecordUpdate) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			let sql = format!(
				"\
UPDATE {}
SET
	encrypted_data = $1,
	region_lat = $2,
	region_lng = $3,
	updated_at = $4
WHERE id = $5",
				self.table
			);
			let result = sqlx::query(sql.as_str())
				.bind(update.encrypted_data.as_str())
				.bind(update.approximate_region.lat)
				.bind(update.approximate_region.lng)
				.bind(update.updated_at)
				.bind(id)
				.execute(&self.pool)
				.await?;

			if result.rows_affected() == 0 {
				return Err(Error::NotFound(format!("POI {id} does not exist.")));
			}

			Ok(())
		})
	}

	fn delete(&self, id: Uuid) -> BoxFuture<'_, Result<bool>> {
		Box::pin(async move {
			let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
			let result = sqlx::query(sql.as_str()).bind(id).execute(&self.pool).await?;

			Ok(result.rows_affected() > 0)
		})
	}
}

enum Binds<'a> {
	None,
	Id(Uuid),
	Uploader(&'a str),
	Bounds(BoundingBox),
}

#[derive(sqlx::FromRow)]
struct RecordRow {
	id: Uuid,
	encrypted_data: String,
	region_lat: f64,
	region_lng: f64,
	uploaded_by: String,
	uploaded_by_email: String,
	uploaded_at: OffsetDateTime,
	updated_at: Option<OffsetDateTime>,
}
impl RecordRow {
	fn into_record(self) -> EncryptedRecord {
		EncryptedRecord {
			id: self.id,
			encrypted_data: self.encrypted_data,
			approximate_region: Region { lat: self.region_lat, lng: self.region_lng },
			uploaded_by: self.uploaded_by,
			uploaded_by_email: self.uploaded_by_email,
			uploaded_at: self.uploaded_at,
			updated_at: self.updated_at,
		}
	}
}
