use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, PoiService, Result, SearchMode};
use eplq_crypto::{DecryptFailure, PoiCodec};
use eplq_domain::{
	audit::AuditEvent,
	geometry::{self, BoundingBox},
	poi::{Poi, SearchQuery},
	predicate,
};
use eplq_storage::models::EncryptedRecord;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub latitude: f64,
	pub longitude: f64,
	pub radius_km: f64,
	/// Attribution for the audit trail only.
	#[serde(default)]
	pub user_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
	pub id: Uuid,
	pub name: String,
	pub latitude: f64,
	pub longitude: f64,
	pub description: String,
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	pub distance_km: f64,
	pub distance_label: String,
	/// Uploader email.
	pub uploaded_by: String,
	#[serde(with = "time::serde::rfc3339")]
	pub uploaded_at: OffsetDateTime,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
	pub total_scanned: usize,
	pub decrypted: usize,
	pub failed: usize,
	pub within_range: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub results: Vec<SearchItem>,
	pub stats: SearchStats,
	pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FailedRecord {
	pub id: Uuid,
	pub reason: DecryptFailure,
}

/// Candidate records split by decryption outcome. Every input lands in exactly one list.
#[derive(Debug, Default)]
pub struct Partition {
	pub decrypted: Vec<(EncryptedRecord, Poi)>,
	pub failed: Vec<FailedRecord>,
}

impl PoiService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = SearchQuery::new(req.latitude, req.longitude, req.radius_km)
			.map_err(Error::invalid_query)?;
		let actor = req.user_id.as_deref();

		self.emit(
			AuditEvent::info("POI search initiated")
				.with("latitude", query.latitude())
				.with("longitude", query.longitude())
				.with("radius", query.radius_km()),
			actor,
		);

		match self.run_search(query).await {
			Ok(response) => {
				self.emit(
					AuditEvent::success("POI search completed")
						.with("resultsCount", response.results.len())
						.with("totalScanned", response.stats.total_scanned)
						.with("decrypted", response.stats.decrypted),
					actor,
				);

				Ok(response)
			},
			Err(err) => {
				self.emit(AuditEvent::error("POI search failed").with("error", err.to_string()), actor);

				Err(err)
			},
		}
	}

	async fn run_search(&self, query: SearchQuery) -> Result<SearchResponse> {
		let records = match self.search_mode {
			SearchMode::FullScan => self.store.fetch_all().await?,
			SearchMode::RegionPrefilter =>
				self.store.fetch_in_region(candidate_bounds(&query)).await?,
		};
		let total_scanned = records.len();
		let partition = partition_records(&self.codec, records);
		let decrypted = partition.decrypted.len();
		let failed = partition.failed.len();
		let results = rank(&query, partition.decrypted);
		let within_range = results.len();

		tracing::debug!(
			mode = ?self.search_mode,
			total_scanned,
			decrypted,
			failed,
			within_range,
			"POI search finished."
		);

		Ok(SearchResponse {
			message: format!("Found {within_range} POI(s) within {}km", query.radius_km()),
			results,
			stats: SearchStats { total_scanned, decrypted, failed, within_range },
		})
	}
}

/// Decrypts each record under the codec's default key.
///
/// A record that cannot be decrypted is logged and moved to `failed`; it never aborts the batch.
pub fn partition_records(codec: &PoiCodec, records: Vec<EncryptedRecord>) -> Partition {
	let mut partition = Partition::default();

	for record in records {
		match codec.decrypt_poi(&record.encrypted_data) {
			Ok(poi) => partition.decrypted.push((record, poi)),
			Err(err) => {
				let reason = err.decrypt_failure().unwrap_or(DecryptFailure::Malformed);

				tracing::warn!(record_id = %record.id, %reason, "Skipping undecryptable POI record.");

				partition.failed.push(FailedRecord { id: record.id, reason });
			},
		}
	}

	partition
}

/// Bounds on stored regions that cannot exclude any record within the query radius.
pub fn candidate_bounds(query: &SearchQuery) -> BoundingBox {
	geometry::spherical_bounds(query.latitude(), query.longitude(), query.radius_km()).region_bounds()
}

fn rank(query: &SearchQuery, decrypted: Vec<(EncryptedRecord, Poi)>) -> Vec<SearchItem> {
	let mut results = Vec::new();

	for (record, poi) in decrypted {
		if !predicate::within_range(
			query.latitude(),
			query.longitude(),
			poi.latitude,
			poi.longitude,
			query.radius_km(),
		) {
			continue;
		}

		let distance_km = geometry::haversine_distance_km(
			query.latitude(),
			query.longitude(),
			poi.latitude,
			poi.longitude,
		);

		results.push(SearchItem {
			id: record.id,
			name: poi.name,
			latitude: poi.latitude,
			longitude: poi.longitude,
			description: poi.description,
			timestamp: poi.timestamp,
			distance_km,
			distance_label: geometry::format_distance(distance_km),
			uploaded_by: record.uploaded_by_email,
			uploaded_at: record.uploaded_at,
		});
	}

	results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

	results
}
