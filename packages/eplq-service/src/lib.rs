pub mod audit;
pub mod delete;
pub mod details;
pub mod list;
pub mod search;
pub mod update;
pub mod upload;

mod error;

pub use audit::ChannelAudit;
pub use delete::{DeleteRequest, DeleteResponse};
pub use details::{DetailsRequest, PoiDetails};
pub use eplq_storage::{BoxFuture, PoiStore};
pub use error::{Error, Result};
pub use list::{ListItem, ListRequest, ListResponse};
pub use search::{
	FailedRecord, Partition, SearchItem, SearchRequest, SearchResponse, SearchStats,
	candidate_bounds, partition_records,
};
pub use update::{UpdateRequest, UpdateResponse};
pub use upload::{
	BatchUploadError, BatchUploadRequest, BatchUploadResponse, UploadRequest, UploadResponse,
};

use std::sync::Arc;

use eplq_config::Config;
use eplq_crypto::{Key, PoiCodec};
use eplq_domain::audit::{AuditEvent, AuditSink, NoopAudit, TracingAudit};

/// How the search path builds its candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
	/// Read every record. Reference behavior.
	FullScan,
	/// Read only records whose approximate region falls in the widened query box.
	RegionPrefilter,
}
impl SearchMode {
	pub fn from_config(mode: &str) -> Self {
		match mode {
			"region_prefilter" => Self::RegionPrefilter,
			_ => Self::FullScan,
		}
	}
}

pub struct PoiService {
	pub cfg: Config,
	store: Arc<dyn PoiStore>,
	codec: PoiCodec,
	audit: Arc<dyn AuditSink>,
	search_mode: SearchMode,
}
impl PoiService {
	/// Builds the service with the audit sink implied by `audit.enabled`.
	pub fn new(cfg: Config, store: Arc<dyn PoiStore>) -> Self {
		let audit: Arc<dyn AuditSink> =
			if cfg.audit.enabled { Arc::new(TracingAudit) } else { Arc::new(NoopAudit) };

		Self::with_audit(cfg, store, audit)
	}

	pub fn with_audit(cfg: Config, store: Arc<dyn PoiStore>, audit: Arc<dyn AuditSink>) -> Self {
		let default_key = Key::from_passphrase(&cfg.crypto.default_passphrase);
		let codec = PoiCodec::with_audit(default_key, audit.clone());
		let search_mode = SearchMode::from_config(&cfg.search.mode);

		Self { cfg, store, codec, audit, search_mode }
	}

	pub fn codec(&self) -> &PoiCodec {
		&self.codec
	}

	pub fn search_mode(&self) -> SearchMode {
		self.search_mode
	}

	pub(crate) fn emit(&self, event: AuditEvent, actor: Option<&str>) {
		let event = match actor {
			Some(actor) => event.actor(actor),
			None => event,
		};

		self.audit.emit(event);
	}
}

pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(Error::validation(field, format!("{field} is required")));
	}

	Ok(trimmed)
}
