use std::sync::Arc;

use eplq_config::Config;
use eplq_domain::audit::{AuditSink, NoopAudit, TracingAudit};
use eplq_service::{ChannelAudit, PoiService, PoiStore, audit};
use eplq_storage::{MemoryStore, PgPoiStore, db::Db};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PoiService>,
}
impl AppState {
	/// Opens the configured store and starts the audit drain task.
	///
	/// Must run inside a Tokio runtime.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let store = open_store(&config).await?;

		Ok(Self::with_store(config, store))
	}

	pub fn with_store(config: Config, store: Arc<dyn PoiStore>) -> Self {
		let audit: Arc<dyn AuditSink> = if config.audit.enabled {
			let (sink, rx) = ChannelAudit::new(config.audit.channel_capacity);

			tokio::spawn(audit::drain(rx, Arc::new(TracingAudit)));

			Arc::new(sink)
		} else {
			Arc::new(NoopAudit)
		};
		let service = PoiService::with_audit(config, store, audit);

		Self { service: Arc::new(service) }
	}
}

async fn open_store(config: &Config) -> color_eyre::Result<Arc<dyn PoiStore>> {
	match (config.storage.backend.as_str(), config.storage.postgres.as_ref()) {
		("postgres", Some(postgres)) => {
			let db = Db::connect(postgres).await?;

			db.ensure_schema(&config.storage.collection).await?;

			tracing::info!(collection = %config.storage.collection, "Postgres store ready.");

			Ok(Arc::new(PgPoiStore::new(db, &config.storage.collection)?))
		},
		("memory", _) => {
			tracing::warn!("Using the in-memory store; records are lost on restart.");

			Ok(Arc::new(MemoryStore::new()))
		},
		(backend, _) => Err(color_eyre::eyre::eyre!(
			"Storage backend {backend:?} is not usable with the given configuration."
		)),
	}
}
