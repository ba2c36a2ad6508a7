use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub crypto: Crypto,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub audit: Audit,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	/// One of "postgres" or "memory".
	pub backend: String,
	/// Collection (table) holding encrypted POI records.
	#[serde(default = "default_collection")]
	pub collection: String,
	pub postgres: Option<Postgres>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// The passphrase is hashed into the process-wide default key when the service is built.
#[derive(Clone, Deserialize)]
pub struct Crypto {
	pub default_passphrase: String,
}
impl std::fmt::Debug for Crypto {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Crypto").field("default_passphrase", &"[REDACTED]").finish()
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	/// One of "full_scan" or "region_prefilter".
	pub mode: String,
}
impl Default for Search {
	fn default() -> Self {
		Self { mode: "full_scan".to_string() }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Audit {
	pub enabled: bool,
	pub channel_capacity: usize,
}
impl Default for Audit {
	fn default() -> Self {
		Self { enabled: true, channel_capacity: 1_024 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_collection() -> String {
	"encrypted_pois".to_string()
}
