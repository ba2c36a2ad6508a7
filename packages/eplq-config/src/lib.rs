mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Audit, Config, Crypto, Postgres, Search, Security, Service, Storage};

use std::{fs, net::SocketAddr, path::Path};

pub const SEARCH_MODES: [&str; 2] = ["full_scan", "region_prefilter"];
pub const STORAGE_BACKENDS: [&str; 2] = ["postgres", "memory"];

const MAX_COLLECTION_LEN: usize = 63;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let http_addr: SocketAddr = cfg.service.http_bind.parse().map_err(|_| Error::Validation {
		message: "service.http_bind must be a socket address.".to_string(),
	})?;

	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.http_bind must be a loopback address when security.bind_localhost_only is true."
				.to_string(),
		});
	}
	if !STORAGE_BACKENDS.contains(&cfg.storage.backend.as_str()) {
		return Err(Error::Validation {
			message: "storage.backend must be one of postgres or memory.".to_string(),
		});
	}
	if !is_valid_collection(&cfg.storage.collection) {
		return Err(Error::Validation {
			message: "storage.collection must be a lowercase SQL identifier of at most 63 characters."
				.to_string(),
		});
	}
	if cfg.storage.backend == "postgres" {
		let Some(postgres) = cfg.storage.postgres.as_ref() else {
			return Err(Error::Validation {
				message: "storage.postgres is required when storage.backend is postgres."
					.to_string(),
			});
		};

		if postgres.dsn.trim().is_empty() {
			return Err(Error::Validation {
				message: "storage.postgres.dsn must be non-empty.".to_string(),
			});
		}
		if postgres.pool_max_conns == 0 {
			return Err(Error::Validation {
				message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
			});
		}
	}
	if cfg.crypto.default_passphrase.trim().is_empty() {
		return Err(Error::Validation {
			message: "crypto.default_passphrase must be non-empty.".to_string(),
		});
	}
	if !SEARCH_MODES.contains(&cfg.search.mode.as_str()) {
		return Err(Error::Validation {
			message: "search.mode must be one of full_scan or region_prefilter.".to_string(),
		});
	}
	if cfg.audit.channel_capacity == 0 {
		return Err(Error::Validation {
			message: "audit.channel_capacity must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}

	cfg.storage.backend = cfg.storage.backend.trim().to_ascii_lowercase();
	cfg.storage.collection = cfg.storage.collection.trim().to_string();
	cfg.search.mode = cfg.search.mode.trim().to_ascii_lowercase();
}

pub fn is_valid_collection(name: &str) -> bool {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return false;
	};

	name.len() <= MAX_COLLECTION_LEN
		&& (first.is_ascii_lowercase() || first == '_')
		&& chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
