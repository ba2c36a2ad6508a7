use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use time::OffsetDateTime;

use crate::{DecryptFailure, Error, Result, envelope, key::Key};
use eplq_domain::{
	audit::{AuditEvent, AuditSink, NoopAudit},
	poi::{Poi, PoiDraft},
};

/// Encrypts and decrypts records under a default key with an optional per-call override.
#[derive(Clone)]
pub struct PoiCodec {
	default_key: Key,
	audit: Arc<dyn AuditSink>,
}
impl PoiCodec {
	pub fn new(default_key: Key) -> Self {
		Self { default_key, audit: Arc::new(NoopAudit) }
	}

	pub fn with_audit(default_key: Key, audit: Arc<dyn AuditSink>) -> Self {
		Self { default_key, audit }
	}

	pub fn encrypt<T>(&self, record: &T, key: Option<&Key>) -> Result<String>
	where
		T: Serialize,
	{
		let result = serde_json::to_vec(record)
			.map_err(|err| Error::Encryption { message: format!("record did not serialize: {err}") })
			.and_then(|plaintext| {
				envelope::seal(&plaintext, key.unwrap_or(&self.default_key))
					.map(|ciphertext| (plaintext.len(), ciphertext))
			});

		match result {
			Ok((data_size, ciphertext)) => {
				self.audit.emit(
					AuditEvent::info("Data encrypted successfully")
						.with("dataSize", data_size)
						.with("encryptedSize", ciphertext.len()),
				);

				Ok(ciphertext)
			},
			Err(err) => {
				self.audit.emit(AuditEvent::error("Encryption failed").with("error", err.to_string()));

				Err(err)
			},
		}
	}

	pub fn decrypt<T>(&self, ciphertext: &str, key: Option<&Key>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let result = envelope::open(ciphertext, key.unwrap_or(&self.default_key)).and_then(
			|plaintext| {
				serde_json::from_slice(&plaintext).map_err(|err| {
					Error::decryption(
						DecryptFailure::InvalidRecord,
						format!("plaintext is not a valid record: {err}"),
					)
				})
			},
		);

		self.audit_decrypt(&result);

		result
	}

	/// Stamps the draft with the current time and encrypts it under the default key.
	pub fn encrypt_poi(&self, draft: &PoiDraft) -> Result<String> {
		self.seal_poi(&draft.stamp(OffsetDateTime::now_utc()))
	}

	pub fn seal_poi(&self, poi: &Poi) -> Result<String> {
		self.encrypt(poi, None)
	}

	/// Decrypts under the default key and rejects records whose fields fail validation.
	pub fn decrypt_poi(&self, ciphertext: &str) -> Result<Poi> {
		let poi: Poi = self.decrypt(ciphertext, None)?;

		poi.validate().map_err(|err| {
			Error::decryption(DecryptFailure::InvalidRecord, format!("decrypted POI is invalid: {err}"))
		})?;

		Ok(poi)
	}

	fn audit_decrypt<T>(&self, result: &Result<T>) {
		let event = match result {
			Ok(_) => AuditEvent::info("Data decrypted successfully"),
			Err(err) => AuditEvent::error("Decryption failed").with("error", err.to_string()),
		};

		self.audit.emit(event);
	}
}
