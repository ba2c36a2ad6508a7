use std::sync::{Arc, Mutex};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use time::macros::datetime;

use eplq_crypto::{DecryptFailure, Key, PoiCodec, derive_key};
use eplq_domain::{
	audit::{AuditEvent, AuditLevel, AuditSink},
	poi::{Poi, PoiDraft, PoiInput},
};

#[derive(Default)]
struct RecordingAudit {
	events: Mutex<Vec<AuditEvent>>,
}
impl RecordingAudit {
	fn actions(&self) -> Vec<(String, AuditLevel)> {
		self.events
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.iter()
			.map(|event| (event.action.clone(), event.level))
			.collect()
	}
}
impl AuditSink for RecordingAudit {
	fn emit(&self, event: AuditEvent) -> bool {
		self.events.lock().unwrap_or_else(|err| err.into_inner()).push(event);

		true
	}
}

struct RejectingAudit;
impl AuditSink for RejectingAudit {
	fn emit(&self, _event: AuditEvent) -> bool {
		false
	}
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Note {
	text: String,
	weight: u32,
}

fn codec() -> PoiCodec {
	PoiCodec::new(Key::from_passphrase("default-passphrase"))
}

fn draft(name: &str, latitude: f64, longitude: f64, description: Option<&str>) -> PoiDraft {
	PoiDraft::new(PoiInput {
		name: name.to_string(),
		latitude,
		longitude,
		description: description.map(str::to_string),
	})
	.expect("Draft must be valid.")
}

#[test]
fn poi_round_trips_through_default_key() {
	let codec = codec();
	let draft = draft("British Museum", 51.5194, -0.127, Some("Great Russell St"));
	let ciphertext = codec.encrypt_poi(&draft).expect("Encryption must succeed.");
	let poi = codec.decrypt_poi(&ciphertext).expect("Decryption must succeed.");

	assert_eq!(poi.name, draft.name());
	assert_eq!(poi.latitude, draft.latitude());
	assert_eq!(poi.longitude, draft.longitude());
	assert_eq!(poi.description, "Great Russell St");
}

#[test]
fn sealed_poi_round_trips_exactly() {
	let codec = codec();
	let poi = draft("Cafe", -33.8688, 151.2093, None).stamp(datetime!(2024-02-03 04:05:06.789 UTC));
	let ciphertext = codec.seal_poi(&poi).expect("Encryption must succeed.");

	assert_eq!(codec.decrypt_poi(&ciphertext).expect("Decryption must succeed."), poi);
}

#[test]
fn ciphertext_is_fresh_per_encryption() {
	let codec = codec();
	let poi = draft("Cafe", 1.0, 2.0, None).stamp(datetime!(2024-01-01 00:00 UTC));
	let first = codec.seal_poi(&poi).expect("Encryption must succeed.");
	let second = codec.seal_poi(&poi).expect("Encryption must succeed.");

	assert_ne!(first, second);
	assert!(!first.contains("Cafe"));
}

#[test]
fn generic_records_round_trip_with_key_override() {
	let codec = codec();
	let key = derive_key("alice@example.com", "correct horse");
	let note = Note { text: "hello".to_string(), weight: 3 };
	let ciphertext = codec.encrypt(&note, Some(&key)).expect("Encryption must succeed.");
	let decrypted: Note = codec.decrypt(&ciphertext, Some(&key)).expect("Decryption must succeed.");

	assert_eq!(decrypted, note);

	let err = codec
		.decrypt::<Note>(&ciphertext, None)
		.expect_err("Default key must not open a record sealed with an override.");

	assert_eq!(err.decrypt_failure(), Some(DecryptFailure::WrongKey));
}

#[test]
fn derive_key_is_deterministic_and_input_sensitive() {
	assert_eq!(derive_key("a@example.com", "pw"), derive_key("a@example.com", "pw"));
	assert_ne!(derive_key("a@example.com", "pw"), derive_key("a@example.com", "pw2"));
	assert_ne!(derive_key("a@example.com", "pw"), derive_key("b@example.com", "pw"));
}

#[test]
fn flipped_ciphertext_byte_is_corruption_not_wrong_key() {
	let codec = codec();
	let ciphertext = codec.encrypt_poi(&draft("Cafe", 1.0, 2.0, None)).expect("Encryption must succeed.");
	let mut bytes = STANDARD.decode(&ciphertext).expect("Ciphertext must be base64.");
	let last = bytes.len() - 1;

	bytes[last] ^= 0x80;

	let err = codec.decrypt_poi(&STANDARD.encode(bytes)).expect_err("Corruption must fail.");

	assert_eq!(err.decrypt_failure(), Some(DecryptFailure::Corrupted));
}

#[test]
fn garbage_input_is_malformed() {
	let codec = codec();

	for input in ["", "not base64 at all!", "AAAA", "U2FsdGVkX1+abc="] {
		let err = codec.decrypt_poi(input).expect_err("Garbage must fail.");

		assert_eq!(err.decrypt_failure(), Some(DecryptFailure::Malformed), "input {input:?}");
	}
}

#[test]
fn authenticated_non_poi_payload_is_an_invalid_record() {
	let codec = codec();
	let ciphertext = codec
		.encrypt(&Note { text: "x".to_string(), weight: 1 }, None)
		.expect("Encryption must succeed.");
	let err = codec.decrypt_poi(&ciphertext).expect_err("Shape mismatch must fail.");

	assert_eq!(err.decrypt_failure(), Some(DecryptFailure::InvalidRecord));
}

#[test]
fn decrypted_poi_with_bad_coordinates_is_an_invalid_record() {
	let codec = codec();
	let poi = Poi {
		name: "Nowhere".to_string(),
		latitude: 123.0,
		longitude: 0.0,
		description: String::new(),
		timestamp: datetime!(2024-01-01 00:00 UTC),
	};
	let ciphertext = codec.seal_poi(&poi).expect("Encryption must succeed.");
	let err = codec.decrypt_poi(&ciphertext).expect_err("Invalid coordinates must fail.");

	assert_eq!(err.decrypt_failure(), Some(DecryptFailure::InvalidRecord));
}

#[test]
fn codec_reports_success_and_failure_to_audit_sink() {
	let audit = Arc::new(RecordingAudit::default());
	let codec = PoiCodec::with_audit(Key::from_passphrase("p"), audit.clone());
	let ciphertext = codec.encrypt_poi(&draft("Cafe", 1.0, 2.0, None)).expect("Encryption must succeed.");

	codec.decrypt_poi(&ciphertext).expect("Decryption must succeed.");

	let _ = codec.decrypt_poi("AAAA");

	assert_eq!(
		audit.actions(),
		vec![
			("Data encrypted successfully".to_string(), AuditLevel::Info),
			("Data decrypted successfully".to_string(), AuditLevel::Info),
			("Decryption failed".to_string(), AuditLevel::Error),
		]
	);
}

#[test]
fn rejecting_audit_sink_does_not_affect_results() {
	let codec = PoiCodec::with_audit(Key::from_passphrase("p"), Arc::new(RejectingAudit));
	let ciphertext = codec.encrypt_poi(&draft("Cafe", 1.0, 2.0, None)).expect("Encryption must succeed.");

	assert!(codec.decrypt_poi(&ciphertext).is_ok());
}

proptest! {
	#[test]
	fn valid_pois_round_trip(
		name in "[A-Za-z0-9 ]{0,24}[A-Za-z0-9]",
		latitude in -90.0f64..=90.0,
		longitude in -180.0f64..=180.0,
		description in proptest::option::of("[ -~]{0,64}"),
	) {
		let codec = codec();
		let draft = PoiDraft::new(PoiInput { name, latitude, longitude, description: description.clone() })
			.expect("Generated draft must be valid.");
		let ciphertext = codec.encrypt_poi(&draft).expect("Encryption must succeed.");
		let poi = codec.decrypt_poi(&ciphertext).expect("Decryption must succeed.");

		prop_assert_eq!(poi.name.as_str(), draft.name());
		prop_assert_eq!(poi.latitude, latitude);
		prop_assert_eq!(poi.longitude, longitude);
		prop_assert_eq!(poi.description, description.unwrap_or_default());
	}

	#[test]
	fn random_wrong_keys_never_decrypt(wrong in proptest::array::uniform32(any::<u8>())) {
		let codec = codec();
		let wrong = Key::from_bytes(wrong);

		prop_assume!(wrong != Key::from_passphrase("default-passphrase"));

		let ciphertext = codec.encrypt_poi(&draft("Cafe", 10.0, 20.0, None)).expect("Encryption must succeed.");
		let err = codec.decrypt::<Poi>(&ciphertext, Some(&wrong)).expect_err("Wrong key must fail.");

		prop_assert!(matches!(
			err.decrypt_failure(),
			Some(DecryptFailure::WrongKey | DecryptFailure::Corrupted)
		));
	}
}
