//! Ciphertext envelope.
//!
//! ```text
//! ┌─────────┬─────────────┬──────────┬──────────────────────┐
//! │ Version │ Fingerprint │  Nonce   │  Ciphertext + Tag    │
//! │ 1 byte  │   4 bytes   │ 12 bytes │      N + 16 bytes    │
//! └─────────┴─────────────┴──────────┴──────────────────────┘
//! ```
//!
//! The 17-byte header is passed to AES-256-GCM as associated data, so it cannot be altered
//! without failing authentication. The whole envelope travels as standard base64.

use aes_gcm::{
	Aes256Gcm, Key as CipherKey, Nonce,
	aead::{Aead, KeyInit, Payload},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::{RngCore, rngs::OsRng};

use crate::{
	DecryptFailure, Error, Result,
	key::{FINGERPRINT_LEN, Key},
};

pub const VERSION: u8 = 0x01;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
pub const HEADER_LEN: usize = 1 + FINGERPRINT_LEN + NONCE_LEN;
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + TAG_LEN;

const FINGERPRINT_OFFSET: usize = 1;
const NONCE_OFFSET: usize = FINGERPRINT_OFFSET + FINGERPRINT_LEN;

pub fn seal(plaintext: &[u8], key: &Key) -> Result<String> {
	let mut nonce = [0_u8; NONCE_LEN];

	OsRng.fill_bytes(&mut nonce);

	seal_with_nonce(plaintext, key, nonce)
}

pub fn open(encoded: &str, key: &Key) -> Result<Vec<u8>> {
	let bytes = STANDARD.decode(encoded.trim()).map_err(|err| {
		Error::decryption(DecryptFailure::Malformed, format!("ciphertext is not base64: {err}"))
	})?;

	if bytes.len() < MIN_ENVELOPE_LEN {
		return Err(Error::decryption(DecryptFailure::Malformed, "ciphertext is truncated"));
	}

	let (header, body) = bytes.split_at(HEADER_LEN);

	if header[0] != VERSION {
		return Err(Error::decryption(
			DecryptFailure::Malformed,
			format!("unsupported envelope version {}", header[0]),
		));
	}
	if header[FINGERPRINT_OFFSET..NONCE_OFFSET] != key.fingerprint() {
		return Err(Error::decryption(DecryptFailure::WrongKey, "key fingerprint does not match"));
	}

	let cipher = cipher(key);
	let nonce = Nonce::from_slice(&header[NONCE_OFFSET..HEADER_LEN]);

	cipher
		.decrypt(nonce, Payload { msg: body, aad: header })
		.map_err(|_| Error::decryption(DecryptFailure::Corrupted, "authentication tag mismatch"))
}

fn seal_with_nonce(plaintext: &[u8], key: &Key, nonce: [u8; NONCE_LEN]) -> Result<String> {
	let mut envelope = Vec::with_capacity(MIN_ENVELOPE_LEN + plaintext.len());

	envelope.push(VERSION);
	envelope.extend_from_slice(&key.fingerprint());
	envelope.extend_from_slice(&nonce);

	let sealed = cipher(key)
		.encrypt(Nonce::from_slice(&nonce), Payload { msg: plaintext, aad: &envelope[..HEADER_LEN] })
		.map_err(|_| Error::Encryption { message: "AES-GCM rejected the plaintext.".to_string() })?;

	envelope.extend_from_slice(&sealed);

	Ok(STANDARD.encode(envelope))
}

fn cipher(key: &Key) -> Aes256Gcm {
	Aes256Gcm::new(CipherKey::<Aes256Gcm>::from_slice(key.expose_secret()))
}
