use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_LEN: usize = 32;
pub const FINGERPRINT_LEN: usize = 4;

const FINGERPRINT_DOMAIN: &[u8] = b"eplq-key-fingerprint";

/// 256-bit symmetric key, zeroized on drop and redacted from `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key {
	bytes: [u8; KEY_LEN],
}
impl Key {
	pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
		Self { bytes }
	}

	/// SHA-256 of the passphrase. Used for the configured default key.
	pub fn from_passphrase(passphrase: &str) -> Self {
		Self::from_bytes(sha256(&[passphrase.as_bytes()]))
	}

	/// Short, non-secret identifier stored in each envelope so a key mismatch can be told apart
	/// from a damaged ciphertext.
	pub fn fingerprint(&self) -> [u8; FINGERPRINT_LEN] {
		let digest = sha256(&[FINGERPRINT_DOMAIN, &self.bytes]);
		let mut out = [0_u8; FINGERPRINT_LEN];

		out.copy_from_slice(&digest[..FINGERPRINT_LEN]);

		out
	}

	pub(crate) fn expose_secret(&self) -> &[u8; KEY_LEN] {
		&self.bytes
	}
}
impl fmt::Debug for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let fingerprint = u32::from_be_bytes(self.fingerprint());

		f.debug_struct("Key")
			.field("fingerprint", &format_args!("{fingerprint:08x}"))
			.field("bytes", &"[REDACTED]")
			.finish()
	}
}
impl PartialEq for Key {
	fn eq(&self, other: &Self) -> bool {
		self.bytes.iter().zip(other.bytes.iter()).fold(0_u8, |acc, (a, b)| acc | (a ^ b)) == 0
	}
}
impl Eq for Key {}

/// Deterministic one-way derivation: SHA-256 of `identity:secret`.
pub fn derive_key(identity: &str, secret: &str) -> Key {
	Key::from_bytes(sha256(&[identity.as_bytes(), b":", secret.as_bytes()]))
}

fn sha256(parts: &[&[u8]]) -> [u8; KEY_LEN] {
	let mut hasher = Sha256::new();

	for part in parts {
		hasher.update(part);
	}

	let digest = hasher.finalize();
	let mut out = [0_u8; KEY_LEN];

	out.copy_from_slice(&digest);

	out
}
