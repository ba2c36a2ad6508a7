use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Messages never include key material or plaintext.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Encryption failed: {message}")]
	Encryption { message: String },
	#[error("Decryption failed ({reason}): {detail}")]
	Decryption { reason: DecryptFailure, detail: String },
}
impl Error {
	pub(crate) fn decryption(reason: DecryptFailure, detail: impl Into<String>) -> Self {
		Self::Decryption { reason, detail: detail.into() }
	}

	pub fn decrypt_failure(&self) -> Option<DecryptFailure> {
		match self {
			Self::Decryption { reason, .. } => Some(*reason),
			Self::Encryption { .. } => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptFailure {
	/// The envelope was sealed under a different key.
	WrongKey,
	/// The key matches but authentication failed; the bytes were altered.
	Corrupted,
	/// Not an envelope: bad encoding, truncated, or unknown version.
	Malformed,
	/// Authenticated plaintext that is not a valid record.
	InvalidRecord,
}
impl DecryptFailure {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::WrongKey => "wrong_key",
			Self::Corrupted => "corrupted",
			Self::Malformed => "malformed",
			Self::InvalidRecord => "invalid_record",
		}
	}
}
impl fmt::Display for DecryptFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
