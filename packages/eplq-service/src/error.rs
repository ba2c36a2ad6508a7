use eplq_crypto::DecryptFailure;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	Validation { field: String, message: String },
	#[error("{message}")]
	InvalidQuery { field: String, message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Encryption error: {message}")]
	Encryption { message: String },
	#[error("Decryption error ({reason}): {message}")]
	Decryption { reason: DecryptFailure, message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
		Self::Validation { field: field.to_string(), message: message.into() }
	}

	/// Re-labels a domain validation failure as a query failure.
	pub(crate) fn invalid_query(err: eplq_domain::Error) -> Self {
		match Self::from(err) {
			Self::Validation { field, message } => Self::InvalidQuery { field, message },
			other => other,
		}
	}

	/// Field name for caller-fixable errors.
	pub fn field(&self) -> Option<&str> {
		match self {
			Self::Validation { field, .. } | Self::InvalidQuery { field, .. } => Some(field),
			_ => None,
		}
	}
}

impl From<eplq_domain::Error> for Error {
	fn from(err: eplq_domain::Error) -> Self {
		match err {
			eplq_domain::Error::Validation { field, message } =>
				Self::Validation { field: field.to_string(), message },
			eplq_domain::Error::DimensionMismatch { .. } =>
				Self::Validation { field: "vector".to_string(), message: err.to_string() },
		}
	}
}

impl From<eplq_crypto::Error> for Error {
	fn from(err: eplq_crypto::Error) -> Self {
		match err {
			eplq_crypto::Error::Encryption { message } => Self::Encryption { message },
			eplq_crypto::Error::Decryption { reason, detail } =>
				Self::Decryption { reason, message: detail },
		}
	}
}

impl From<eplq_storage::Error> for Error {
	fn from(err: eplq_storage::Error) -> Self {
		match err {
			eplq_storage::Error::Sqlx(inner) => {
				tracing::error!(error = %inner, "Record store operation failed.");

				Self::Storage { message: "The record store could not complete the request.".to_string() }
			},
			eplq_storage::Error::InvalidArgument(message) => Self::Storage { message },
			eplq_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
