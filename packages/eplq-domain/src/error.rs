pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	Validation { field: &'static str, message: String },
	#[error("Vector dimension mismatch: query has {query} components but data has {data}.")]
	DimensionMismatch { query: usize, data: usize },
}
impl Error {
	pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
		Self::Validation { field, message: message.into() }
	}
}
