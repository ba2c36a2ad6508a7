use crate::{Error, Result};

const COLLECTION_PLACEHOLDER: &str = "<COLLECTION>";

/// Bootstrap SQL for one collection table.
pub fn render_schema(collection: &str) -> Result<String> {
	ensure_collection(collection)?;

	Ok(include_str!("../../../sql/init.sql").replace(COLLECTION_PLACEHOLDER, collection))
}

/// Collection names are spliced into SQL text, so only plain identifiers are accepted.
pub fn ensure_collection(collection: &str) -> Result<()> {
	if !eplq_config::is_valid_collection(collection) {
		return Err(Error::InvalidArgument(format!(
			"Collection {collection:?} is not a lowercase SQL identifier."
		)));
	}

	Ok(())
}
