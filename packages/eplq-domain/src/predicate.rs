use crate::{Error, Result, geometry};

/// Inclusive: a point exactly `radius_km` away is in range.
pub fn within_range(
	center_lat: f64,
	center_lng: f64,
	point_lat: f64,
	point_lng: f64,
	radius_km: f64,
) -> bool {
	geometry::haversine_distance_km(center_lat, center_lng, point_lat, point_lng) <= radius_km
}

pub fn inner_product(query: &[f64], data: &[f64]) -> Result<f64> {
	if query.len() != data.len() {
		return Err(Error::DimensionMismatch { query: query.len(), data: data.len() });
	}

	Ok(query.iter().zip(data).map(|(q, d)| q * d).sum())
}

/// Matches when `<query, data> <= threshold`.
///
/// Not used by proximity search yet; kept stable for predicate-encryption style matching.
pub fn inner_product_predicate(query: &[f64], data: &[f64], threshold: f64) -> Result<bool> {
	Ok(inner_product(query, data)? <= threshold)
}
