use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
	Error, Result,
	geometry::{self, Region},
};

/// Caller-supplied POI fields before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiInput {
	pub name: String,
	pub latitude: f64,
	pub longitude: f64,
	#[serde(default)]
	pub description: Option<String>,
}

/// A POI whose name and coordinates passed validation. Only drafts can be encrypted.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiDraft {
	name: String,
	latitude: f64,
	longitude: f64,
	description: String,
}
impl PoiDraft {
	pub fn new(input: PoiInput) -> Result<Self> {
		validate_name(&input.name)?;
		validate_latitude(input.latitude)?;
		validate_longitude(input.longitude)?;

		Ok(Self {
			name: input.name,
			latitude: input.latitude,
			longitude: input.longitude,
			description: input.description.unwrap_or_default(),
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn latitude(&self) -> f64 {
		self.latitude
	}

	pub fn longitude(&self) -> f64 {
		self.longitude
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn region(&self) -> Region {
		geometry::approximate_region(self.latitude, self.longitude)
	}

	pub fn stamp(&self, timestamp: OffsetDateTime) -> Poi {
		Poi {
			name: self.name.clone(),
			latitude: self.latitude,
			longitude: self.longitude,
			description: self.description.clone(),
			timestamp,
		}
	}
}
impl TryFrom<PoiInput> for PoiDraft {
	type Error = Error;

	fn try_from(input: PoiInput) -> Result<Self> {
		Self::new(input)
	}
}

/// The plaintext record that gets encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
	pub name: String,
	pub latitude: f64,
	pub longitude: f64,
	#[serde(default)]
	pub description: String,
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
}
impl Poi {
	pub fn validate(&self) -> Result<()> {
		validate_name(&self.name)?;
		validate_latitude(self.latitude)?;
		validate_longitude(self.longitude)
	}

	pub fn region(&self) -> Region {
		geometry::approximate_region(self.latitude, self.longitude)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
	latitude: f64,
	longitude: f64,
	radius_km: f64,
}
impl SearchQuery {
	pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Result<Self> {
		validate_latitude(latitude)?;
		validate_longitude(longitude)?;

		if !radius_km.is_finite() || radius_km <= 0.0 {
			return Err(Error::validation("radius_km", "Invalid radius. Must be greater than 0"));
		}

		Ok(Self { latitude, longitude, radius_km })
	}

	pub fn latitude(&self) -> f64 {
		self.latitude
	}

	pub fn longitude(&self) -> f64 {
		self.longitude
	}

	pub fn radius_km(&self) -> f64 {
		self.radius_km
	}
}

pub fn validate_name(name: &str) -> Result<()> {
	if name.trim().is_empty() {
		return Err(Error::validation("name", "POI name is required"));
	}

	Ok(())
}

pub fn validate_latitude(latitude: f64) -> Result<()> {
	if !(-90.0..=90.0).contains(&latitude) {
		return Err(Error::validation("latitude", "Invalid latitude. Must be between -90 and 90"));
	}

	Ok(())
}

pub fn validate_longitude(longitude: f64) -> Result<()> {
	if !(-180.0..=180.0).contains(&longitude) {
		return Err(Error::validation(
			"longitude",
			"Invalid longitude. Must be between -180 and 180",
		));
	}

	Ok(())
}
