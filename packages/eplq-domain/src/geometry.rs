use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6_371.0;
pub const KM_PER_DEGREE: f64 = 111.0;
/// Grid cells per degree for the approximate region. 10 gives a 0.1° (~11 km) cell.
pub const REGION_CELLS_PER_DEGREE: f64 = 10.0;
pub const REGION_HALF_CELL_DEGREES: f64 = 0.5 / REGION_CELLS_PER_DEGREE;

const REGION_BOUNDS_SLACK: f64 = 1e-9;

/// Coarse location stored in the clear next to each encrypted record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
	pub lat: f64,
	pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
	pub min_lat: f64,
	pub max_lat: f64,
	pub min_lng: f64,
	pub max_lng: f64,
}
impl BoundingBox {
	pub fn contains(&self, lat: f64, lng: f64) -> bool {
		(self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
	}

	/// Bounds over approximate regions that cannot miss a point inside this box.
	///
	/// The box is widened by half a region cell because regions are rounded, latitude is
	/// clamped to the valid range, and longitude falls back to the whole circle when the box
	/// wraps the antimeridian or reaches a pole.
	pub fn region_bounds(&self) -> BoundingBox {
		let widen = REGION_HALF_CELL_DEGREES + REGION_BOUNDS_SLACK;
		let min_lat = self.min_lat - widen;
		let max_lat = self.max_lat + widen;
		let min_lng = self.min_lng - widen;
		let max_lng = self.max_lng + widen;
		let wraps = !min_lng.is_finite()
			|| !max_lng.is_finite()
			|| min_lng < -180.0
			|| max_lng > 180.0
			|| min_lat < -90.0
			|| max_lat > 90.0;

		if wraps {
			return BoundingBox {
				min_lat: min_lat.max(-90.0),
				max_lat: max_lat.min(90.0),
				min_lng: -180.0,
				max_lng: 180.0,
			};
		}

		BoundingBox { min_lat, max_lat, min_lng, max_lng }
	}
}

pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
	let delta_lat = (lat2 - lat1).to_radians();
	let delta_lon = (lon2 - lon1).to_radians();
	let a = (delta_lat / 2.0).sin().powi(2)
		+ lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
	let a = a.min(1.0);
	let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

	EARTH_RADIUS_KM * c
}

/// Rounds both coordinates to one decimal place, half away from zero.
pub fn approximate_region(lat: f64, lng: f64) -> Region {
	Region { lat: round_to_cell(lat), lng: round_to_cell(lng) }
}

/// Degree box around a center using a flat 111 km per degree approximation.
///
/// Advisory only: candidates inside the box still need the haversine test.
pub fn bounding_box(lat: f64, lng: f64, radius_km: f64) -> BoundingBox {
	let lat_degrees_per_km = 1.0 / KM_PER_DEGREE;
	let lng_degrees_per_km = 1.0 / (KM_PER_DEGREE * lat.to_radians().cos());
	let lat_span = radius_km * lat_degrees_per_km;
	let lng_span = radius_km * lng_degrees_per_km;

	BoundingBox {
		min_lat: lat - lat_span,
		max_lat: lat + lat_span,
		min_lng: lng - lng_span,
		max_lng: lng + lng_span,
	}
}

/// Smallest degree box holding every point within `radius_km` of the center on the sphere.
///
/// Longitude falls back to the whole circle when the cap reaches a pole.
pub fn spherical_bounds(lat: f64, lng: f64, radius_km: f64) -> BoundingBox {
	let angular = radius_km / EARTH_RADIUS_KM;
	let lat_span = angular.to_degrees();
	let min_lat = lat - lat_span;
	let max_lat = lat + lat_span;
	let cos_lat = lat.to_radians().cos();

	if angular >= FRAC_PI_2 || angular.sin() >= cos_lat || min_lat <= -90.0 || max_lat >= 90.0 {
		return BoundingBox {
			min_lat: min_lat.max(-90.0),
			max_lat: max_lat.min(90.0),
			min_lng: -180.0,
			max_lng: 180.0,
		};
	}

	let lng_span = (angular.sin() / cos_lat).asin().to_degrees();

	BoundingBox { min_lat, max_lat, min_lng: lng - lng_span, max_lng: lng + lng_span }
}

pub fn format_distance(distance_km: f64) -> String {
	if distance_km < 1.0 {
		format!("{}m", (distance_km * 1_000.0).round())
	} else {
		format!("{distance_km:.2}km")
	}
}

fn round_to_cell(value: f64) -> f64 {
	(value * REGION_CELLS_PER_DEGREE).round() / REGION_CELLS_PER_DEGREE
}
