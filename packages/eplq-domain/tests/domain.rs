use proptest::prelude::*;
use time::macros::datetime;

use eplq_domain::{
	Error,
	audit::{AuditEvent, AuditLevel, AuditSink, NoopAudit, TracingAudit},
	geometry::{self, Region},
	poi::{Poi, PoiDraft, PoiInput, SearchQuery},
	predicate,
};

fn input(name: &str, latitude: f64, longitude: f64) -> PoiInput {
	PoiInput { name: name.to_string(), latitude, longitude, description: None }
}

#[test]
fn haversine_is_zero_for_identical_points() {
	assert_eq!(geometry::haversine_distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
	assert_eq!(geometry::haversine_distance_km(51.5, -0.12, 51.5, -0.12), 0.0);
}

#[test]
fn haversine_london_to_paris() {
	let distance = geometry::haversine_distance_km(51.5074, -0.1278, 48.8566, 2.3522);

	assert!((distance - 343.5).abs() <= 343.5 * 0.01, "Unexpected distance: {distance}");
}

#[test]
fn haversine_is_symmetric() {
	let forward = geometry::haversine_distance_km(40.7128, -74.006, 34.0522, -118.2437);
	let backward = geometry::haversine_distance_km(34.0522, -118.2437, 40.7128, -74.006);

	assert!((forward - backward).abs() < 1e-9);
}

#[test]
fn approximate_region_rounds_to_one_decimal() {
	assert_eq!(geometry::approximate_region(51.5074, -0.1278), Region { lat: 51.5, lng: -0.1 });
	assert_eq!(geometry::approximate_region(-33.86, 151.21), Region { lat: -33.9, lng: 151.2 });
}

#[test]
fn approximate_region_rounds_half_away_from_zero() {
	assert_eq!(geometry::approximate_region(0.25, -0.25), Region { lat: 0.3, lng: -0.3 });
}

#[test]
fn bounding_box_uses_flat_degree_approximation() {
	let bbox = geometry::bounding_box(0.0, 0.0, 111.0);

	assert!((bbox.min_lat + 1.0).abs() < 1e-12);
	assert!((bbox.max_lat - 1.0).abs() < 1e-12);
	assert!((bbox.min_lng + 1.0).abs() < 1e-12);
	assert!((bbox.max_lng - 1.0).abs() < 1e-12);
}

#[test]
fn bounding_box_longitude_span_grows_toward_poles() {
	let equator = geometry::bounding_box(0.0, 0.0, 10.0);
	let north = geometry::bounding_box(60.0, 0.0, 10.0);

	assert!(north.max_lng - north.min_lng > equator.max_lng - equator.min_lng);
	assert!(((north.max_lat - north.min_lat) - (equator.max_lat - equator.min_lat)).abs() < 1e-12);
}

#[test]
fn format_distance_switches_units_at_one_kilometer() {
	assert_eq!(geometry::format_distance(0.4567), "457m");
	assert_eq!(geometry::format_distance(1.0), "1.00km");
	assert_eq!(geometry::format_distance(12.3456), "12.35km");
}

#[test]
fn within_range_boundary_is_inclusive() {
	let (lat, lng) = (51.5074, -0.1278);
	let (point_lat, point_lng) = (51.52, -0.09);
	let radius = geometry::haversine_distance_km(lat, lng, point_lat, point_lng);

	assert!(predicate::within_range(lat, lng, point_lat, point_lng, radius));
	assert!(!predicate::within_range(lat, lng, point_lat, point_lng, radius - 1e-9));
	assert!(!predicate::within_range(lat, lng, point_lat, point_lng, radius * (1.0 - 1e-12)));
}

#[test]
fn inner_product_predicate_requires_equal_lengths() {
	let err = predicate::inner_product_predicate(&[1.0, 2.0], &[1.0], 10.0)
		.expect_err("Expected dimension mismatch.");

	assert_eq!(err, Error::DimensionMismatch { query: 2, data: 1 });
}

#[test]
fn inner_product_predicate_boundary_is_inclusive() {
	let query = [1.0, 2.0, 3.0];
	let data = [4.0, 5.0, 6.0];

	assert_eq!(predicate::inner_product(&query, &data), Ok(32.0));
	assert_eq!(predicate::inner_product_predicate(&query, &data, 32.0), Ok(true));
	assert_eq!(predicate::inner_product_predicate(&query, &data, 31.999), Ok(false));
	assert_eq!(predicate::inner_product_predicate(&[], &[], 0.0), Ok(true));
}

#[test]
fn poi_draft_rejects_blank_name() {
	let err = PoiDraft::new(input("  ", 1.0, 1.0)).expect_err("Expected name validation error.");

	assert!(matches!(err, Error::Validation { field: "name", .. }));
	assert_eq!(err.to_string(), "POI name is required");
}

#[test]
fn poi_draft_rejects_out_of_range_coordinates() {
	for (lat, lng, field) in [
		(90.1, 0.0, "latitude"),
		(-90.1, 0.0, "latitude"),
		(f64::NAN, 0.0, "latitude"),
		(0.0, 180.5, "longitude"),
		(0.0, f64::NAN, "longitude"),
	] {
		let err = PoiDraft::new(input("Cafe", lat, lng)).expect_err("Expected coordinate error.");

		assert!(
			matches!(err, Error::Validation { field: f, .. } if f == field),
			"Unexpected error for ({lat}, {lng}): {err:?}"
		);
	}
}

#[test]
fn poi_draft_accepts_boundary_coordinates() {
	let draft = PoiDraft::new(input("Pole", 90.0, -180.0)).expect("Boundary coordinates are valid.");

	assert_eq!(draft.description(), "");
	assert_eq!(draft.region(), Region { lat: 90.0, lng: -180.0 });
}

#[test]
fn stamped_poi_keeps_draft_fields() {
	let draft = PoiDraft::new(PoiInput {
		name: "Museum".to_string(),
		latitude: 48.8606,
		longitude: 2.3376,
		description: Some("Louvre".to_string()),
	})
	.expect("Draft must be valid.");
	let poi = draft.stamp(datetime!(2024-05-01 10:00 UTC));

	assert_eq!(poi.name, "Museum");
	assert_eq!(poi.description, "Louvre");
	assert_eq!(poi.timestamp, datetime!(2024-05-01 10:00 UTC));
	assert!(poi.validate().is_ok());
}

#[test]
fn poi_serializes_with_rfc3339_timestamp() {
	let poi = Poi {
		name: "Cafe".to_string(),
		latitude: 1.5,
		longitude: 2.5,
		description: String::new(),
		timestamp: datetime!(2024-01-02 03:04:05 UTC),
	};
	let value = serde_json::to_value(&poi).expect("Failed to serialize POI.");

	assert_eq!(value["timestamp"], "2024-01-02T03:04:05Z");
	assert_eq!(value["latitude"], 1.5);
}

#[test]
fn search_query_validates_every_field() {
	assert!(SearchQuery::new(10.0, 10.0, 5.0).is_ok());

	for (lat, lng, radius, field) in [
		(200.0, 0.0, 5.0, "latitude"),
		(0.0, -181.0, 5.0, "longitude"),
		(0.0, 0.0, 0.0, "radius_km"),
		(0.0, 0.0, -1.0, "radius_km"),
		(0.0, 0.0, f64::NAN, "radius_km"),
	] {
		let err = SearchQuery::new(lat, lng, radius).expect_err("Expected query validation error.");

		assert!(
			matches!(err, Error::Validation { field: f, .. } if f == field),
			"Unexpected error for ({lat}, {lng}, {radius}): {err:?}"
		);
	}
}

#[test]
fn audit_levels_serialize_upper_case() {
	let event = AuditEvent::success("POI uploaded successfully").actor("u1").with("poiId", "abc");
	let value = serde_json::to_value(&event).expect("Failed to serialize audit event.");

	assert_eq!(value["level"], "SUCCESS");
	assert_eq!(value["actor"], "u1");
	assert_eq!(value["metadata"]["poiId"], "abc");
	assert_eq!(AuditLevel::Warning.as_str(), "WARNING");
}

#[test]
fn builtin_audit_sinks_accept_events() {
	assert!(NoopAudit.emit(AuditEvent::info("noop")));
	assert!(TracingAudit.emit(AuditEvent::error("Decryption failed").with("error", "bad tag")));
}

proptest! {
	#[test]
	fn approximate_region_is_within_half_cell(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
		let region = geometry::approximate_region(lat, lng);

		prop_assert!((region.lat - lat).abs() <= 0.05 + 1e-9);
		prop_assert!((region.lng - lng).abs() <= 0.05 + 1e-9);
		prop_assert_eq!(geometry::approximate_region(region.lat, region.lng), region);
	}

	#[test]
	fn region_bounds_contain_regions_of_points_in_the_box(
		lat in -80.0f64..=80.0,
		lng in -170.0f64..=170.0,
		radius in 0.1f64..200.0,
		fx in 0.0f64..=1.0,
		fy in 0.0f64..=1.0,
	) {
		let bbox = geometry::bounding_box(lat, lng, radius);
		let point_lat = (bbox.min_lat + (bbox.max_lat - bbox.min_lat) * fx).clamp(-90.0, 90.0);
		let point_lng = (bbox.min_lng + (bbox.max_lng - bbox.min_lng) * fy).clamp(-180.0, 180.0);
		let region = geometry::approximate_region(point_lat, point_lng);

		prop_assert!(bbox.region_bounds().contains(region.lat, region.lng));
	}

	#[test]
	fn region_bounds_contain_regions_of_points_in_the_circle(
		lat in -89.0f64..=89.0,
		lng in -180.0f64..=180.0,
		radius in 0.1f64..3_000.0,
		bearing in 0.0f64..360.0,
		fraction in 0.0f64..=1.0,
	) {
		let (point_lat, point_lng) = destination(lat, lng, bearing, radius * fraction);

		prop_assume!(geometry::haversine_distance_km(lat, lng, point_lat, point_lng) <= radius);

		let region = geometry::approximate_region(point_lat, point_lng);
		let bounds = geometry::spherical_bounds(lat, lng, radius).region_bounds();

		prop_assert!(
			bounds.contains(region.lat, region.lng),
			"{region:?} outside {bounds:?} for point ({point_lat}, {point_lng})"
		);
	}
}

fn destination(lat: f64, lng: f64, bearing: f64, distance_km: f64) -> (f64, f64) {
	let angular = distance_km / geometry::EARTH_RADIUS_KM;
	let (phi, theta) = (lat.to_radians(), bearing.to_radians());
	let dest_phi =
		(phi.sin() * angular.cos() + phi.cos() * angular.sin() * theta.cos()).clamp(-1.0, 1.0).asin();
	let dest_lambda = lng.to_radians()
		+ (theta.sin() * angular.sin() * phi.cos())
			.atan2(angular.cos() - phi.sin() * dest_phi.sin());
	let mut dest_lng = dest_lambda.to_degrees();

	while dest_lng > 180.0 {
		dest_lng -= 360.0;
	}
	while dest_lng < -180.0 {
		dest_lng += 360.0;
	}

	(dest_phi.to_degrees(), dest_lng)
}

#[test]
fn spherical_bounds_cover_far_north_neighbour() {
	let bounds = geometry::spherical_bounds(70.0, 0.0, 1_500.0).region_bounds();
	let region = geometry::approximate_region(75.1, 42.0);

	assert!(geometry::haversine_distance_km(70.0, 0.0, 75.1, 42.0) < 1_500.0);
	assert!(bounds.contains(region.lat, region.lng));
}
