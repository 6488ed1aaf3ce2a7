//! Synthetic path geometry between two points.
//!
//! There is no road graph behind these paths: each route is a straight
//! interpolation bent by a sine curve and a small zig-zag that stands in for
//! streets. Distances are inflated by the amount of bending.

use std::f64::consts::PI;

use itertools::Itertools;

use crate::distance::haversine_distance;
use crate::models::{GeneratedRoute, GeoPoint, RouteStep, TravelMode};
use crate::travel::calculate_duration;

pub const MIN_SEGMENTS: usize = 8;
pub const MAX_SEGMENTS: usize = 15;

/// Straight-line meters covered by one segment before the count is clamped.
const METERS_PER_SEGMENT: f64 = 500.0;

/// Amplitude in degrees of the road-following zig-zag.
const ROAD_JITTER: f64 = 0.0005;

const INSTRUCTIONS: [&str; 12] = [
    "northeast on Main St",
    "Turn right onto 2nd Avenue",
    "Continue straight for 500m",
    "Turn left at the intersection",
    "Keep right at the fork",
    "Continue onto Bridge Road",
    "Turn slight left",
    "Take the 3rd exit at the roundabout",
    "Turn right onto Park Street",
    "Continue straight",
    "Turn left onto Final Ave",
    "Your destination will be on the right",
];

/// Leading verb of the first instruction.
#[must_use]
pub const fn mode_verb(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Driving => "Drive",
        TravelMode::Walking => "Walk",
        TravelMode::Bicycling => "Bike",
        TravelMode::Transit => "Take",
    }
}

/// Number of segments for a straight-line distance.
#[must_use]
pub fn segment_count(distance_m: f64) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let raw = (distance_m / METERS_PER_SEGMENT).floor().max(0.0) as usize;
    raw.clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

/// Instruction for segment `index` of `total`.
#[must_use]
pub fn step_instruction(index: usize, total: usize, mode: TravelMode) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let slot = ((index as f64 / total as f64) * (INSTRUCTIONS.len() - 1) as f64).floor() as usize;

    match slot {
        0 => format!("{} {}", mode_verb(mode), INSTRUCTIONS[0]),
        n => INSTRUCTIONS
            .get(n)
            .map_or_else(|| "Continue on route".to_string(), ToString::to_string),
    }
}

/// Generates a curved path from `origin` to `destination`.
///
/// `variance` controls how far (in degrees) the path bows away from the
/// straight line; its sign picks the side. The returned path always has
/// between [`MIN_SEGMENTS`] and [`MAX_SEGMENTS`] segments and starts exactly
/// at `origin`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_route(
    origin: GeoPoint,
    destination: GeoPoint,
    mode: TravelMode,
    variance: f64,
    speed_multiplier: f64,
) -> GeneratedRoute {
    let lat_diff = destination.lat - origin.lat;
    let lng_diff = destination.lng - origin.lng;
    let distance = haversine_distance(origin, destination);
    let segments = segment_count(distance);
    let n = segments as f64;

    let coordinates: Vec<GeoPoint> = (0..=segments)
        .map(|i| {
            let progress = i as f64 / n;
            let curve = (progress * PI).sin() * variance;
            let road = (progress * n * 0.8).sin() * ROAD_JITTER;

            GeoPoint {
                lat: origin.lat + lat_diff * progress + curve + road,
                lng: origin.lng + lng_diff * progress - curve * 0.7 + road * 0.5,
            }
        })
        .collect();

    let distance_meters = distance * (1.0 + variance.abs() * 2.0);
    let duration_seconds = calculate_duration(distance_meters, mode, speed_multiplier);

    // Duration is split evenly across segments regardless of their length.
    let step_duration = duration_seconds / n;
    let steps = coordinates
        .iter()
        .tuple_windows()
        .enumerate()
        .map(|(i, (from, to))| RouteStep {
            instruction: step_instruction(i, segments, mode),
            distance_meters: haversine_distance(*from, *to),
            duration_seconds: step_duration,
        })
        .collect();

    log::trace!(
        "generated {segments}-segment route ({distance_meters:.0} m, variance {variance})"
    );

    GeneratedRoute {
        coordinates,
        steps,
        distance_meters,
        duration_seconds,
    }
}
