//! Entry point of the route safety engine.

use crate::error::PlanError;
use crate::models::{NamedLocation, RouteType, RouteVariant, SafetyReport, TravelMode};
use crate::route::generate_route;
use crate::safety::{SAFE_THRESHOLD, analyze_safety};
use crate::travel::{speed_multiplier, traffic_condition};

pub const FASTEST_VARIANCE: f64 = 0.002;
pub const ALTERNATIVE_VARIANCE: f64 = -0.006;
pub const SAFEST_VARIANCE: f64 = 0.004;

pub const ALTERNATIVE_SPEED_FACTOR: f64 = 1.1;
pub const SAFEST_SPEED_FACTOR: f64 = 1.15;

/// Plans the fastest, alternative and safest/scenic routes, in that order.
///
/// `reports` is the snapshot of community reports to score against and
/// `now_hour` the local hour (0-23) used for traffic adjustments. Given the
/// same inputs the output is identical.
///
/// # Errors
///
/// Returns [`PlanError`] if the origin or destination has out-of-range or
/// non-finite coordinates, or if `now_hour` is not a clock hour. Nothing is
/// computed in that case.
pub fn plan_routes(
    origin: &NamedLocation,
    destination: &NamedLocation,
    mode: TravelMode,
    reports: &[SafetyReport],
    now_hour: u8,
) -> Result<[RouteVariant; 3], PlanError> {
    let from = origin.point();
    from.validate().map_err(PlanError::Origin)?;
    let to = destination.point();
    to.validate().map_err(PlanError::Destination)?;
    if now_hour > 23 {
        return Err(PlanError::Hour(now_hour));
    }

    log::debug!(
        "planning {mode} routes from {:?} to {:?} at hour {now_hour} against {} reports",
        origin.name,
        destination.name,
        reports.len()
    );

    let multiplier = speed_multiplier(mode, now_hour);

    let fastest = RouteVariant::from_generated(
        generate_route(from, to, mode, FASTEST_VARIANCE, multiplier),
        "Fastest",
        format!("Via main roads • {}", traffic_condition(now_hour)),
        RouteType::Fastest,
    );

    let alternative = RouteVariant::from_generated(
        generate_route(
            from,
            to,
            mode,
            ALTERNATIVE_VARIANCE,
            multiplier * ALTERNATIVE_SPEED_FACTOR,
        ),
        "Alternative",
        "Avoid tolls and highways",
        RouteType::Alternative,
    );

    let scenic = generate_route(from, to, mode, SAFEST_VARIANCE, multiplier * SAFEST_SPEED_FACTOR);
    let analysis = analyze_safety(&scenic.coordinates, reports);
    let (name, description) = if analysis.score >= SAFE_THRESHOLD {
        ("Safest", "Well-lit, populated areas")
    } else {
        ("Scenic", "Through parks and main streets")
    };
    let mut safest = RouteVariant::from_generated(scenic, name, description, RouteType::Safest);
    safest.safety_score = Some(analysis.score);
    safest.safety_analysis = Some(analysis);

    Ok([fastest, alternative, safest])
}
