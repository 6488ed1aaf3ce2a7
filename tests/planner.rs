use saferoute::models::{GeoPoint, ReportType, RouteType, SafetyReport, Severity};
use saferoute::travel::calculate_duration;
use saferoute::{NamedLocation, TravelMode, plan_routes};

fn dam() -> NamedLocation {
    NamedLocation::new("Dam Square", 52.3731, 4.8932)
}

fn centraal() -> NamedLocation {
    NamedLocation::new("Centraal Station", 52.3791, 4.9003)
}

fn rotterdam() -> NamedLocation {
    NamedLocation::new("Rotterdam Centraal", 51.9249, 4.4690)
}

fn report_at(point: GeoPoint, report_type: ReportType, severity: Severity) -> SafetyReport {
    SafetyReport::new(point, report_type, severity)
}

#[test]
fn dam_to_centraal_in_rush_hour() {
    let routes = plan_routes(&dam(), &centraal(), TravelMode::Driving, &[], 8).unwrap();

    assert!(routes[0].description.contains("Heavy traffic"));
    for route in &routes {
        assert!((9..=16).contains(&route.coordinates.len()));
    }
    assert_eq!(routes[2].safety_score, Some(75));

    let expected = calculate_duration(routes[0].distance_meters, TravelMode::Driving, 0.6);
    assert_eq!(routes[0].duration_seconds, expected);
    let at_thirty_kmh = routes[0].distance_meters / 1000.0 / 30.0 * 3600.0;
    assert!((routes[0].duration_seconds - at_thirty_kmh).abs() < 1e-9);
}

#[test]
fn planning_is_deterministic() {
    let reports = vec![
        report_at(dam().point(), ReportType::PoorLighting, Severity::Medium),
        report_at(centraal().point(), ReportType::WellLit, Severity::Low),
    ];
    let first = plan_routes(&dam(), &rotterdam(), TravelMode::Transit, &reports, 13).unwrap();
    let second = plan_routes(&dam(), &rotterdam(), TravelMode::Transit, &reports, 13).unwrap();
    assert_eq!(first, second);
}

#[test]
fn always_three_variants_in_order() {
    let reports = vec![report_at(dam().point(), ReportType::Harassment, Severity::High)];
    for mode in [
        TravelMode::Driving,
        TravelMode::Walking,
        TravelMode::Bicycling,
        TravelMode::Transit,
    ] {
        for hour in [0, 8, 12, 18, 23] {
            let routes = plan_routes(&dam(), &rotterdam(), mode, &reports, hour).unwrap();
            let types: Vec<RouteType> = routes.iter().map(|r| r.route_type).collect();
            assert_eq!(
                types,
                vec![RouteType::Fastest, RouteType::Alternative, RouteType::Safest]
            );
        }
    }
}

#[test]
fn score_stays_in_bounds() {
    let many_issues: Vec<SafetyReport> = (0..50)
        .map(|_| report_at(dam().point(), ReportType::UnsafeArea, Severity::High))
        .collect();
    let many_safe: Vec<SafetyReport> = (0..50)
        .map(|_| report_at(dam().point(), ReportType::SafeSpot, Severity::Low))
        .collect();

    for reports in [Vec::new(), many_issues, many_safe] {
        let routes = plan_routes(&dam(), &centraal(), TravelMode::Walking, &reports, 12).unwrap();
        let score = routes[2].safety_score.unwrap();
        assert!((20..=100).contains(&score), "score {score}");
    }
}

#[test]
fn extra_unsafe_report_lowers_the_score() {
    let base = vec![report_at(centraal().point(), ReportType::WellLit, Severity::Low)];
    let mut worse = base.clone();
    worse.push(report_at(dam().point(), ReportType::UnsafeArea, Severity::High));

    let before = plan_routes(&dam(), &centraal(), TravelMode::Walking, &base, 12).unwrap();
    let after = plan_routes(&dam(), &centraal(), TravelMode::Walking, &worse, 12).unwrap();
    assert!(after[2].safety_score.unwrap() < before[2].safety_score.unwrap());
}

#[test]
fn extra_well_lit_report_raises_the_score() {
    let base = vec![report_at(dam().point(), ReportType::PoorLighting, Severity::Low)];
    let mut better = base.clone();
    better.push(report_at(dam().point(), ReportType::WellLit, Severity::Low));

    let before = plan_routes(&dam(), &centraal(), TravelMode::Walking, &base, 12).unwrap();
    let after = plan_routes(&dam(), &centraal(), TravelMode::Walking, &better, 12).unwrap();
    assert!(after[2].safety_score.unwrap() > before[2].safety_score.unwrap());
}

#[test]
fn nearby_reports_are_deduplicated() {
    let report = report_at(dam().point(), ReportType::Isolated, Severity::Low);
    let far = report_at(rotterdam().point(), ReportType::UnsafeArea, Severity::High);
    let routes = plan_routes(
        &dam(),
        &centraal(),
        TravelMode::Walking,
        &[report.clone(), far],
        12,
    )
    .unwrap();

    let analysis = routes[2].safety_analysis.as_ref().unwrap();
    assert_eq!(analysis.nearby_reports, vec![report]);
}

#[test]
fn serializes_with_type_and_optional_score() {
    let routes = plan_routes(&dam(), &centraal(), TravelMode::Walking, &[], 12).unwrap();
    let json = serde_json::to_value(&routes).unwrap();

    assert_eq!(json[0]["type"], "fastest");
    assert!(json[0].get("safetyScore").is_none());
    assert_eq!(json[2]["type"], "safest");
    assert_eq!(json[2]["safetyScore"], 75);
    assert_eq!(json[2]["safetyAnalysis"]["safeSpots"], 0);
}
