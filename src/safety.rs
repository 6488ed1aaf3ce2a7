use std::collections::HashMap;

use h3o::{CellIndex, LatLng, Resolution};
use serde::Serialize;

use crate::distance::haversine_distance;
use crate::models::{GeoPoint, SafetyAnalysis, SafetyReport};

/// Reports closer than this to any path point affect the route.
pub const NEARBY_RADIUS_METERS: f64 = 200.0;

pub const BASE_SCORE: i64 = 75;
pub const MIN_SCORE: i64 = 20;
pub const MAX_SCORE: i64 = 100;

/// Routes scoring at least this are presented as the safest option.
pub const SAFE_THRESHOLD: i32 = 75;

/// Resolution used for hexbins when the caller does not pick one.
pub const DEFAULT_RESOLUTION: Resolution = Resolution::Nine;

/// Scores a path against community reports.
///
/// Every (path point, report) pair within [`NEARBY_RADIUS_METERS`] counts:
/// issue reports add their severity weight to `safety_issues`, safe-spot
/// reports add 2 to `safe_spots`. A report near several points counts once
/// per point but is listed once in `nearby_reports`.
#[must_use]
pub fn analyze_safety(coordinates: &[GeoPoint], reports: &[SafetyReport]) -> SafetyAnalysis {
    let mut safety_issues: u32 = 0;
    let mut safe_spots: u32 = 0;
    let mut nearby_reports = Vec::new();

    for report in reports {
        let hits = coordinates
            .iter()
            .filter(|point| haversine_distance(**point, report.location) < NEARBY_RADIUS_METERS)
            .count();
        if hits == 0 {
            continue;
        }

        let hits = u32::try_from(hits).unwrap_or(u32::MAX);
        if report.report_type.is_issue() {
            safety_issues = safety_issues.saturating_add(report.severity.weight().saturating_mul(hits));
        } else if report.report_type.is_safe_spot() {
            safe_spots = safe_spots.saturating_add(hits.saturating_mul(2));
        }
        nearby_reports.push(report.clone());
    }

    let score = safety_score(safety_issues, safe_spots);
    log::debug!(
        "safety analysis: score={score} issues={safety_issues} safe_spots={safe_spots} nearby={}",
        nearby_reports.len()
    );

    SafetyAnalysis {
        score,
        safety_issues,
        safe_spots,
        nearby_reports,
    }
}

/// `clamp(75 + safe_spots * 2 - safety_issues * 5, 20, 100)`.
#[must_use]
pub fn safety_score(safety_issues: u32, safe_spots: u32) -> i32 {
    let raw = BASE_SCORE + i64::from(safe_spots) * 2 - i64::from(safety_issues) * 5;
    // clamped into [20, 100], always fits
    i32::try_from(raw.clamp(MIN_SCORE, MAX_SCORE)).unwrap_or(i32::MIN)
}

/// Report totals for a single H3 cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSummary {
    /// Sum of severity weights of issue reports.
    pub issue_weight: u32,
    pub safe_spots: u32,
    pub reports: u32,
}

/// A cell of the community overlay, ready for the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hexbin {
    pub cell: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(flatten)]
    pub summary: CellSummary,
}

/// Community reports bucketed into H3 cells.
pub struct SafetyMap {
    resolution: Resolution,
    cells: HashMap<CellIndex, CellSummary>,
}

impl SafetyMap {
    pub fn from_reports<'a>(
        reports: impl IntoIterator<Item = &'a SafetyReport>,
        resolution: Resolution,
    ) -> Self {
        let mut cells: HashMap<CellIndex, CellSummary> = HashMap::new();

        for report in reports {
            let Some(cell) = to_cell(report.location, resolution) else {
                log::warn!("Skipping report {} with unindexable location", report.id);
                continue;
            };

            let entry = cells.entry(cell).or_default();
            entry.reports += 1;
            if report.report_type.is_issue() {
                entry.issue_weight += report.severity.weight();
            } else if report.report_type.is_safe_spot() {
                entry.safe_spots += 1;
            }
        }

        Self { resolution, cells }
    }

    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Totals for the cell containing `point`, if any report landed there.
    #[must_use]
    pub fn summary_at(&self, point: GeoPoint) -> Option<&CellSummary> {
        to_cell(point, self.resolution).and_then(|cell| self.cells.get(&cell))
    }

    /// All populated cells ordered by cell index.
    #[must_use]
    pub fn hexbins(&self) -> Vec<Hexbin> {
        let mut cells: Vec<_> = self.cells.iter().collect();
        cells.sort_by_key(|(cell, _)| u64::from(**cell));

        cells
            .into_iter()
            .map(|(cell, summary)| {
                let center = LatLng::from(*cell);
                Hexbin {
                    cell: cell.to_string(),
                    lat: center.lat(),
                    lng: center.lng(),
                    summary: *summary,
                }
            })
            .collect()
    }
}

fn to_cell(point: GeoPoint, resolution: Resolution) -> Option<CellIndex> {
    LatLng::new(point.lat, point.lng)
        .ok()
        .map(|ll| ll.to_cell(resolution))
}
