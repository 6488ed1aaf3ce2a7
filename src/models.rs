//! Core value types shared by the planner, the report store and the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::error::InvalidLocationError;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a validated point.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLocationError`] if either component is not finite or
    /// lies outside `[-90, 90]` / `[-180, 180]`.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidLocationError> {
        let point = Self { lat, lng };
        point.validate()?;
        Ok(point)
    }

    /// Checks the latitude/longitude range invariant.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLocationError`] when the point is out of range or NaN.
    pub fn validate(&self) -> Result<(), InvalidLocationError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(InvalidLocationError::Latitude(self.lat));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(InvalidLocationError::Longitude(self.lng));
        }
        Ok(())
    }
}

/// A point with a display name, as entered by the user or looked up in the
/// gazetteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl NamedLocation {
    #[must_use]
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }

    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

/// Category of a community safety report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportType {
    UnsafeArea,
    PoorLighting,
    Isolated,
    Harassment,
    SafeSpot,
    WellLit,
}

impl ReportType {
    /// Report types that count against a route.
    #[must_use]
    pub const fn is_issue(self) -> bool {
        matches!(self, Self::UnsafeArea | Self::Harassment | Self::PoorLighting)
    }

    /// Report types that count in favour of a route.
    #[must_use]
    pub const fn is_safe_spot(self) -> bool {
        matches!(self, Self::SafeSpot | Self::WellLit)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    /// Weight of an issue report of this severity in the safety score.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Active,
    Resolved,
}

/// A community safety report.
///
/// The planner only looks at `location`, `report_type` and `severity`; the
/// remaining fields belong to the community feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub id: Uuid,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub report_type: ReportType,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl SafetyReport {
    /// Builds an active report with a fresh id and no community metadata.
    #[must_use]
    pub fn new(location: GeoPoint, report_type: ReportType, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            location,
            address: None,
            report_type,
            severity,
            description: None,
            time_of_day: None,
            upvotes: 0,
            status: ReportStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ReportStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RouteType {
    Fastest,
    Alternative,
    Safest,
}

/// One turn-by-turn leg of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub instruction: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// Result of scoring a path against nearby reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyAnalysis {
    /// Heuristic score in `[20, 100]`.
    pub score: i32,
    pub safety_issues: u32,
    pub safe_spots: u32,
    /// Reports within range of at least one path point, each listed once.
    pub nearby_reports: Vec<SafetyReport>,
}

/// Geometry and timing of a generated path before it is named.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRoute {
    pub coordinates: Vec<GeoPoint>,
    pub steps: Vec<RouteStep>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// A named route alternative as returned by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteVariant {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    pub coordinates: Vec<GeoPoint>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub steps: Vec<RouteStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_analysis: Option<SafetyAnalysis>,
}

impl RouteVariant {
    pub(crate) fn from_generated(
        route: GeneratedRoute,
        name: impl Into<String>,
        description: impl Into<String>,
        route_type: RouteType,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            route_type,
            coordinates: route.coordinates,
            distance_meters: route.distance_meters,
            duration_seconds: route.duration_seconds,
            steps: route.steps,
            safety_score: None,
            safety_analysis: None,
        }
    }
}
