use thiserror::Error;
use uuid::Uuid;

/// An origin or destination that cannot be planned from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidLocationError {
    #[error("{0} location is missing")]
    Missing(&'static str),

    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// Failure to turn user input into a location.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocateError {
    #[error(transparent)]
    Invalid(#[from] InvalidLocationError),

    #[error("no known location matches {0:?}")]
    Unknown(String),
}

/// Errors from [`crate::planner::plan_routes`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid origin: {0}")]
    Origin(InvalidLocationError),

    #[error("invalid destination: {0}")]
    Destination(InvalidLocationError),

    #[error("hour {0} is outside 0-23")]
    Hour(u8),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("report {0} not found")]
    NotFound(Uuid),

    #[error("invalid report location: {0}")]
    InvalidLocation(#[from] InvalidLocationError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid PORT value {0:?}")]
    Port(String),

    #[error("gazetteer entry {name:?} is invalid: {source}")]
    Location {
        name: String,
        source: InvalidLocationError,
    },

    #[error("seed report is invalid: {0}")]
    Report(#[from] InvalidLocationError),
}
