//! Route planning with community safety scoring.
//!
//! [`planner::plan_routes`] turns an origin, a destination, a travel mode,
//! the current hour and a snapshot of community reports into three route
//! alternatives: fastest, alternative and safest (or scenic when the
//! reports along the way drag its score below 75). The engine is pure; the
//! gazetteer, the report store and the HTTP server around it live in their
//! own modules.

pub mod config;
pub mod distance;
pub mod error;
pub mod gazetteer;
pub mod models;
pub mod planner;
pub mod reports;
pub mod route;
pub mod safety;
pub mod server;
pub mod travel;

pub use error::{InvalidLocationError, PlanError};
pub use models::{GeoPoint, NamedLocation, RouteVariant, SafetyAnalysis, SafetyReport, TravelMode};
pub use planner::plan_routes;
