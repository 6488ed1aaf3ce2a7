//! Named-location lookup used in place of a geocoding service.

use std::convert::Infallible;
use std::str::FromStr;

use serde::Deserialize;

use crate::distance::haversine_distance;
use crate::error::{InvalidLocationError, LocateError};
use crate::models::{GeoPoint, NamedLocation};

/// Queries shorter than this produce no suggestions.
pub const MIN_SUGGEST_LEN: usize = 3;

/// A location as entered by a user: explicit coordinates or a place name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    Coordinates {
        lat: f64,
        lng: f64,
        #[serde(default)]
        name: Option<String>,
    },
    Name(String),
}

impl FromStr for LocationInput {
    type Err = Infallible;

    /// `"52.37,4.89"` parses as coordinates, anything else as a name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coordinates = s.split_once(',').and_then(|(lat, lng)| {
            Some((
                lat.trim().parse::<f64>().ok()?,
                lng.trim().parse::<f64>().ok()?,
            ))
        });

        Ok(match coordinates {
            Some((lat, lng)) => Self::Coordinates {
                lat,
                lng,
                name: None,
            },
            None => Self::Name(s.to_string()),
        })
    }
}

/// A fixed table of place names and coordinates.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    locations: Vec<NamedLocation>,
}

impl Gazetteer {
    #[must_use]
    pub const fn new(locations: Vec<NamedLocation>) -> Self {
        Self { locations }
    }

    #[must_use]
    pub fn locations(&self) -> &[NamedLocation] {
        &self.locations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Autocomplete: every location whose name contains `query`,
    /// case-insensitively, in table order.
    #[must_use]
    pub fn suggest(&self, query: &str) -> Vec<&NamedLocation> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_LEN {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        self.locations
            .iter()
            .filter(|loc| loc.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Resolves free text to a location: an exact (case-insensitive) name
    /// match wins, otherwise the first name containing the text.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<&NamedLocation> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let needle = text.to_lowercase();

        self.locations
            .iter()
            .find(|loc| loc.name.to_lowercase() == needle)
            .or_else(|| {
                self.locations
                    .iter()
                    .find(|loc| loc.name.to_lowercase().contains(&needle))
            })
    }

    /// Turns user input into a location. Coordinates pass through with a
    /// generated name; names go through [`Self::resolve`]. `role` names the
    /// input in the error when it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::Invalid`] when the input is missing and
    /// [`LocateError::Unknown`] when a name matches nothing.
    pub fn locate(
        &self,
        input: Option<LocationInput>,
        role: &'static str,
    ) -> Result<NamedLocation, LocateError> {
        match input {
            None => Err(InvalidLocationError::Missing(role).into()),
            Some(LocationInput::Coordinates { lat, lng, name }) => Ok(NamedLocation {
                name: name.unwrap_or_else(|| format!("{lat:.4}, {lng:.4}")),
                lat,
                lng,
            }),
            Some(LocationInput::Name(text)) if text.trim().is_empty() => {
                Err(InvalidLocationError::Missing(role).into())
            }
            Some(LocationInput::Name(text)) => self
                .resolve(&text)
                .cloned()
                .ok_or(LocateError::Unknown(text)),
        }
    }

    /// The location closest to `point`.
    #[must_use]
    pub fn nearest(&self, point: GeoPoint) -> Option<&NamedLocation> {
        self.locations.iter().min_by(|a, b| {
            let da = haversine_distance(a.point(), point);
            let db = haversine_distance(b.point(), point);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
