//! Travel speeds and time-of-day traffic adjustments.

use crate::models::TravelMode;

/// Base travel speed in km/h.
#[must_use]
pub const fn base_speed_kmh(mode: TravelMode) -> f64 {
    match mode {
        TravelMode::Driving => 50.0,
        TravelMode::Walking => 5.0,
        TravelMode::Bicycling => 20.0,
        TravelMode::Transit => 40.0,
    }
}

/// 7-9 AM and 5-7 PM.
#[must_use]
pub const fn is_rush_hour(hour: u8) -> bool {
    matches!(hour, 7..=9 | 17..=19)
}

/// 10 PM - 6 AM.
#[must_use]
pub const fn is_night(hour: u8) -> bool {
    hour >= 22 || hour <= 6
}

/// Time-of-day speed adjustment. Only driving is affected by traffic.
#[must_use]
pub const fn speed_multiplier(mode: TravelMode, hour: u8) -> f64 {
    if !matches!(mode, TravelMode::Driving) {
        return 1.0;
    }
    if is_rush_hour(hour) {
        0.6
    } else if is_night(hour) {
        1.2
    } else {
        1.0
    }
}

#[must_use]
pub const fn traffic_condition(hour: u8) -> &'static str {
    if is_rush_hour(hour) {
        "Heavy traffic"
    } else if matches!(hour, 10..=16) {
        "Light traffic"
    } else {
        "Minimal traffic"
    }
}

/// Seconds needed to cover `distance_m` at the mode's adjusted speed.
#[must_use]
pub fn calculate_duration(distance_m: f64, mode: TravelMode, multiplier: f64) -> f64 {
    let speed = base_speed_kmh(mode) * multiplier;
    (distance_m / 1000.0) / speed * 3600.0
}

/// Formats seconds as `"2 min"` or `"1 hr 5 min"`.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;

    if hours > 0 {
        format!("{hours} hr {minutes} min")
    } else {
        format!("{minutes} min")
    }
}
