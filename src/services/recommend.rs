//! Per-horse blanket recommendations.
//!
//! Rules, evaluated against one shared [`WeatherSummary`]:
//! 1. Precipitation above 0.05 in, or any weather code ≥ 51, keeps every
//!    horse inside regardless of temperature.
//! 2. Otherwise the first blanket (stored order) whose inclusive range
//!    contains the day's minimum apparent temperature is chosen.
//! 3. Otherwise no blanket is needed. Horses without blankets land here too.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::db::models::HorseWithBlankets;
use crate::services::weather::WeatherSummary;

/// Total daily precipitation (inches) above which horses stay inside.
const PRECIP_THRESHOLD_IN: f64 = 0.05;

/// WMO weather codes from here up are drizzle, rain, snow or storms.
const PRECIPITATION_WEATHER_CODE: i32 = 51;

pub const STAY_INSIDE: &str = "Stay Inside (Precipitation Expected)";
pub const NO_BLANKET: &str = "No blanket needed";

/// What a single horse should wear (or do) today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advice {
    StayInside,
    NoBlanket,
    Blanket(String),
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advice::StayInside => f.write_str(STAY_INSIDE),
            Advice::NoBlanket => f.write_str(NO_BLANKET),
            Advice::Blanket(name) => f.write_str(name),
        }
    }
}

/// A horse's name paired with its recommendation text.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Recommendation {
    /// Horse name
    pub horse: String,
    /// Blanket name, "No blanket needed" or "Stay Inside (Precipitation Expected)"
    pub recommendation: String,
}

/// Whether the day's weather keeps horses inside.
pub fn precipitation_expected(summary: &WeatherSummary) -> bool {
    summary.total_precip > PRECIP_THRESHOLD_IN || summary.max_code >= PRECIPITATION_WEATHER_CODE
}

/// Decide the advice for one horse.
pub fn advise(summary: &WeatherSummary, horse: &HorseWithBlankets) -> Advice {
    if precipitation_expected(summary) {
        return Advice::StayInside;
    }
    horse
        .blankets
        .iter()
        .find(|b| b.covers(summary.min_chill))
        .map(|b| Advice::Blanket(b.name.clone()))
        .unwrap_or(Advice::NoBlanket)
}

/// One recommendation per horse, in input order.
pub fn recommend(summary: &WeatherSummary, horses: &[HorseWithBlankets]) -> Vec<Recommendation> {
    horses
        .iter()
        .map(|h| Recommendation {
            horse: h.horse.name.clone(),
            recommendation: advise(summary, h).to_string(),
        })
        .collect()
}
