//! Presentation helpers: labels and rounding for display only.
//!
//! Nothing here is stored on a rating; the store keeps the raw numbers.

use serde::Serialize;
use std::fmt;

/// How a sauce level reads to a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SauceVerdict {
    TooLittle,
    Perfect,
    TooMuch,
}

impl SauceVerdict {
    pub fn from_level(level: u8) -> Self {
        match level {
            0..=2 => Self::TooLittle,
            3 => Self::Perfect,
            _ => Self::TooMuch,
        }
    }
}

impl fmt::Display for SauceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLittle => write!(f, "too little"),
            Self::Perfect => write!(f, "perfect"),
            Self::TooMuch => write!(f, "too much"),
        }
    }
}

/// "4.3/5"
pub fn format_stars(average: f64) -> String {
    format!("{:.1}/5", average)
}

/// "12.3 km"
pub fn format_distance(km: f64) -> String {
    format!("{:.1} km", km)
}

/// Format coordinates as "48.36686°N, 10.89804°E".
pub fn format_coords(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.5}\u{00B0}{}, {:.5}\u{00B0}{}", lat.abs(), ns, lon.abs(), ew)
}
