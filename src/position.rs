//! Where the user is: manual coordinates or a one-shot IP lookup.
//!
//! A missing position is a normal state, not an error. Sensor failures are
//! logged and turn into "no position"; the ranker then keeps catalog order.

use crate::catalog::UserPosition;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

/// The position sensor could not produce a fix.
#[derive(Debug, Error)]
#[error("position unavailable: {0}")]
pub struct SensorUnavailable(pub String);

#[derive(Deserialize)]
struct IpApiResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl IpApiResult {
    fn into_position(self) -> Result<UserPosition, SensorUnavailable> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Ok(UserPosition::new(lat, lon)),
            _ => Err(SensorUnavailable("lookup returned no coordinates".into())),
        }
    }
}

/// Look up the caller's approximate position from their public IP.
pub fn try_locate_by_ip() -> Result<UserPosition, SensorUnavailable> {
    let response = ureq::get(IP_LOOKUP_URL)
        .set("User-Agent", "FlurryRank/0.3")
        .timeout(Duration::from_secs(5))
        .call()
        .map_err(|e| SensorUnavailable(e.to_string()))?;

    let r: IpApiResult = response
        .into_json()
        .map_err(|e| SensorUnavailable(e.to_string()))?;

    r.into_position()
}

/// Like `try_locate_by_ip`, but any failure is just an absent position.
pub fn locate_by_ip() -> Option<UserPosition> {
    match try_locate_by_ip() {
        Ok(pos) => Some(pos),
        Err(e) => {
            warn!(error = %e, "continuing without a position");
            None
        }
    }
}

/// Combine manual coordinates into a position; half a pair counts as none.
pub fn from_manual(lat: Option<f64>, lon: Option<f64>) -> Option<UserPosition> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some(UserPosition::new(lat, lon)),
        _ => None,
    }
}
