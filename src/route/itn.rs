//! ITN waypoint-file parsing.
//!
//! One waypoint per line, fields separated by `|`. The first field is the
//! longitude and the second the latitude, both as integers scaled by 100000:
//!
//! ```text
//! 0845453|4902352|Point 1 |0|
//! 0848501|4900249|Point 2 |0|
//! ```
//!
//! Malformed lines are skipped with a warning; a file full of garbage yields
//! an empty route, not an error.

use crate::geo::GeoPoint;
use crate::route::Route;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

/// Raw ITN fields are degrees scaled by this factor.
const COORDINATE_SCALE: f64 = 100_000.0;

/// Parse ITN file contents into a route, skipping malformed lines.
pub fn parse_itn(contents: &str) -> Route {
    let mut waypoints = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < 2 {
            warn!(line = idx + 1, "Skipping ITN line with fewer than 2 fields");
            continue;
        }

        // Field order is longitude|latitude
        let raw_lon: f64 = match fields[0].trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    line = idx + 1,
                    field = %fields[0],
                    "Skipping ITN line with unparsable longitude"
                );
                continue;
            }
        };
        let raw_lat: f64 = match fields[1].trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    line = idx + 1,
                    field = %fields[1],
                    "Skipping ITN line with unparsable latitude"
                );
                continue;
            }
        };

        match GeoPoint::new(raw_lat / COORDINATE_SCALE, raw_lon / COORDINATE_SCALE) {
            Ok(point) => waypoints.push(point),
            Err(e) => {
                warn!(
                    line = idx + 1,
                    error = %e,
                    "Skipping ITN line with out-of-range coordinate"
                );
            }
        }
    }

    Route::new(waypoints)
}

/// Load a route from an ITN file on disk.
pub fn load_itn_file(path: impl AsRef<Path>) -> Result<Route> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read waypoint file '{}'", path.display()))?;
    Ok(parse_itn(&contents))
}
