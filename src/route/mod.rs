//! Waypoint routes.
//!
//! A route is an ordered, immutable sequence of waypoints. It is built once at
//! vehicle startup and only read afterwards, so it can be shared across
//! threads without locking.

use crate::geo::GeoPoint;
use std::fmt;

pub mod itn;

/// Route access errors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteError {
    IndexOutOfRange { index: usize, count: usize },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::IndexOutOfRange { index, count } => {
                write!(f, "index {} out of range ({} available)", index, count)
            }
        }
    }
}

impl std::error::Error for RouteError {}

/// Ordered, immutable sequence of waypoints in traversal order.
#[derive(Debug, Clone)]
pub struct Route {
    waypoints: Vec<GeoPoint>,
}

impl Route {
    pub fn new(waypoints: Vec<GeoPoint>) -> Self {
        Self { waypoints }
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }

    /// Number of point-to-point segments (waypoints − 1, clamped to 0).
    pub fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Waypoint at `index`, failing when `index` is past the last waypoint.
    pub fn point_at(&self, index: usize) -> Result<GeoPoint, RouteError> {
        self.waypoints
            .get(index)
            .copied()
            .ok_or(RouteError::IndexOutOfRange {
                index,
                count: self.waypoints.len(),
            })
    }

    /// Distance in meters between waypoint `index` and waypoint `index + 1`.
    pub fn segment_length(&self, index: usize) -> Result<f64, RouteError> {
        if index >= self.segment_count() {
            return Err(RouteError::IndexOutOfRange {
                index,
                count: self.segment_count(),
            });
        }
        Ok(self.waypoints[index].distance_to(&self.waypoints[index + 1]))
    }

    /// Total traversable length of the route in meters.
    pub fn total_length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }
}
