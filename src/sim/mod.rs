//! Motion simulation engine.
//!
//! Advances a position along a waypoint route over elapsed travel time at a
//! constant cruising speed. Pure CPU-bound state computation: no I/O, no
//! errors during normal advancement. A route without traversable length
//! leaves the vehicle parked with speed 0.

use crate::geo::GeoPoint;
use crate::route::Route;

/// Moves below this threshold reuse the segment bearing instead of the
/// move bearing, which is unstable at near-zero displacement.
const MIN_HEADING_MOVE_M: f64 = 0.01;

/// Routes with less total length than this are treated as stationary.
const MIN_ROUTE_LENGTH_M: f64 = 1e-6;

/// Point-in-time motion estimate for the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    pub position: GeoPoint,
    /// Compass heading in degrees, [0, 360).
    pub heading_degrees: f64,
    pub speed_mps: f64,
    /// Index of the route segment currently being traversed.
    pub segment_index: usize,
    pub distance_into_segment_m: f64,
}

/// Advances a [`MotionState`] along a route at a configured cruising speed.
///
/// The route is consumed segment by segment; reaching the end wraps back to
/// segment 0 so telemetry keeps flowing indefinitely.
pub struct MotionSimulator {
    route: Route,
    /// Segment lengths in meters, precomputed once. Indexed like segments.
    segment_lengths: Vec<f64>,
    total_length_m: f64,
    cruise_speed_mps: f64,
    state: MotionState,
}

impl MotionSimulator {
    pub fn new(route: Route, cruise_speed_mps: f64) -> Self {
        let segment_lengths: Vec<f64> = route
            .waypoints()
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .collect();
        let total_length_m = segment_lengths.iter().sum();

        // Parked at the first waypoint; an empty route parks at the origin.
        let state = MotionState {
            position: route.point_at(0).unwrap_or_default(),
            heading_degrees: 0.0,
            speed_mps: 0.0,
            segment_index: 0,
            distance_into_segment_m: 0.0,
        };

        Self {
            route,
            segment_lengths,
            total_length_m,
            cruise_speed_mps,
            state,
        }
    }

    /// Current motion state.
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn cruise_speed_mps(&self) -> f64 {
        self.cruise_speed_mps
    }

    fn is_stationary(&self) -> bool {
        self.segment_lengths.is_empty() || self.total_length_m < MIN_ROUTE_LENGTH_M
    }

    /// Advance the simulated position by `elapsed_secs` of travel time.
    ///
    /// The distance covered may span multiple segments in a single call; no
    /// distance is lost or double-counted across segment boundaries.
    pub fn advance(&mut self, elapsed_secs: f64) {
        if self.is_stationary() || elapsed_secs <= 0.0 {
            return;
        }

        let mut travel = elapsed_secs * self.cruise_speed_mps;
        // Anything beyond a full loop lands at the same place; reducing it
        // first keeps the consumption loop bounded.
        if travel >= self.total_length_m {
            travel %= self.total_length_m;
        }

        let previous = self.state.position;
        let mut index = self.state.segment_index;
        let mut into = self.state.distance_into_segment_m;

        // Consume whole segments, wrapping at the route end. Zero-length
        // segments (duplicate waypoints) are stepped over.
        while into + travel >= self.segment_lengths[index] {
            travel -= self.segment_lengths[index] - into;
            into = 0.0;
            index += 1;
            if index == self.segment_lengths.len() {
                index = 0;
            }
        }
        into = (into + travel).max(0.0);

        self.state.segment_index = index;
        self.state.distance_into_segment_m = into;

        // The consumption loop only ever rests on a positive-length segment.
        let start = self.route.waypoints()[index];
        let end = self.route.waypoints()[index + 1];
        let segment_length = self.segment_lengths[index];
        self.state.position = start.interpolate(&end, into / segment_length);

        let moved = previous.distance_to(&self.state.position);
        self.state.heading_degrees = if moved < MIN_HEADING_MOVE_M {
            start.bearing_to(&end)
        } else {
            previous.bearing_to(&self.state.position)
        };
        self.state.speed_mps = self.cruise_speed_mps;
    }
}
