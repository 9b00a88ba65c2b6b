//! Status and telemetry wire protocol.
//!
//! Downstream fleet-tracking consumers depend on these field sets and variant
//! tags; changing them is a breaking contract change. Status messages go to
//! the shared status subject, telemetry to the per-vehicle subject.

use crate::sim::MotionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vehicle lifecycle status variants.
///
/// `VehicleRunning` is part of the protocol but never published as a discrete
/// message: flowing telemetry on the vehicle subject implies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusType {
    VehicleReady,
    VehicleRunning,
    VehicleStopped,
    ConnectionLost,
}

/// Lifecycle announcement published to the shared status subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(rename = "type")]
    pub status: StatusType,
    #[serde(rename = "vehicleId")]
    pub vehicle_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusMessage {
    fn new(status: StatusType, vehicle_id: &str, message: &str) -> Self {
        Self {
            status,
            vehicle_id: vehicle_id.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Announced exactly once at startup, before any telemetry flows.
    pub fn ready(vehicle_id: &str) -> Self {
        Self::new(StatusType::VehicleReady, vehicle_id, "Vehicle ready")
    }

    /// Announced exactly once at graceful shutdown.
    pub fn stopped(vehicle_id: &str) -> Self {
        Self::new(StatusType::VehicleStopped, vehicle_id, "Vehicle stopped")
    }

    /// Last-will payload handed to the transport before connecting, delivered
    /// by the transport if the vehicle process dies uncleanly.
    pub fn connection_lost(vehicle_id: &str) -> Self {
        Self::new(StatusType::ConnectionLost, vehicle_id, "Connection lost")
    }
}

/// Position report published to the per-vehicle telemetry subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryMessage {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub heading_degrees: f64,
    pub speed_meters_per_second: f64,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryMessage {
    /// Stamps a motion snapshot with the vehicle id and current time.
    pub fn from_state(vehicle_id: &str, state: &MotionState) -> Self {
        Self {
            vehicle_id: vehicle_id.to_string(),
            latitude: state.position.latitude(),
            longitude: state.position.longitude(),
            heading_degrees: state.heading_degrees,
            speed_meters_per_second: state.speed_mps,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    #[test]
    fn status_tags_match_the_wire_contract() {
        let json = serde_json::to_value(StatusMessage::ready("postauto")).unwrap();
        assert_eq!(json["type"], "VEHICLE_READY");
        assert_eq!(json["vehicleId"], "postauto");
        assert_eq!(json["message"], "Vehicle ready");
        assert!(json["timestamp"].is_string());

        let json = serde_json::to_value(StatusMessage::stopped("postauto")).unwrap();
        assert_eq!(json["type"], "VEHICLE_STOPPED");
        assert_eq!(json["message"], "Vehicle stopped");

        let json = serde_json::to_value(StatusMessage::connection_lost("postauto")).unwrap();
        assert_eq!(json["type"], "CONNECTION_LOST");
        assert_eq!(json["message"], "Connection lost");
    }

    #[test]
    fn status_round_trips() {
        let original = StatusMessage::ready("bus-7");
        let json = serde_json::to_string(&original).unwrap();
        let decoded: StatusMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn telemetry_fields_are_camel_case() {
        let state = MotionState {
            position: GeoPoint::new(48.005, 9.0).unwrap(),
            heading_degrees: 0.0,
            speed_mps: 13.9,
            segment_index: 0,
            distance_into_segment_m: 556.0,
        };
        let json = serde_json::to_value(TelemetryMessage::from_state("postauto", &state)).unwrap();

        assert_eq!(json["vehicleId"], "postauto");
        assert_eq!(json["latitude"], 48.005);
        assert_eq!(json["longitude"], 9.0);
        assert_eq!(json["headingDegrees"], 0.0);
        assert_eq!(json["speedMetersPerSecond"], 13.9);
        assert!(json["timestamp"].is_string());
        // Internal bookkeeping never leaks onto the wire
        assert!(json.get("segmentIndex").is_none());
    }
}
