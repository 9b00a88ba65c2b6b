use serde::Deserialize;
use std::path::PathBuf;

// Re-export existing config types
pub use crate::nats::NatsConfig;

/// Complete fleetsim configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FleetsimConfig {
    #[serde(default)]
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub route: RouteConfig,
    #[serde(default)]
    pub nats: NatsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Vehicle identity and motion parameters
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleConfig {
    /// Any caller-chosen identifier; also the per-vehicle subject suffix.
    #[serde(default = "default_vehicle_id")]
    pub id: String,
    /// Constant cruising speed in meters per second.
    #[serde(default = "default_cruise_speed")]
    pub cruise_speed_mps: f64,
    /// Simulation advancement cadence in seconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: f64,
}

fn default_vehicle_id() -> String {
    "postauto".to_string()
}

fn default_cruise_speed() -> f64 {
    13.9 // ~50 km/h, urban road speed
}

fn default_tick_interval() -> f64 {
    1.0
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            id: default_vehicle_id(),
            cruise_speed_mps: default_cruise_speed(),
            tick_interval_secs: default_tick_interval(),
        }
    }
}

/// Waypoint input
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    #[serde(default = "default_waypoints_file")]
    pub waypoints_file: PathBuf,
}

fn default_waypoints_file() -> PathBuf {
    PathBuf::from("waypoints/route.itn")
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            waypoints_file: default_waypoints_file(),
        }
    }
}

/// Telemetry publishing cadence, independent of the tick interval
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_publish_interval")]
    pub publish_interval_secs: f64,
}

fn default_publish_interval() -> f64 {
    1.0
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            publish_interval_secs: default_publish_interval(),
        }
    }
}

impl Default for FleetsimConfig {
    fn default() -> Self {
        Self {
            vehicle: VehicleConfig::default(),
            route: RouteConfig::default(),
            nats: NatsConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<FleetsimConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: FleetsimConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FleetsimConfig::default();
        assert_eq!(config.vehicle.id, "postauto");
        assert_eq!(config.vehicle.cruise_speed_mps, 13.9);
        assert_eq!(config.vehicle.tick_interval_secs, 1.0);
        assert_eq!(config.nats.status_subject, "fleet.status");
        assert_eq!(config.telemetry.publish_interval_secs, 1.0);
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [vehicle]
            id = "bus-7"
            cruise_speed_mps = 8.3
            tick_interval_secs = 0.5

            [route]
            waypoints_file = "routes/city.itn"

            [nats]
            url = "nats://example.com:4222"
            status_subject = "depot.status"
            telemetry_subject_prefix = "depot.telemetry"

            [telemetry]
            publish_interval_secs = 2.0
        "#;

        let config: FleetsimConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.vehicle.id, "bus-7");
        assert_eq!(config.vehicle.cruise_speed_mps, 8.3);
        assert_eq!(config.route.waypoints_file, PathBuf::from("routes/city.itn"));
        assert_eq!(config.nats.url, "nats://example.com:4222");
        assert_eq!(config.nats.status_subject, "depot.status");
        assert_eq!(config.telemetry.publish_interval_secs, 2.0);
    }

    #[test]
    fn test_partial_config() {
        // Missing sections use defaults
        let toml = r#"
            [vehicle]
            id = "bus-7"
        "#;

        let config: FleetsimConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.vehicle.id, "bus-7");
        assert_eq!(config.vehicle.cruise_speed_mps, 13.9); // Default
        assert_eq!(config.nats.status_subject, "fleet.status"); // Default
    }
}
