use anyhow::{ensure, Context, Result};
use fleetsim::config::{load_config, FleetsimConfig};
use fleetsim::nats::TelemetryPublisher;
use fleetsim::protocol::StatusMessage;
use fleetsim::route::itn;
use fleetsim::vehicle::Vehicle;
use std::path::Path;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetsim=info".into()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fleetsim.toml".to_string());
    let config = if Path::new(&config_path).exists() {
        load_config(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to load config '{}': {}", config_path, e))?
    } else {
        info!(path = %config_path, "No config file found, using defaults");
        FleetsimConfig::default()
    };
    ensure!(
        config.vehicle.tick_interval_secs > 0.0,
        "vehicle.tick_interval_secs must be positive"
    );
    ensure!(
        config.telemetry.publish_interval_secs > 0.0,
        "telemetry.publish_interval_secs must be positive"
    );

    let vehicle_id = config.vehicle.id.clone();
    info!(
        vehicle_id = %vehicle_id,
        waypoints_file = %config.route.waypoints_file.display(),
        "Starting vehicle simulator"
    );

    let route = itn::load_itn_file(&config.route.waypoints_file)?;
    if route.segment_count() == 0 {
        warn!(
            waypoints = route.waypoint_count(),
            "Route has no traversable segments, vehicle will stay parked"
        );
    }
    info!(
        waypoints = route.waypoint_count(),
        total_length_m = route.total_length(),
        "Route loaded"
    );

    // The last-will payload must exist before the connection opens so an
    // abrupt death at any later point is observable by subscribers.
    let last_will = StatusMessage::connection_lost(&vehicle_id);
    let publisher = TelemetryPublisher::connect(config.nats.clone(), last_will).await?;

    publisher
        .publish_status(&StatusMessage::ready(&vehicle_id))
        .await?;
    info!("Sent ready status");

    let mut vehicle = Vehicle::new(
        vehicle_id.clone(),
        route,
        config.vehicle.cruise_speed_mps,
        Duration::from_secs_f64(config.vehicle.tick_interval_secs),
    );
    vehicle.start().context("Failed to start vehicle")?;

    // Publish telemetry at the caller cadence, independent of the tick
    let mut ticker = interval(Duration::from_secs_f64(
        config.telemetry.publish_interval_secs,
    ));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = publisher.publish_telemetry(&vehicle.telemetry()).await {
                    error!(error = %e, "Failed to publish telemetry");
                }
            }
        }
    }

    vehicle.stop().await;
    info!("Vehicle stopped");

    publisher
        .publish_status(&StatusMessage::stopped(&vehicle_id))
        .await?;
    publisher.close().await?;
    info!("Disconnected from NATS");

    Ok(())
}
