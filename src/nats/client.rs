use crate::protocol::{StatusMessage, TelemetryMessage};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// NATS configuration
#[derive(Clone, Debug, Deserialize)]
pub struct NatsConfig {
    #[serde(default = "default_url")]
    pub url: String,
    /// Shared broadcast subject for lifecycle announcements.
    #[serde(default = "default_status_subject")]
    pub status_subject: String,
    /// Telemetry is published to `{prefix}.{vehicle_id}`.
    #[serde(default = "default_telemetry_subject_prefix")]
    pub telemetry_subject_prefix: String,
}

fn default_url() -> String {
    std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string())
}

fn default_status_subject() -> String {
    "fleet.status".to_string()
}

fn default_telemetry_subject_prefix() -> String {
    "fleet.telemetry".to_string()
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            status_subject: default_status_subject(),
            telemetry_subject_prefix: default_telemetry_subject_prefix(),
        }
    }
}

/// NATS publisher for vehicle status and telemetry.
///
/// Holds the CONNECTION_LOST payload that was registered before the
/// connection opened, so an abrupt process death at any point after connect
/// has a fully-formed announcement associated with it. NATS has no
/// broker-stored will; delivery on unclean disconnect is the transport
/// operator's concern, while the ordering contract (will before READY) is
/// enforced here by the constructor signature.
pub struct TelemetryPublisher {
    client: async_nats::Client,
    config: NatsConfig,
    last_will: StatusMessage,
}

impl TelemetryPublisher {
    /// Connect to NATS. The last-will payload must be supplied up front,
    /// before any status message can be published.
    pub async fn connect(config: NatsConfig, last_will: StatusMessage) -> Result<Self> {
        info!(url = %config.url, "Connecting to NATS");

        let client = async_nats::connect(&config.url)
            .await
            .context("Failed to connect to NATS")?;

        Ok(Self {
            client,
            config,
            last_will,
        })
    }

    /// The pre-registered CONNECTION_LOST payload.
    pub fn last_will(&self) -> &StatusMessage {
        &self.last_will
    }

    /// Publish a lifecycle announcement to the shared status subject.
    pub async fn publish_status(&self, status: &StatusMessage) -> Result<()> {
        let payload =
            serde_json::to_vec(status).context("Failed to serialize status message")?;

        debug!(
            subject = %self.config.status_subject,
            vehicle_id = %status.vehicle_id,
            "Publishing status"
        );

        self.client
            .publish(self.config.status_subject.clone(), payload.into())
            .await
            .context("Failed to publish status message")?;
        self.client
            .flush()
            .await
            .context("Failed to flush status message")?;

        Ok(())
    }

    /// Publish a position report to the per-vehicle telemetry subject.
    ///
    /// Fire-and-forget; the caller's cadence loop logs and carries on if a
    /// publish fails.
    pub async fn publish_telemetry(&self, telemetry: &TelemetryMessage) -> Result<()> {
        let subject = format!(
            "{}.{}",
            self.config.telemetry_subject_prefix, telemetry.vehicle_id
        );
        let payload =
            serde_json::to_vec(telemetry).context("Failed to serialize telemetry message")?;

        debug!(subject = %subject, "Publishing telemetry");

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context(format!("Failed to publish telemetry to subject '{}'", subject))?;

        Ok(())
    }

    /// Flush pending messages and drain the connection.
    pub async fn close(self) -> Result<()> {
        self.client
            .flush()
            .await
            .context("Failed to flush NATS connection")?;
        self.client
            .drain()
            .await
            .context("Failed to drain NATS connection")?;
        Ok(())
    }
}
