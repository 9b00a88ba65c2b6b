// NATS client integration

mod client;

pub use client::{NatsConfig, TelemetryPublisher};
