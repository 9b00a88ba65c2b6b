// Geographic primitives and great-circle math
pub mod geo;

// Waypoint routes and ITN file loading
pub mod route;

// Motion simulation engine
pub mod sim;

// Vehicle lifecycle and background ticking
pub mod vehicle;

// Status and telemetry wire protocol
pub mod protocol;

// NATS client integration
pub mod nats;

// Configuration
pub mod config;
