//! Vehicle lifecycle and background advancement.
//!
//! [`VehicleController`] owns a motion simulator, advances it on a fixed
//! cadence on a background task, and exposes the latest fully-committed
//! [`MotionState`] to any number of concurrent readers. The lifecycle is
//! `CREATED → RUNNING → STOPPED`, terminal once stopped.

use crate::protocol::TelemetryMessage;
use crate::route::Route;
use crate::sim::{MotionSimulator, MotionState};
use std::fmt;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// Lifecycle misuse errors. The call is rejected and state left unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleError {
    AlreadyStarted,
    AlreadyStopped,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::AlreadyStarted => write!(f, "vehicle controller is already running"),
            LifecycleError::AlreadyStopped => write!(f, "vehicle controller has been stopped"),
        }
    }
}

impl std::error::Error for LifecycleError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Running,
    Stopped,
}

/// Drives a [`MotionSimulator`] on a recurring tick and publishes each
/// resulting state into a single-slot watch channel.
///
/// The tick task is the only writer; `snapshot()` readers clone out the last
/// committed state without ever blocking a tick in progress.
pub struct VehicleController {
    phase: Phase,
    tick_interval: Duration,
    /// Present until `start()` hands the simulator to the tick task.
    simulator: Option<MotionSimulator>,
    snapshot_tx: watch::Sender<MotionState>,
    snapshot_rx: watch::Receiver<MotionState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl VehicleController {
    pub fn new(simulator: MotionSimulator, tick_interval: Duration) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(simulator.state().clone());
        Self {
            phase: Phase::Created,
            tick_interval,
            simulator: Some(simulator),
            snapshot_tx,
            snapshot_rx,
            shutdown_tx: None,
            handle: None,
        }
    }

    /// Begins the recurring advancement tick.
    ///
    /// Valid only before the first start: fails with `AlreadyStarted` while
    /// running and `AlreadyStopped` once stopped.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        match self.phase {
            Phase::Running => return Err(LifecycleError::AlreadyStarted),
            Phase::Stopped => return Err(LifecycleError::AlreadyStopped),
            Phase::Created => {}
        }

        let mut simulator = match self.simulator.take() {
            Some(simulator) => simulator,
            None => return Err(LifecycleError::AlreadyStarted),
        };

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let snapshot_tx = self.snapshot_tx.clone();
        let tick = self.tick_interval;
        let elapsed_secs = tick.as_secs_f64();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(tick);
            // Skip missed ticks instead of bursting to catch up
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await; // consume the immediate first tick

            loop {
                tokio::select! {
                    // Cancellation wins over a due tick; a tick body that has
                    // already started always runs to completion first.
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        simulator.advance(elapsed_secs);
                        // Publish the full new state; receivers may all be
                        // gone, the slot still holds the value
                        let _ = snapshot_tx.send(simulator.state().clone());
                    }
                }
            }
            debug!("Tick task exited");
        });

        self.shutdown_tx = Some(shutdown_tx);
        self.handle = Some(handle);
        self.phase = Phase::Running;
        info!(interval_secs = elapsed_secs, "Vehicle controller started");
        Ok(())
    }

    /// Latest fully-committed motion state.
    ///
    /// Safe to call concurrently from any thread while ticking is in
    /// progress; two reads without an intervening tick return equal values.
    pub fn snapshot(&self) -> MotionState {
        self.snapshot_rx.borrow().clone()
    }

    /// A receiver over committed states, for caller-cadence polling loops.
    pub fn subscribe(&self) -> watch::Receiver<MotionState> {
        self.snapshot_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Halts the recurring tick and waits for any in-flight tick to finish.
    ///
    /// Once this returns, no further snapshot is published. Calling `stop()`
    /// again after the controller is stopped is a no-op; calling it before
    /// `start()` moves straight to the terminal state.
    pub async fn stop(&mut self) {
        match self.phase {
            Phase::Stopped => return,
            Phase::Created => {
                self.phase = Phase::Stopped;
                return;
            }
            Phase::Running => {}
        }

        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "Tick task failed during shutdown");
            }
        }

        self.phase = Phase::Stopped;
        info!("Vehicle controller stopped");
    }
}

impl Drop for VehicleController {
    fn drop(&mut self) {
        // Best-effort abort if dropped while still running
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// A simulated vehicle: an immutable id plus its motion controller.
pub struct Vehicle {
    id: String,
    controller: VehicleController,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        route: Route,
        cruise_speed_mps: f64,
        tick_interval: Duration,
    ) -> Self {
        let simulator = MotionSimulator::new(route, cruise_speed_mps);
        Self {
            id: id.into(),
            controller: VehicleController::new(simulator, tick_interval),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start(&mut self) -> Result<(), LifecycleError> {
        self.controller.start()
    }

    pub async fn stop(&mut self) {
        self.controller.stop().await
    }

    pub fn snapshot(&self) -> MotionState {
        self.controller.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<MotionState> {
        self.controller.subscribe()
    }

    /// Wire-ready snapshot stamped with the vehicle id and current time.
    pub fn telemetry(&self) -> TelemetryMessage {
        TelemetryMessage::from_state(&self.id, &self.controller.snapshot())
    }
}
