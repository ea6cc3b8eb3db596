use crate::core::models::{Frame, ShootingResult};
use crate::engine::error::EngineError;
use async_trait::async_trait;

/// Contract an external MD engine implements to drive shooting points.
///
/// The sampler only ever calls [`run_shooting_point`](Self::run_shooting_point)
/// after a consistent position and velocity assignment. Implementations run
/// the forward and time-reversed sides as two concurrently launched,
/// independently awaited simulations; the reverse side customarily uses the
/// negation of the currently set velocities and must not share mutable state
/// with the forward side while both are in flight.
#[async_trait]
pub trait ShootingEngine: Send {
    /// Ordered element symbols of the particles held by the engine.
    fn atoms(&self) -> &[String];

    /// Target temperature of the simulated ensemble in K.
    fn temperature(&self) -> f64;

    /// Periodic box edge lengths in Å.
    fn box_dimensions(&self) -> [f64; 3];

    /// Assigns particle positions for the next shooting point.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FrameMismatch`] if the frame does not carry one
    /// row per particle.
    fn set_positions(&mut self, positions: &Frame) -> Result<(), EngineError>;

    /// Assigns particle velocities for the next shooting point.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FrameMismatch`] if the frame does not carry one
    /// row per particle.
    fn set_velocities(&mut self, velocities: &Frame) -> Result<(), EngineError>;

    /// Runs both sides of one shooting point, suspending until both finish
    /// or fail.
    async fn run_shooting_point(&mut self) -> Result<ShootingResult, EngineError>;
}

/// Checks that `frame` carries exactly one row per engine particle.
///
/// Engines call this from their `set_positions`/`set_velocities`
/// implementations; rows are three-wide by construction.
pub fn validate_frame(expected: usize, frame: &Frame) -> Result<(), EngineError> {
    if frame.n_particles() != expected {
        return Err(EngineError::FrameMismatch {
            expected,
            actual: frame.n_particles(),
        });
    }
    Ok(())
}

/// Builds a fresh, isolated engine for each parallel sampler instance.
///
/// Instances constructed by one factory must not observe each other's mutable
/// state (for example in-flight velocity negations), so every call returns a
/// fully independent engine configured from the same inputs.
pub trait EngineFactory {
    type Engine: ShootingEngine;

    fn create(&self) -> Result<Self::Engine, EngineError>;
}
