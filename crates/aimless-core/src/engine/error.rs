use crate::core::io::xyz::XyzError;
use crate::core::utils::masses::UnknownElementError;
use crate::core::velocity::VelocityError;
use crate::engine::acceptors::AcceptorError;
use crate::engine::config::ConfigError;
use crate::engine::logger::LoggerError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by an external MD engine implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Expected one row per particle ({expected}), got {actual}")]
    FrameMismatch { expected: usize, actual: usize },

    #[error("Engine initialization failed: {0}")]
    Initialization(String),

    #[error("Simulation failed: {0}")]
    Simulation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// True for errors that indicate a malformed assignment rather than a
    /// failed simulation. These are never retried.
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::FrameMismatch { .. })
    }
}

/// Fatal errors raised by a sampler instance or the parallel driver.
///
/// Per-attempt engine failures and rejected shooting points are handled
/// inside the sampler's retry budgets and never appear here.
#[derive(Debug, Error)]
pub enum ShootingError {
    #[error("No initial guess was accepted during kickstart")]
    KickstartFailed,

    #[error("No accepted shooting point found after {tries} consecutive starting configurations")]
    StateTriesExhausted { tries: usize },

    #[error(
        "Initial guess '{path}' has {actual} particles, but the engine holds {expected}",
        path = path.display()
    )]
    GuessParticleMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Acceptor(#[from] AcceptorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerError),

    #[error(transparent)]
    Velocity(#[from] VelocityError),

    #[error(transparent)]
    UnknownElement(#[from] UnknownElementError),

    #[error(transparent)]
    Xyz(#[from] XyzError),
}
