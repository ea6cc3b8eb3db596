//! # Core Models Module
//!
//! Fundamental data structures shared by the sampler, the engine contract,
//! and the results logger.
//!
//! ## Key Components
//!
//! - [`frame::Frame`] - An ordered n×3 array of per-particle vectors, used for both
//!   positions and velocities
//! - [`result::ShootingResult`] - The outcome of one forward/reverse shooting point

pub mod frame;
pub mod result;

pub use frame::{BasinId, Frame};
pub use result::{ShootingResult, TrajectoryOutcome};
