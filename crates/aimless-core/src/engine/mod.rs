//! # Engine Module
//!
//! This module implements the stateful logic core of the aimless shooting
//! search.
//!
//! ## Overview
//!
//! The engine module owns everything between the stateless foundation in
//! [`crate::core`] and the public workflow entry points: the contract that
//! external MD engines implement, the acceptance-criteria family that decides
//! which shooting points count as transition states, the append-only and
//! resumable results logger, and the retry-governed sampler state machine
//! that strings them together.
//!
//! ## Architecture
//!
//! - **Engine Contract** ([`traits`]) - The async [`traits::ShootingEngine`] interface and
//!   the per-instance [`traits::EngineFactory`] used for parallel isolation
//! - **Acceptance Criteria** ([`acceptors`]) - Default and multi-basin acceptors
//! - **Results Logging** ([`logger`]) - Dual-sink CSV/XYZ recorder with resumable indices
//! - **Sampler** ([`sampler`]) - The kickstart + sampling-loop state machine
//! - **Configuration** ([`config`]) - Validated retry and point budgets
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine and sampler error taxonomies

pub mod acceptors;
pub mod config;
pub mod error;
pub mod logger;
pub mod progress;
pub mod sampler;
pub mod traits;
