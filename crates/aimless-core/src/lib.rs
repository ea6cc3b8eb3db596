//! # Aimless Core Library
//!
//! A library implementation of the aimless shooting algorithm for locating
//! transition states between stable basins of a molecular system, driven by an
//! external molecular dynamics engine.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models ([`core::models::Frame`],
//!   [`core::models::ShootingResult`]), XYZ file I/O, atomic mass data, and the
//!   physically-constrained velocity sampling routine.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer orchestrates the search.
//!   It defines the [`engine::traits::ShootingEngine`] contract that external MD
//!   engines implement, the acceptance-criteria family, the resumable results
//!   logger, and the retry-governed shooting point sampler.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing layer.
//!   It runs several independent samplers concurrently against isolated engine
//!   instances and merges their records into one aggregate log.

pub mod core;
pub mod engine;
pub mod workflows;
