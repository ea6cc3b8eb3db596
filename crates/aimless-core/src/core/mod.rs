//! # Core Module
//!
//! This module provides the fundamental building blocks for transition state
//! sampling, serving as the stateless foundation of the library.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules:
//!
//! - **Data Models** ([`models`]) - Configuration frames and two-sided shooting results
//! - **File I/O** ([`io`]) - XYZ frame parsing and writing for guesses and trajectory logs
//! - **Velocity Sampling** ([`velocity`]) - Maxwell-Boltzmann draws with exact momentum and temperature constraints
//! - **Utilities** ([`utils`]) - Atomic mass lookup tables

pub mod io;
pub mod models;
pub mod utils;
pub mod velocity;
