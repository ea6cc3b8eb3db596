//! # Workflows Module
//!
//! The public, user-facing entry points of the library. [`shoot`] runs N
//! independent aimless shooting samplers concurrently against isolated
//! engine instances and merges their records into one aggregate log.

pub mod shoot;
