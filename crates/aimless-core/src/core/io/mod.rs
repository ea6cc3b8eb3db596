//! # Core I/O Module
//!
//! File I/O for the XYZ snapshot format used throughout the sampler: initial
//! guess configurations are read from XYZ files, and every attempted shooting
//! point is appended to an XYZ trajectory log.

pub mod xyz;
