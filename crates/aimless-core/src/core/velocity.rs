//! Maxwell-Boltzmann velocity sampling with exact physical constraints.
//!
//! Raw per-axis draws follow Normal(0, sqrt(kB·T/m)); the sampled set is then
//! corrected so that the net momentum is exactly zero and the instantaneous
//! kinetic temperature exactly matches the request, not merely in
//! expectation.

use crate::core::models::Frame;
use nalgebra::Vector3;
use rand::Rng;
use rand_distr::StandardNormal;
use thiserror::Error;

/// Boltzmann constant in amu·Å²·fs⁻²·K⁻¹, matching masses in amu,
/// positions in Å and time in fs.
pub const BOLTZMANN: f64 = 8.314462618e-7;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum VelocityError {
    #[error("Temperature must be positive, got {0}")]
    NonPositiveTemperature(f64),

    #[error("Mass of particle {index} must be positive, got {mass}")]
    NonPositiveMass { index: usize, mass: f64 },

    #[error("Cannot generate velocities for zero particles")]
    NoParticles,
}

/// Number of kinetic degrees of freedom for `n` particles.
///
/// Translational and rotational modes are removed for n ≥ 3; smaller systems
/// fall back to a single degree of freedom.
fn degrees_of_freedom(n: usize) -> f64 {
    if n >= 3 { (3 * n - 6) as f64 } else { 1.0 }
}

/// Samples a zero-net-momentum, temperature-exact velocity assignment.
///
/// # Arguments
///
/// * `masses` - Per-particle masses in amu, ordered like the engine's particle list.
/// * `temperature` - Target temperature in K.
/// * `rng` - Source of randomness; inject a seeded generator for reproducible runs.
///
/// # Errors
///
/// Returns an error for an empty particle list, a non-positive temperature,
/// or a non-positive mass.
pub fn generate_velocities(
    masses: &[f64],
    temperature: f64,
    rng: &mut impl Rng,
) -> Result<Frame, VelocityError> {
    if masses.is_empty() {
        return Err(VelocityError::NoParticles);
    }
    if temperature <= 0.0 {
        return Err(VelocityError::NonPositiveTemperature(temperature));
    }
    if let Some((index, &mass)) = masses.iter().enumerate().find(|&(_, &m)| m <= 0.0) {
        return Err(VelocityError::NonPositiveMass { index, mass });
    }

    let mut rows: Vec<Vector3<f64>> = masses
        .iter()
        .map(|&mass| {
            let sigma = (BOLTZMANN * temperature / mass).sqrt();
            Vector3::new(
                sigma * rng.sample::<f64, _>(StandardNormal),
                sigma * rng.sample::<f64, _>(StandardNormal),
                sigma * rng.sample::<f64, _>(StandardNormal),
            )
        })
        .collect();

    // Remove the center-of-mass drift: subtracting the momentum-weighted mean
    // velocity from every particle cancels the total momentum exactly. A
    // single particle would be zeroed outright, so it keeps its raw draw.
    let total_mass: f64 = masses.iter().sum();
    if masses.len() > 1 {
        let momentum: Vector3<f64> = masses
            .iter()
            .zip(rows.iter())
            .map(|(&mass, v)| mass * v)
            .sum();
        let drift = momentum / total_mass;
        for row in &mut rows {
            *row -= drift;
        }
    }

    // Rescale so the instantaneous kinetic temperature is exact.
    let twice_kinetic: f64 = masses
        .iter()
        .zip(rows.iter())
        .map(|(&mass, v)| mass * v.norm_squared())
        .sum();
    let instantaneous = twice_kinetic / (degrees_of_freedom(masses.len()) * BOLTZMANN);
    let scale = (temperature / instantaneous).sqrt();
    for row in &mut rows {
        *row *= scale;
    }

    Ok(Frame::new(rows))
}

/// Instantaneous kinetic temperature of a velocity assignment in K.
pub fn kinetic_temperature(masses: &[f64], velocities: &Frame) -> f64 {
    let twice_kinetic: f64 = masses
        .iter()
        .zip(velocities.iter())
        .map(|(&mass, v)| mass * v.norm_squared())
        .sum();
    twice_kinetic / (degrees_of_freedom(masses.len()) * BOLTZMANN)
}
