use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{0}' must be at least 1")]
    MustBeAtLeastOne(&'static str),
}

/// Budgets for one aimless shooting run.
///
/// `n_points` is the number of new accepted shooting points to produce.
/// `n_vel_tries` bounds velocity resamplings per starting configuration and
/// `n_state_tries` bounds consecutive starting configurations that exhaust
/// their velocity budget before the run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShootingConfig {
    pub n_points: usize,
    pub n_state_tries: usize,
    pub n_vel_tries: usize,
}

impl ShootingConfig {
    /// Validates and builds a configuration; every budget must be ≥ 1.
    pub fn new(
        n_points: usize,
        n_state_tries: usize,
        n_vel_tries: usize,
    ) -> Result<Self, ConfigError> {
        if n_points < 1 {
            return Err(ConfigError::MustBeAtLeastOne("n_points"));
        }
        if n_state_tries < 1 {
            return Err(ConfigError::MustBeAtLeastOne("n_state_tries"));
        }
        if n_vel_tries < 1 {
            return Err(ConfigError::MustBeAtLeastOne("n_vel_tries"));
        }
        Ok(Self {
            n_points,
            n_state_tries,
            n_vel_tries,
        })
    }
}
