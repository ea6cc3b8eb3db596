//! The aimless shooting sampler state machine.
//!
//! One sampler owns one engine instance, one acceptor and one results logger.
//! It seeds its accepted-state pool from user-supplied initial guesses
//! (kickstart), then repeatedly perturbs velocities, shoots, and re-centers
//! on a frame strictly inside the previously sampled trajectory until the
//! requested number of accepted shooting points has been produced or a retry
//! budget is exhausted.

use crate::core::io::xyz;
use crate::core::models::{Frame, ShootingResult};
use crate::core::utils::masses::symbols_to_masses;
use crate::core::velocity::generate_velocities;
use crate::engine::acceptors::Acceptor;
use crate::engine::config::ShootingConfig;
use crate::engine::error::{EngineError, ShootingError};
use crate::engine::logger::ResultsLogger;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::traits::ShootingEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

const OFFSETS: [i8; 3] = [-1, 0, 1];

/// Picks the next starting configuration from an accepted shooting point.
///
/// The five time-ordered frames [reverse₂, reverse₁, start, forward₁,
/// forward₂] form the candidate sequence; the reverse frames are flipped so
/// the frame closest to t=0 sits next to the start. The offset shifts the
/// eligible window of three: −1 selects from the upper window (closer to the
/// forward side), 0 the centered window, +1 the lower. The pick is uniform
/// within the window, so the next start always lies strictly inside the
/// already-sampled trajectory.
pub fn pick_starting(
    start: &Frame,
    result: &ShootingResult,
    offset: i8,
    rng: &mut impl Rng,
) -> Frame {
    let sequence: [&Frame; 5] = [
        &result.reverse.frames[1],
        &result.reverse.frames[0],
        start,
        &result.forward.frames[0],
        &result.forward.frames[1],
    ];
    let candidate = [1i8, 2, 3][rng.gen_range(0..3)] - offset;
    sequence[candidate as usize].clone()
}

/// One independent aimless shooting search.
pub struct ShootingPointSampler<'a, E: ShootingEngine> {
    engine: E,
    acceptor: Box<dyn Acceptor>,
    logger: ResultsLogger,
    guess_dir: PathBuf,
    instance: usize,
    masses: Vec<f64>,
    pool: Vec<Frame>,
    current_start: Option<Frame>,
    offset: i8,
    rng: StdRng,
    reporter: &'a ProgressReporter<'a>,
}

impl<'a, E: ShootingEngine> ShootingPointSampler<'a, E> {
    /// Binds a sampler to an engine, acceptor and logger triple.
    ///
    /// `guess_dir` is only read when the accepted-state pool is empty, i.e.
    /// on the first [`run`](Self::run) of a fresh sampler.
    ///
    /// # Errors
    ///
    /// Fails if any of the engine's element symbols has no tabulated mass.
    pub fn new(
        engine: E,
        acceptor: Box<dyn Acceptor>,
        logger: ResultsLogger,
        guess_dir: PathBuf,
        instance: usize,
        reporter: &'a ProgressReporter<'a>,
    ) -> Result<Self, ShootingError> {
        let masses = symbols_to_masses(engine.atoms())?;
        Ok(Self {
            engine,
            acceptor,
            logger,
            guess_dir,
            instance,
            masses,
            pool: Vec::new(),
            current_start: None,
            offset: 0,
            rng: StdRng::from_entropy(),
            reporter,
        })
    }

    /// Replaces the sampler's random source, e.g. with a seeded generator.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Runs the search until `n_points` new accepted shooting points have
    /// been produced.
    ///
    /// Repeated calls continue from the existing accepted-state pool;
    /// kickstart only happens while the pool is empty.
    ///
    /// # Errors
    ///
    /// Fatal failures only: kickstart yielding an empty pool, exhaustion of
    /// the consecutive starting-configuration budget, malformed guesses, or
    /// logging failures. Per-attempt engine errors and rejected shooting
    /// points are absorbed by the retry budgets.
    #[instrument(skip_all, fields(instance = self.instance))]
    pub async fn run(&mut self, config: &ShootingConfig) -> Result<(), ShootingError> {
        if self.pool.is_empty() {
            self.kickstart(config.n_vel_tries).await?;
        }

        self.reporter.report(Progress::PhaseStart { name: "Sampling" });
        let mut produced = 0;
        let mut consecutive_failures = 0;

        while produced < config.n_points {
            if consecutive_failures >= config.n_state_tries {
                return Err(ShootingError::StateTriesExhausted {
                    tries: consecutive_failures,
                });
            }

            let start = match self.current_start.take() {
                Some(frame) => frame,
                None => self.random_pool_start(),
            };

            match self.attempt_configuration(&start, config.n_vel_tries).await? {
                Some(result) => {
                    self.pool.push(start.clone());
                    consecutive_failures = 0;
                    produced += 1;
                    self.current_start = Some(pick_starting(
                        &start,
                        &result,
                        self.offset,
                        &mut self.rng,
                    ));
                    info!(
                        produced,
                        requested = config.n_points,
                        "Accepted shooting point."
                    );
                    self.reporter.report(Progress::PointAccepted {
                        instance: self.instance,
                        index: self.logger.next_index().saturating_sub(1),
                    });
                }
                None => {
                    consecutive_failures += 1;
                    debug!(
                        consecutive_failures,
                        budget = config.n_state_tries,
                        "Starting configuration exhausted its velocity budget."
                    );
                }
            }
        }

        self.reporter.report(Progress::PhaseFinish);
        Ok(())
    }

    /// Seeds the accepted-state pool from the initial guess directory.
    ///
    /// Guesses are processed in sorted file-name order; a guess that yields
    /// an accepted shooting point within the velocity budget is appended to
    /// the pool (the guess itself, not the resulting frames).
    #[instrument(skip_all)]
    async fn kickstart(&mut self, n_vel_tries: usize) -> Result<(), ShootingError> {
        self.reporter.report(Progress::PhaseStart { name: "Kickstart" });

        let guesses = xyz::load_guess_dir(&self.guess_dir)?;
        let expected = self.engine.atoms().len();
        for (path, guess) in &guesses {
            if guess.n_particles() != expected {
                return Err(ShootingError::GuessParticleMismatch {
                    path: path.clone(),
                    expected,
                    actual: guess.n_particles(),
                });
            }
        }

        info!(guesses = guesses.len(), "Kickstarting from initial guesses.");
        for (path, guess) in guesses {
            if self
                .attempt_configuration(&guess, n_vel_tries)
                .await?
                .is_some()
            {
                debug!(guess = %path.display(), "Initial guess accepted into the pool.");
                self.pool.push(guess);
            } else {
                debug!(guess = %path.display(), "Initial guess was not accepted.");
            }
        }

        if self.pool.is_empty() {
            return Err(ShootingError::KickstartFailed);
        }
        self.reporter.report(Progress::PhaseFinish);
        Ok(())
    }

    /// Runs up to `n_vel_tries` velocity resamplings from one starting
    /// configuration. Returns the first accepted result, or `None` when the
    /// budget is exhausted.
    async fn attempt_configuration(
        &mut self,
        start: &Frame,
        n_vel_tries: usize,
    ) -> Result<Option<ShootingResult>, ShootingError> {
        for _ in 0..n_vel_tries {
            let outcome = self.attempt_once(start).await?;
            // The offset is re-rolled after every attempted shooting point,
            // accepted or not, so it never correlates with failure history.
            self.offset = OFFSETS[self.rng.gen_range(0..OFFSETS.len())];
            if outcome.is_some() {
                return Ok(outcome);
            }
        }
        Ok(None)
    }

    /// One velocity resampling and engine invocation.
    ///
    /// Engine failures during the shot are recoverable: they are logged and
    /// count against the velocity budget without producing a result row.
    /// Every well-formed result is recorded, accepted or not.
    async fn attempt_once(
        &mut self,
        start: &Frame,
    ) -> Result<Option<ShootingResult>, ShootingError> {
        let velocities =
            generate_velocities(&self.masses, self.engine.temperature(), &mut self.rng)?;

        match self.shoot(start, &velocities).await {
            Ok(result) => {
                let accepted = self.acceptor.is_accepted(&result);
                let box_dimensions = self.engine.box_dimensions();
                self.logger.log_result(
                    &result,
                    self.engine.atoms(),
                    start,
                    accepted,
                    box_dimensions,
                )?;
                if accepted {
                    Ok(Some(result))
                } else {
                    self.reporter.report(Progress::AttemptRejected {
                        instance: self.instance,
                    });
                    Ok(None)
                }
            }
            Err(error) if error.is_validation() => Err(error.into()),
            Err(error) => {
                warn!(
                    error = %error,
                    "Engine failed during shooting point; counting as a failed attempt."
                );
                Ok(None)
            }
        }
    }

    async fn shoot(
        &mut self,
        start: &Frame,
        velocities: &Frame,
    ) -> Result<ShootingResult, EngineError> {
        self.engine.set_positions(start)?;
        self.engine.set_velocities(velocities)?;
        self.engine.run_shooting_point().await
    }

    fn random_pool_start(&mut self) -> Frame {
        // Duplicates in the pool are kept by design: a configuration accepted
        // twice is twice as likely to be drawn here.
        let index = self.rng.gen_range(0..self.pool.len());
        self.pool[index].clone()
    }
}
