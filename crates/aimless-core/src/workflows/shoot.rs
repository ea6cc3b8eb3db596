use crate::engine::acceptors::{Acceptor, AcceptorConfig, DefaultAcceptor};
use crate::engine::config::{ConfigError, ShootingConfig};
use crate::engine::error::ShootingError;
use crate::engine::logger::ResultsLogger;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sampler::ShootingPointSampler;
use crate::engine::traits::EngineFactory;
use futures::future::try_join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

/// Runs `n_parallel` independent aimless shooting searches concurrently.
///
/// Each instance gets a fresh engine from the factory, a fresh acceptor from
/// the configuration, and its own `<output_name><i>` log pair whose records
/// are also forwarded to the shared `<output_name>` aggregate pair. The
/// instances run as cooperative tasks joined on the caller's scheduler; the
/// only shared mutable resource is the aggregate logger, which serializes
/// appends behind a mutex.
///
/// When `seed` is given, instance `i` samples from a generator seeded with
/// `seed + i`, which makes single-instance runs reproducible (the interleaving
/// across instances still depends on engine completion order).
///
/// # Errors
///
/// The first fatal sampler error (kickstart failure, state-try exhaustion,
/// logging failure) resolves the join: it is returned to the caller and the
/// remaining sampler futures are dropped without finishing their current
/// attempt.
#[instrument(skip_all, fields(n_parallel))]
pub async fn run<F: EngineFactory>(
    factory: &F,
    acceptor: Option<&AcceptorConfig>,
    guess_dir: &Path,
    output_name: &str,
    n_parallel: usize,
    config: &ShootingConfig,
    seed: Option<u64>,
    reporter: &ProgressReporter<'_>,
) -> Result<(), ShootingError> {
    if n_parallel < 1 {
        return Err(ConfigError::MustBeAtLeastOne("n_parallel").into());
    }

    reporter.report(Progress::PhaseStart {
        name: "Aimless Shooting",
    });
    info!(
        n_parallel,
        n_points = config.n_points,
        output = output_name,
        "Starting parallel aimless shooting run."
    );

    let aggregate = Arc::new(Mutex::new(ResultsLogger::new(output_name)?));

    let mut samplers = Vec::with_capacity(n_parallel);
    for instance in 0..n_parallel {
        let engine = factory.create()?;
        let acceptor: Box<dyn Acceptor> = match acceptor {
            Some(acceptor_config) => acceptor_config.build()?,
            None => Box::new(DefaultAcceptor),
        };
        let logger = ResultsLogger::with_parent(
            &format!("{output_name}{instance}"),
            Arc::clone(&aggregate),
        )?;
        let mut sampler = ShootingPointSampler::new(
            engine,
            acceptor,
            logger,
            guess_dir.to_path_buf(),
            instance,
            reporter,
        )?;
        if let Some(seed) = seed {
            sampler = sampler.with_rng(StdRng::seed_from_u64(seed.wrapping_add(instance as u64)));
        }
        samplers.push(sampler);
    }

    try_join_all(samplers.iter_mut().map(|sampler| sampler.run(config))).await?;

    info!("All sampler instances finished.");
    reporter.report(Progress::PhaseFinish);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Frame, ShootingResult, TrajectoryOutcome};
    use crate::engine::error::EngineError;
    use crate::engine::traits::{ShootingEngine, validate_frame};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn flat_frame(value: f64) -> Frame {
        Frame::from_rows(&[[value, 0.0, 0.0], [value, 0.0, 0.0], [value, 0.0, 0.0]])
    }

    fn committing_result(forward: i64, reverse: i64) -> ShootingResult {
        ShootingResult {
            forward: TrajectoryOutcome {
                commit: Some(forward),
                frames: [flat_frame(1.0), flat_frame(2.0)],
            },
            reverse: TrajectoryOutcome {
                commit: Some(reverse),
                frames: [flat_frame(-1.0), flat_frame(-2.0)],
            },
        }
    }

    fn non_committing_result() -> ShootingResult {
        ShootingResult {
            forward: TrajectoryOutcome {
                commit: None,
                frames: [flat_frame(1.0), flat_frame(2.0)],
            },
            reverse: TrajectoryOutcome {
                commit: None,
                frames: [flat_frame(-1.0), flat_frame(-2.0)],
            },
        }
    }

    struct ScriptedEngine {
        atoms: Vec<String>,
        script: VecDeque<Result<ShootingResult, EngineError>>,
    }

    #[async_trait]
    impl ShootingEngine for ScriptedEngine {
        fn atoms(&self) -> &[String] {
            &self.atoms
        }

        fn temperature(&self) -> f64 {
            300.0
        }

        fn box_dimensions(&self) -> [f64; 3] {
            [10.0, 10.0, 10.0]
        }

        fn set_positions(&mut self, positions: &Frame) -> Result<(), EngineError> {
            validate_frame(self.atoms.len(), positions)
        }

        fn set_velocities(&mut self, velocities: &Frame) -> Result<(), EngineError> {
            validate_frame(self.atoms.len(), velocities)
        }

        async fn run_shooting_point(&mut self) -> Result<ShootingResult, EngineError> {
            self.script
                .pop_front()
                .unwrap_or_else(|| Err(EngineError::Simulation("script exhausted".to_string())))
        }
    }

    /// Hands each created instance the next script in line.
    struct ScriptedFactory {
        scripts: RefCell<VecDeque<Vec<Result<ShootingResult, EngineError>>>>,
    }

    impl EngineFactory for ScriptedFactory {
        type Engine = ScriptedEngine;

        fn create(&self) -> Result<Self::Engine, EngineError> {
            let script = self
                .scripts
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| EngineError::Initialization("no script left".to_string()))?;
            Ok(ScriptedEngine {
                atoms: vec!["Ar".to_string(); 3],
                script: script.into(),
            })
        }
    }

    fn guess_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("guess.xyz"),
            "3\nguess\nAr 0.0 0.0 0.0\nAr 0.0 0.0 0.0\nAr 0.0 0.0 0.0\n",
        )
        .unwrap();
        dir
    }

    fn read_forward_basins(name: &str) -> Vec<String> {
        let mut reader = csv::Reader::from_path(format!("{name}.csv")).unwrap();
        reader
            .records()
            .map(|record| record.unwrap()[2].to_string())
            .collect()
    }

    #[tokio::test]
    async fn parallel_run_merges_instance_logs_into_the_aggregate() {
        let guesses = guess_dir();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("results").display().to_string();
        let accepted_events = AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if matches!(event, Progress::PointAccepted { .. }) {
                accepted_events.fetch_add(1, Ordering::Relaxed);
            }
        }));

        // Instance i tags every result with forward basin 10 + i; each script
        // covers one kickstart attempt plus two sampled points.
        let scripts = (0..3i64)
            .map(|i| {
                vec![
                    Ok(committing_result(10 + i, 1)),
                    Ok(committing_result(10 + i, 1)),
                    Ok(committing_result(10 + i, 1)),
                ]
            })
            .collect();
        let factory = ScriptedFactory {
            scripts: RefCell::new(scripts),
        };

        let config = ShootingConfig::new(2, 3, 2).unwrap();
        run(
            &factory,
            None,
            guesses.path(),
            &output,
            3,
            &config,
            Some(7),
            &reporter,
        )
        .await
        .unwrap();

        let aggregate = read_forward_basins(&output);
        assert_eq!(aggregate.len(), 9);
        // Two sampled points per instance pass through the reporter; the
        // kickstart acceptances do not count toward n_points.
        assert_eq!(accepted_events.load(Ordering::Relaxed), 6);

        for i in 0..3 {
            let instance = read_forward_basins(&format!("{output}{i}"));
            assert_eq!(instance.len(), 3);
            let tag = (10 + i).to_string();
            assert!(instance.iter().all(|basin| *basin == tag));
            // Every instance row is present in the aggregate.
            assert_eq!(aggregate.iter().filter(|basin| **basin == tag).count(), 3);
        }
    }

    #[tokio::test]
    async fn fatal_error_in_one_instance_resolves_the_run() {
        let guesses = guess_dir();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("results").display().to_string();
        let reporter = ProgressReporter::new();

        // The second instance never commits, so its kickstart fails.
        let scripts = VecDeque::from(vec![
            vec![
                Ok(committing_result(1, 2)),
                Ok(committing_result(1, 2)),
            ],
            vec![Ok(non_committing_result()), Ok(non_committing_result())],
        ]);
        let factory = ScriptedFactory {
            scripts: RefCell::new(scripts),
        };

        let config = ShootingConfig::new(1, 3, 2).unwrap();
        let result = run(
            &factory,
            None,
            guesses.path(),
            &output,
            2,
            &config,
            Some(7),
            &reporter,
        )
        .await;

        assert!(matches!(result, Err(ShootingError::KickstartFailed)));
    }

    #[tokio::test]
    async fn zero_parallelism_is_rejected() {
        let guesses = guess_dir();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("results").display().to_string();
        let reporter = ProgressReporter::new();

        let factory = ScriptedFactory {
            scripts: RefCell::new(VecDeque::new()),
        };
        let config = ShootingConfig::new(1, 1, 1).unwrap();

        let result = run(
            &factory,
            None,
            guesses.path(),
            &output,
            0,
            &config,
            None,
            &reporter,
        )
        .await;

        assert!(matches!(
            result,
            Err(ShootingError::Config(ConfigError::MustBeAtLeastOne(
                "n_parallel"
            )))
        ));
    }
}
