use crate::cli::ShootArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use tracing::info;

/// Runs the `shoot` subcommand.
///
/// Loads and validates the TOML configuration, then hands off to the engine
/// integration named in `[engine]`. Integrations register here by matching on
/// the configured name, building an `EngineFactory` from the `[engine]` table,
/// and calling `aimless::workflows::shoot::run` with the resolved settings.
pub async fn run(args: ShootArgs) -> Result<()> {
    let config = AppConfig::load(&args.config)?;
    let shooting = config
        .aimless
        .shooting_config()
        .map_err(|e| CliError::Config(e.to_string()))?;

    info!(
        engine = %config.engine.engine,
        starts_dir = %config.aimless.starts_dir.display(),
        output = %config.aimless.output_name,
        n_parallel = config.aimless.n_parallel,
        n_points = shooting.n_points,
        seed = ?args.seed,
        "Resolved shooting run configuration."
    );

    // No engine integrations ship with this binary. Each integration is a
    // separate crate linking against the `aimless` library; dispatch on the
    // configured name here when adding one.
    Err(CliError::UnsupportedEngine(config.engine.engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn config_file(dir: &std::path::Path) -> PathBuf {
        let starts = dir.join("guesses");
        fs::create_dir(&starts).unwrap();
        let path = dir.join("config.toml");
        fs::write(
            &path,
            format!(
                r#"
[engine]
engine = "cp2k"

[aimless]
starts-dir = "{}"
output-name = "results"
n-parallel = 1
n-points = 10
n-state-tries = 5
n-vel-tries = 3
"#,
                starts.display()
            ),
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn unknown_engine_name_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let args = ShootArgs {
            config: config_file(dir.path()),
            seed: None,
        };

        let result = run(args).await;
        assert!(
            matches!(result, Err(CliError::UnsupportedEngine(name)) if name == "cp2k")
        );
    }

    #[tokio::test]
    async fn missing_config_file_is_an_io_error() {
        let args = ShootArgs {
            config: PathBuf::from("/no/such/config.toml"),
            seed: None,
        };

        let result = run(args).await;
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
