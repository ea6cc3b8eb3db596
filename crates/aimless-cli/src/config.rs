use crate::error::{CliError, Result};
use aimless::engine::acceptors::AcceptorConfig;
use aimless::engine::config::ShootingConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level TOML configuration for a shooting run.
///
/// ```toml
/// [engine]
/// engine = "cp2k"
/// # further keys are passed through to the engine integration
///
/// [aimless]
/// starts-dir = "guesses"
/// output-name = "results"
/// n-parallel = 4
/// n-points = 100
/// n-state-tries = 10
/// n-vel-tries = 5
///
/// [aimless.acceptor]
/// type = "multibasin"
/// reactants = [1]
/// products = [2, 3]
/// ```
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub engine: EngineSection,
    pub aimless: AimlessSection,
}

/// Engine selection plus whatever keys the chosen integration needs.
///
/// Only `engine` is interpreted here; everything else is kept as raw TOML
/// and handed to the integration unchanged.
#[derive(Deserialize, Debug)]
pub struct EngineSection {
    pub engine: String,
    #[serde(flatten)]
    pub extra: toml::Table,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AimlessSection {
    pub starts_dir: PathBuf,
    pub output_name: String,
    pub n_parallel: usize,
    pub n_points: usize,
    pub n_state_tries: usize,
    pub n_vel_tries: usize,
    pub acceptor: Option<AcceptorConfig>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from '{}'.", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|source| CliError::FileParsing {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.engine.trim().is_empty() {
            return Err(CliError::Config(
                "'engine.engine' must name an engine integration".to_string(),
            ));
        }
        if self.aimless.n_parallel < 1 {
            return Err(CliError::Config(
                "'aimless.n-parallel' must be at least 1".to_string(),
            ));
        }
        // Budget checks live in the core type; surface them as config errors.
        self.aimless
            .shooting_config()
            .map_err(|e| CliError::Config(e.to_string()))?;
        if !self.aimless.starts_dir.is_dir() {
            return Err(CliError::Config(format!(
                "'aimless.starts-dir' is not a directory: '{}'",
                self.aimless.starts_dir.display()
            )));
        }
        Ok(())
    }
}

impl AimlessSection {
    pub fn shooting_config(
        &self,
    ) -> std::result::Result<ShootingConfig, aimless::engine::config::ConfigError> {
        ShootingConfig::new(self.n_points, self.n_state_tries, self.n_vel_tries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    fn valid_body(starts_dir: &Path) -> String {
        format!(
            r#"
[engine]
engine = "cp2k"
cmd = "mpirun cp2k.psmp"

[aimless]
starts-dir = "{}"
output-name = "results"
n-parallel = 2
n-points = 50
n-state-tries = 10
n-vel-tries = 5
"#,
            starts_dir.display()
        )
    }

    #[test]
    fn valid_config_loads_and_builds_core_settings() {
        let dir = tempfile::tempdir().unwrap();
        let starts = dir.path().join("guesses");
        fs::create_dir(&starts).unwrap();
        let path = write_config(dir.path(), &valid_body(&starts));

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.engine.engine, "cp2k");
        assert_eq!(
            config.engine.extra.get("cmd").and_then(|v| v.as_str()),
            Some("mpirun cp2k.psmp")
        );
        assert_eq!(config.aimless.n_parallel, 2);
        assert!(config.aimless.acceptor.is_none());

        let shooting = config.aimless.shooting_config().unwrap();
        assert_eq!(shooting.n_points, 50);
        assert_eq!(shooting.n_state_tries, 10);
        assert_eq!(shooting.n_vel_tries, 5);
    }

    #[test]
    fn multibasin_acceptor_parses_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let starts = dir.path().join("guesses");
        fs::create_dir(&starts).unwrap();
        let mut body = valid_body(&starts);
        body.push_str(
            r#"
[aimless.acceptor]
type = "multibasin"
reactants = [1]
products = [2, 3]
"#,
        );
        let path = write_config(dir.path(), &body);

        let config = AppConfig::load(&path).unwrap();
        let acceptor = config.aimless.acceptor.expect("acceptor section parsed");
        acceptor.build().unwrap();
    }

    #[test]
    fn malformed_toml_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "not = [valid");

        let result = AppConfig::load(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn zero_budget_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let starts = dir.path().join("guesses");
        fs::create_dir(&starts).unwrap();
        let body = valid_body(&starts).replace("n-vel-tries = 5", "n-vel-tries = 0");
        let path = write_config(dir.path(), &body);

        let result = AppConfig::load(&path);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn missing_starts_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let body = valid_body(&dir.path().join("does-not-exist"));
        let path = write_config(dir.path(), &body);

        let result = AppConfig::load(&path);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
