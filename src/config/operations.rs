//! Config loading, validation, and construction of the runtime objects.

use super::model::Config;
use crate::error::{ExecError, Result};
use crate::exec::{CommandRunner, GraphRenderer};
use crate::namespace::Namespace;
use crate::resolve::SearchPath;
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ExecError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ExecError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ExecError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ExecError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// - `graphviz_program` must be non-empty
    /// - `timeout_seconds`, when set, must be positive
    /// - `environment` keys must be non-empty and must not contain `=`
    pub fn validate(&self) -> Result<()> {
        if self.graphviz_program.trim().is_empty() {
            return Err(ExecError::Config(
                "config validation failed: graphviz_program must be non-empty".to_string(),
            ));
        }

        if self.timeout_seconds == Some(0) {
            return Err(ExecError::Config(
                "config validation failed: timeout_seconds must be greater than 0 (omit it to wait indefinitely)"
                    .to_string(),
            ));
        }

        for key in self.environment.keys() {
            if key.is_empty() || key.contains('=') {
                return Err(ExecError::Config(format!(
                    "config validation failed: invalid environment variable name '{}'",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Search path described by this config.
    pub fn search_path(&self) -> SearchPath {
        match &self.search_path {
            Some(list) => SearchPath::parse(list),
            None => SearchPath::from_env(),
        }
    }

    /// Build a command runner with this config's search path, timeout and
    /// environment.
    pub fn runner(&self) -> CommandRunner {
        let runner = CommandRunner::with_resolver(self.search_path())
            .timeout(self.timeout_seconds.map(Duration::from_secs));

        self.environment
            .iter()
            .fold(runner, |runner, (key, value)| runner.env(key, value))
    }

    /// Build the template function namespace for this config.
    pub fn namespace(&self) -> Namespace {
        let runner = self.runner();
        let graphviz = GraphRenderer::with_program(runner.clone(), &self.graphviz_program);
        Namespace::with_parts(runner, graphviz)
    }
}
