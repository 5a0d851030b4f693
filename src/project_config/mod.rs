use crate::prelude::*;
use std::fs;
use std::path::Path;

mod interfaces;
pub mod merger;

pub use interfaces::*;

/// Config file names in priority order
const CONFIG_FILENAMES: &[&str] = &[
    "dsbench.yaml",
    "dsbench.yml",
    ".dsbench.yaml",
    ".dsbench.yml",
];

impl ProjectConfig {
    /// Discover and load project configuration file
    ///
    /// # Search Strategy
    /// 1. If `config_path_override` is provided, load from that path only (error if not found)
    /// 2. Otherwise, try the filenames of `CONFIG_FILENAMES` in `current_dir`, in priority order
    ///
    /// # Returns
    /// * `Ok(Some(config))` - Config found and loaded successfully
    /// * `Ok(None)` - No config file found
    /// * `Err(_)` - Error loading or parsing config
    pub fn discover_and_load(
        config_path_override: Option<&Path>,
        current_dir: &Path,
    ) -> Result<Option<ProjectConfig>> {
        if let Some(config_path) = config_path_override {
            let config = Self::load_from_path(config_path)
                .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
            return Ok(Some(config));
        }

        for filename in CONFIG_FILENAMES {
            let candidate_path = current_dir.join(filename);
            if candidate_path.exists() {
                debug!("Found config file at {}", candidate_path.display());
                return Self::load_from_path(&candidate_path).map(Some);
            }
        }

        Ok(None)
    }

    /// Load and parse config from a specific path
    fn load_from_path(path: &Path) -> Result<Self> {
        let config_content = fs::read(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: Self = serde_yaml::from_slice(&config_content).with_context(|| {
            format!("Failed to parse dsbench project config at {}", path.display())
        })?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, binary) in self.special_binaries.iter().flatten() {
            ensure!(
                !name.is_empty() && !name.contains(':'),
                "Invalid special-binaries entry `{name}`: expected a data structure name"
            );
            ensure!(
                !binary.trim().is_empty(),
                "Invalid special-binaries entry `{name}`: the binary name is empty"
            );
        }
        Ok(())
    }
}
