use crate::cli::OutputArgs;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::ProjectConfig;

/// Handles merging of CLI arguments with project configuration
///
/// Implements the precedence rule: CLI > config > None
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge output args with the project config
    ///
    /// CLI arguments take precedence over config values.
    pub fn merge_output_args(cli: &OutputArgs, config: Option<&ProjectConfig>) -> OutputArgs {
        let mut merged = cli.clone();

        if merged.results_dir.is_none() {
            merged.results_dir = config
                .and_then(|c| c.results_dir.as_deref())
                .map(expand_path);
        }

        merged
    }

    pub fn merge_bin_dir(cli: Option<&PathBuf>, config: Option<&ProjectConfig>) -> Option<PathBuf> {
        Self::merge_option(
            &cli.cloned(),
            config
                .and_then(|c| c.bin_dir.as_deref())
                .map(expand_path)
                .as_ref(),
        )
    }

    /// Special binaries declared in the config, on top of the built-in ones
    pub fn merge_special_binaries(
        defaults: BTreeMap<String, String>,
        config: Option<&ProjectConfig>,
    ) -> BTreeMap<String, String> {
        let mut merged = defaults;
        if let Some(overrides) = config.and_then(|c| c.special_binaries.as_ref()) {
            merged.extend(overrides.clone());
        }
        merged
    }

    /// Helper to merge Option values with precedence: CLI > config > None
    fn merge_option<T: Clone>(cli_value: &Option<T>, config_value: Option<&T>) -> Option<T> {
        cli_value.clone().or_else(|| config_value.cloned())
    }
}

// In the config file, a ~ is not expanded by any shell
fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
