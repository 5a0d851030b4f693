use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Project-level configuration from a dsbench.yaml file
///
/// This configuration provides default options for the run and report commands.
/// CLI arguments always take precedence over config file values.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory in which run directories are created (e.g. "./test_results")
    pub results_dir: Option<String>,
    /// Directory holding the benchmark binaries
    pub bin_dir: Option<String>,
    /// Configuration names that run a dedicated binary instead of the generic one,
    /// mapped to the binary file name
    pub special_binaries: Option<BTreeMap<String, String>>,
}
