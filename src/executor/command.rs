use results_shared::ConfigurationId;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_BIN_DIR: &str = ".";

/// Binary running every data structure that has no dedicated binary
const GENERIC_BINARY: &str = "simpletest";
const MASSTREE: &str = "masstree";
const MASSTREE_BINARY: &str = "mttest";

/// An external benchmark invocation, as an argument vector
#[derive(Debug, Clone, PartialEq)]
pub struct BenchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl BenchCommand {
    /// POSIX shell rendering of the command, for logs and for reproducing a run by hand
    pub fn to_shell_string(&self) -> String {
        let program = self.program.to_string_lossy();
        shell_words::join(
            std::iter::once(program.as_ref()).chain(self.args.iter().map(String::as_str)),
        )
    }

    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for BenchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell_string())
    }
}

/// Maps a configuration to the benchmark binary that runs it.
///
/// Data structures listed in `special_binaries` have their own binary, which only takes the
/// thread count and the tests. Every other one goes through the generic binary, selected with
/// `-p <name>`.
#[derive(Debug, Clone)]
pub struct CommandResolver {
    bin_dir: PathBuf,
    special_binaries: BTreeMap<String, String>,
}

impl Default for CommandResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BIN_DIR, Self::default_special_binaries())
    }
}

impl CommandResolver {
    pub fn new(bin_dir: impl Into<PathBuf>, special_binaries: BTreeMap<String, String>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            special_binaries,
        }
    }

    pub fn default_special_binaries() -> BTreeMap<String, String> {
        BTreeMap::from([(MASSTREE.to_string(), MASSTREE_BINARY.to_string())])
    }

    pub fn resolve(&self, config: &ConfigurationId, tests: &str) -> BenchCommand {
        let threads_arg = format!("-j{}", config.threads());

        match self.special_binaries.get(config.name()) {
            Some(binary) => BenchCommand {
                program: self.bin_dir.join(binary),
                args: vec![threads_arg, tests.to_string()],
            },
            None => BenchCommand {
                program: self.bin_dir.join(GENERIC_BINARY),
                args: vec![
                    threads_arg,
                    "-p".to_string(),
                    config.name().to_string(),
                    tests.to_string(),
                ],
            },
        }
    }
}
