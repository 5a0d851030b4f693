use crate::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_RESULTS_DIR: &str = "./test_results";

const RESULTS_FILE_PREFIX: &str = "results_";
/// Hex digits of the name hash appended to sanitized chart names
const NAME_HASH_LEN: usize = 8;

lazy_static! {
    static ref UNSAFE_FILE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]").unwrap();
}

/// Every output path of one run
///
/// All files of a run live in a single run directory and carry the run id in their name, so
/// several runs can share the same results directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsLayout {
    run_dir: PathBuf,
    run_id: String,
}

impl ResultsLayout {
    pub fn new(results_dir: impl AsRef<Path>, run_id: impl Into<String>) -> Self {
        let run_id = run_id.into();
        Self {
            run_dir: results_dir.as_ref().join(&run_id),
            run_id,
        }
    }

    /// Layout of an existing run, rooted in the directory of its results file.
    ///
    /// The run id is recovered from a `results_<id>.json` file name, and falls back to
    /// `run_id` then to a fresh id.
    pub fn for_results_file(results_file: &Path, run_id: Option<String>) -> Self {
        let run_dir = results_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let run_id = run_id
            .or_else(|| {
                results_file
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| stem.strip_prefix(RESULTS_FILE_PREFIX))
                    .filter(|id| !id.is_empty())
                    .map(str::to_owned)
            })
            .unwrap_or_else(default_run_id);

        Self { run_dir, run_id }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn results_file(&self) -> PathBuf {
        self.run_dir
            .join(format!("{RESULTS_FILE_PREFIX}{}.json", self.run_id))
    }

    pub fn raw_log(&self) -> PathBuf {
        self.run_dir.join(format!("raw_{}.txt", self.run_id))
    }

    pub fn harness_log(&self) -> PathBuf {
        self.run_dir.join(format!("harness_{}.log", self.run_id))
    }

    /// Chart file of `test`.
    ///
    /// A name altered by sanitization carries a hash of the original, so that `rw 1` and
    /// `rw_1` get distinct files.
    pub fn chart_path(&self, test: &str) -> PathBuf {
        self.run_dir
            .join(format!("fig_{}_{}.svg", self.run_id, chart_file_component(test)))
    }

    pub fn create(&self) -> Result<()> {
        std::fs::create_dir_all(&self.run_dir).with_context(|| {
            format!(
                "Failed to create the run directory {}",
                self.run_dir.display()
            )
        })
    }
}

pub fn default_run_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
        .to_string()
}

fn sanitize_file_component(name: &str) -> String {
    UNSAFE_FILE_CHARS.replace_all(name, "_").into_owned()
}

fn chart_file_component(test: &str) -> String {
    let sanitized = sanitize_file_component(test);
    if sanitized == test {
        return sanitized;
    }
    let name_hash = sha256::digest(test);
    format!("{sanitized}_{}", &name_hash[..NAME_HASH_LEN])
}
