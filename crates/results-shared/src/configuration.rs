use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = ':';

/// A data-structure implementation paired with the thread count it is benchmarked with.
///
/// The canonical textual form is `<name>:<threads>`, e.g. `art:4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigurationId {
    name: String,
    threads: u32,
}

impl ConfigurationId {
    pub fn new(name: impl Into<String>, threads: u32) -> Self {
        Self {
            name: name.into(),
            threads,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threads(&self) -> u32 {
        self.threads
    }
}

impl FromStr for ConfigurationId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        let [name, threads] = parts.as_slice() else {
            bail!("Invalid configuration `{s}`: expected the `<name>:<threads>` format");
        };

        ensure!(
            !name.is_empty(),
            "Invalid configuration `{s}`: the name is empty"
        );
        ensure!(
            !threads.is_empty() && threads.bytes().all(|b| b.is_ascii_digit()),
            "Invalid configuration `{s}`: the thread count `{threads}` is not a non-negative integer"
        );
        let threads = threads.parse::<u32>().map_err(|e| {
            anyhow::anyhow!("Invalid configuration `{s}`: the thread count is out of range: {e}")
        })?;

        Ok(Self::new(*name, threads))
    }
}

impl TryFrom<String> for ConfigurationId {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        value.parse()
    }
}

impl From<ConfigurationId> for String {
    fn from(value: ConfigurationId) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.name, self.threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("art:4", "art", 4)]
    #[case("masstree:8", "masstree", 8)]
    #[case("  mbtree:0 ", "mbtree", 0)]
    #[case("art:0016", "art", 16)]
    fn test_parse_valid(#[case] input: &str, #[case] name: &str, #[case] threads: u32) {
        let config: ConfigurationId = input.parse().unwrap();
        assert_eq!(config.name(), name);
        assert_eq!(config.threads(), threads);
    }

    #[rstest]
    #[case("art:four")]
    #[case("art")]
    #[case("art:")]
    #[case(":4")]
    #[case("art:4:2")]
    #[case("art:-4")]
    #[case("art:+4")]
    #[case("art:4.0")]
    #[case("art:99999999999")]
    #[case("")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<ConfigurationId>().is_err());
    }

    #[test]
    fn test_non_numeric_threads_message() {
        let err = "art:four".parse::<ConfigurationId>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration `art:four`: the thread count `four` is not a non-negative integer"
        );
    }

    #[test]
    fn test_display_is_canonical() {
        let config: ConfigurationId = " art:004".parse().unwrap();
        assert_eq!(config.to_string(), "art:4");
    }

    #[test]
    fn test_serde_as_string() {
        let config = ConfigurationId::new("masstree", 8);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#""masstree:8""#);
        assert_eq!(
            serde_json::from_str::<ConfigurationId>(&json).unwrap(),
            config
        );
        assert!(serde_json::from_str::<ConfigurationId>(r#""masstree:x""#).is_err());
    }
}
