use crate::{ConfigurationId, RawRecord};
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Records of one test, keyed by the configuration that produced them
pub type ConfigurationCells = IndexMap<String, Vec<RawRecord>>;

/// Every record observed during a harness invocation, grouped by test then by configuration.
///
/// Keys keep their first-seen order and records keep their observation order. The JSON
/// representation is the bare two-level map, which is also the format of the persisted
/// results file, so a store reloaded from disk is indistinguishable from the live one.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregationStore {
    tests: IndexMap<String, ConfigurationCells>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the `(test, config)` cell, creating the cell on first use.
    pub fn insert(&mut self, test: &str, config: &ConfigurationId, record: RawRecord) {
        self.tests
            .entry(test.to_owned())
            .or_default()
            .entry(config.to_string())
            .or_default()
            .push(record);
    }

    pub fn cell(&self, test: &str, config: &str) -> Option<&[RawRecord]> {
        self.tests
            .get(test)
            .and_then(|cells| cells.get(config))
            .map(Vec::as_slice)
    }

    pub fn tests(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigurationCells> {
        self.tests.iter()
    }

    /// Total number of records across all cells
    pub fn len(&self) -> usize {
        self.tests
            .values()
            .flat_map(|cells| cells.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize the results")
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("Failed to deserialize the results")
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create results directory: {}", parent.display())
            })?;
        }

        std::fs::write(path, self.to_json_pretty()?)
            .with_context(|| format!("Failed to write results file: {}", path.display()))?;
        log::debug!("Saved {} records to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read results file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid results file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(json: &str) -> RawRecord {
        RawRecord::from_json_str(json).unwrap()
    }

    fn populated_store() -> AggregationStore {
        let art = ConfigurationId::new("art", 4);
        let masstree = ConfigurationId::new("masstree", 4);

        let mut store = AggregationStore::new();
        store.insert("rw1", &masstree, record(r#"{"test":"rw1","ops_per_sec":10}"#));
        store.insert("rw1", &art, record(r#"{"test":"rw1","ops_per_sec":20}"#));
        store.insert("rw1", &masstree, record(r#"{"test":"rw1","ops_per_sec":30}"#));
        store.insert("same", &art, record(r#"{"test":"same","puts_per_sec":5}"#));
        store
    }

    #[test]
    fn test_insert_creates_cells() {
        let store = populated_store();

        assert_eq!(store.len(), 4);
        assert_eq!(store.tests().collect::<Vec<_>>(), vec!["rw1", "same"]);
        assert_eq!(store.cell("rw1", "masstree:4").unwrap().len(), 2);
        assert_eq!(store.cell("rw1", "art:4").unwrap().len(), 1);
        assert!(store.cell("rw1", "art:8").is_none());
        assert!(store.cell("missing", "art:4").is_none());
    }

    #[test]
    fn test_insert_keeps_observation_order() {
        let store = populated_store();
        let values: Vec<_> = store
            .cell("rw1", "masstree:4")
            .unwrap()
            .iter()
            .map(|r| r.get("ops_per_sec").unwrap().as_i64().unwrap())
            .collect();
        assert_eq!(values, vec![10, 30]);

        let (_, cells) = store.iter().next().unwrap();
        assert_eq!(
            cells.keys().collect::<Vec<_>>(),
            vec!["masstree:4", "art:4"]
        );
    }

    #[test]
    fn test_empty_store() {
        let store = AggregationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.to_json_pretty().unwrap(), "{}");
    }

    #[test]
    fn test_json_layout() {
        let store = populated_store();
        insta::assert_snapshot!(serde_json::to_string(&store).unwrap(), @r#"{"rw1":{"masstree:4":[{"test":"rw1","ops_per_sec":10},{"test":"rw1","ops_per_sec":30}],"art:4":[{"test":"rw1","ops_per_sec":20}]},"same":{"art:4":[{"test":"same","puts_per_sec":5}]}}"#);
    }

    #[test]
    fn test_round_trip() {
        let store = populated_store();
        let reloaded = AggregationStore::from_json(&store.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reloaded, store);
        assert_eq!(
            reloaded.to_json_pretty().unwrap(),
            store.to_json_pretty().unwrap()
        );
    }

    #[test]
    fn test_round_trip_keeps_float_bits() {
        let config = ConfigurationId::new("art", 4);
        let mut store = AggregationStore::new();
        for value in ["1.0715660391465826e-75", "0.1", "123456.789", "1e300"] {
            store.insert(
                "t1",
                &config,
                record(&format!(r#"{{"test":"t1","ops_per_sec":{value}}}"#)),
            );
        }

        let reloaded = AggregationStore::from_json(&store.to_json_pretty().unwrap()).unwrap();

        assert_eq!(reloaded, store);
        let bits = |store: &AggregationStore| {
            store
                .cell("t1", "art:4")
                .unwrap()
                .iter()
                .map(|r| r.metric(crate::Metric::OpsPerSec).unwrap().to_bits())
                .collect::<Vec<_>>()
        };
        assert_eq!(bits(&reloaded), bits(&store));
        assert_eq!(
            f64::from_bits(bits(&store)[0]),
            1.0715660391465826e-75_f64
        );
    }

    #[test]
    fn test_from_json_rejects_records_without_test() {
        let result = AggregationStore::from_json(r#"{"rw1":{"art:4":[{"ops_per_sec":1}]}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("results_1.json");
        let store = populated_store();

        store.save_to_file(&path).unwrap();
        let loaded = AggregationStore::load_from_file(&path).unwrap();

        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");

        let err = AggregationStore::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read results file"));
    }
}
