use anyhow::{Context, bail};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Field every record must carry to be attributed to a test.
pub const TEST_FIELD: &str = "test";

/// Throughput metrics the harness aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    PutsPerSec,
    GetsPerSec,
    OpsPerSec,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::PutsPerSec, Metric::GetsPerSec, Metric::OpsPerSec];

    /// Name of the field holding this metric in a raw record
    pub fn key(&self) -> &'static str {
        match self {
            Metric::PutsPerSec => "puts_per_sec",
            Metric::GetsPerSec => "gets_per_sec",
            Metric::OpsPerSec => "ops_per_sec",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One measurement emitted by a benchmark binary for one trial.
///
/// The record keeps every field it was parsed from, in order, so that a persisted
/// store reproduces the binary output exactly. Only [`TEST_FIELD`] is required,
/// metrics are looked up on demand and may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    test: String,
    fields: Map<String, Value>,
}

impl RawRecord {
    /// Parse a record from the JSON text of a single object
    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let value: Value = serde_json::from_str(text).context("Invalid JSON")?;
        match value {
            Value::Object(fields) => Self::try_from(fields),
            other => bail!("Expected a JSON object, got {other}"),
        }
    }

    pub fn test(&self) -> &str {
        &self.test
    }

    /// Value of `metric`, if the record has it as a number
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.fields.get(metric.key()).and_then(Value::as_f64)
    }

    /// Every tracked metric with the value this record holds for it.
    pub fn metrics(&self) -> BTreeMap<Metric, Option<f64>> {
        Metric::ALL
            .into_iter()
            .map(|metric| (metric, self.metric(metric)))
            .collect()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl TryFrom<Map<String, Value>> for RawRecord {
    type Error = anyhow::Error;

    fn try_from(fields: Map<String, Value>) -> anyhow::Result<Self> {
        let test = match fields.get(TEST_FIELD) {
            Some(Value::String(test)) => test.clone(),
            Some(other) => bail!("The `{TEST_FIELD}` field must be a string, got {other}"),
            None => bail!("Missing the `{TEST_FIELD}` field"),
        };

        Ok(Self { test, fields })
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::deserialize(deserializer)?;
        RawRecord::try_from(fields).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_with_all_metrics() {
        let record = RawRecord::from_json_str(
            r#"{"table":"art","test":"rw1","trial":0,"puts_per_sec":100,"gets_per_sec":250.5,"ops_per_sec":175}"#,
        )
        .unwrap();

        assert_eq!(record.test(), "rw1");
        assert_eq!(record.metric(Metric::PutsPerSec), Some(100.0));
        assert_eq!(record.metric(Metric::GetsPerSec), Some(250.5));
        assert_eq!(record.metric(Metric::OpsPerSec), Some(175.0));
        assert_eq!(record.get("table"), Some(&Value::from("art")));
    }

    #[test]
    fn test_missing_metrics_are_absent() {
        let record = RawRecord::from_json_str(r#"{"test":"rw1","puts_per_sec":1}"#).unwrap();

        let metrics = record.metrics();
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[&Metric::PutsPerSec], Some(1.0));
        assert_eq!(metrics[&Metric::GetsPerSec], None);
        assert_eq!(metrics[&Metric::OpsPerSec], None);
    }

    #[test]
    fn test_non_numeric_metric_is_absent() {
        let record = RawRecord::from_json_str(r#"{"test":"rw1","ops_per_sec":"fast"}"#).unwrap();
        assert_eq!(record.metric(Metric::OpsPerSec), None);
    }

    #[test]
    fn test_missing_test_field() {
        let err = RawRecord::from_json_str(r#"{"ops_per_sec":1}"#).unwrap_err();
        assert_eq!(err.to_string(), "Missing the `test` field");
    }

    #[test]
    fn test_test_field_must_be_a_string() {
        let err = RawRecord::from_json_str(r#"{"test":3}"#).unwrap_err();
        assert_eq!(err.to_string(), "The `test` field must be a string, got 3");
    }

    #[test]
    fn test_not_an_object() {
        assert!(RawRecord::from_json_str("[1, 2]").is_err());
        assert!(RawRecord::from_json_str("{bad json").is_err());
    }

    #[test]
    fn test_serialization_keeps_field_order() {
        let text = r#"{"table":"art","test":"rw1","trial":3,"ops_per_sec":1.5,"extra":{"a":[1,2]}}"#;
        let record = RawRecord::from_json_str(text).unwrap();
        assert_eq!(serde_json::to_string(&record).unwrap(), text);
    }
}
