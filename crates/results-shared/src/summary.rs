use crate::{AggregationStore, Metric, RawRecord};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of decimal places kept in the summarized means
pub const SUMMARY_DECIMALS: i32 = 2;

/// Per-test view of the store, ready to be charted.
///
/// `trials` and every vector in `metrics` are index-aligned with `configurations`. A `None`
/// mean means no record of that configuration reported the metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestSummary {
    pub configurations: Vec<String>,
    pub trials: Vec<usize>,
    pub metrics: IndexMap<Metric, Vec<Option<f64>>>,
}

impl TestSummary {
    /// Thread count shared by every configuration, if there is exactly one
    pub fn common_threads(&self) -> Option<u32> {
        self.configurations
            .iter()
            .map(|config| {
                config
                    .parse::<crate::ConfigurationId>()
                    .ok()
                    .map(|config| config.threads())
            })
            .all_equal_value()
            .ok()
            .flatten()
    }

    /// Whether at least one mean is present
    pub fn has_values(&self) -> bool {
        self.metrics.values().flatten().any(Option::is_some)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Summary {
    tests: IndexMap<String, TestSummary>,
}

impl Summary {
    pub fn get(&self, test: &str) -> Option<&TestSummary> {
        self.tests.get(test)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, TestSummary> {
        self.tests.iter()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reduce every `(test, configuration)` cell of `store` to the mean of each of `metrics`.
pub fn summarize(store: &AggregationStore, metrics: &[Metric]) -> Summary {
    let tests = store
        .iter()
        .map(|(test, cells)| {
            let configurations = cells.keys().cloned().collect_vec();
            let trials = cells.values().map(Vec::len).collect_vec();
            let readings = cells
                .values()
                .map(|records| records.iter().map(RawRecord::metrics).collect_vec())
                .collect_vec();
            let metrics = metrics
                .iter()
                .map(|&metric| {
                    let means = readings
                        .iter()
                        .map(|cell| mean_of(cell, metric))
                        .collect_vec();
                    (metric, means)
                })
                .collect();

            (
                test.clone(),
                TestSummary {
                    configurations,
                    trials,
                    metrics,
                },
            )
        })
        .collect();

    Summary { tests }
}

/// Mean of `metric` over the readings that report it, `None` when none does
fn mean_of(readings: &[BTreeMap<Metric, Option<f64>>], metric: Metric) -> Option<f64> {
    let values = readings
        .iter()
        .filter_map(|reading| reading.get(&metric).copied().flatten())
        .collect_vec();
    if values.is_empty() {
        return None;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(round_to(mean, SUMMARY_DECIMALS))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
