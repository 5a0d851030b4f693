//! Persistence and presentation of the aggregated results.

mod chart;
mod layout;
mod table;

use crate::local_logger::suspend_progress_bar;
use crate::prelude::*;
use results_shared::{AggregationStore, Metric, Summary, summarize};
use std::path::Path;

use chart::BarChart;
use table::build_summary_table;

pub use layout::{DEFAULT_RESULTS_DIR, ResultsLayout, default_run_id};

/// Write the store to `path` as pretty JSON, creating the parent directories
pub fn persist(store: &AggregationStore, path: &Path) -> Result<()> {
    store.save_to_file(path)?;
    info!(
        "Saved {} records of {} tests to {}",
        store.len(),
        store.tests().count(),
        path.display()
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<AggregationStore> {
    let store = AggregationStore::load_from_file(path)?;
    debug!("Loaded {} records from {}", store.len(), path.display());
    Ok(store)
}

/// Summarize the store, print a table per test and draw its chart.
///
/// Tests without any value get a table but no chart.
pub fn present(
    store: &AggregationStore,
    layout: &ResultsLayout,
    render_chart: bool,
) -> Result<Summary> {
    let summary = summarize(store, &Metric::ALL);
    if summary.is_empty() {
        warn!("No records were collected, nothing to report");
        return Ok(summary);
    }

    for (test, test_summary) in summary.iter() {
        let table = build_summary_table(test, test_summary);
        suspend_progress_bar(|| println!("\n{table}"));

        if !render_chart {
            continue;
        }
        if !test_summary.has_values() {
            warn!("Test {test} has no throughput values, skipping its chart");
            continue;
        }
        let path = layout.chart_path(test);
        BarChart::from_summary(test, test_summary).save(&path)?;
        info!("Chart of {test} written to {}", path.display());
    }

    Ok(summary)
}
