use results_shared::TestSummary;
use tabled::builder::Builder;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::panel::Panel;
use tabled::settings::style::HorizontalLine;
use tabled::settings::{Alignment, Color, Modify, Style};

const ABSENT: &str = "-";

fn format_with_thousands_sep(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(unsigned) => ("-", unsigned),
        None => ("", formatted.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut result = String::new();
    for (i, c) in integer.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let integer: String = result.chars().rev().collect();

    if fraction.is_empty() {
        format!("{sign}{integer}")
    } else {
        format!("{sign}{integer}.{fraction}")
    }
}

/// Console table of one test: a row per configuration, the trial count then a column per metric
pub fn build_summary_table(test: &str, summary: &TestSummary) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["Configuration".to_string(), "Trials".to_string()];
    header.extend(summary.metrics.keys().map(|metric| metric.to_string()));
    builder.push_record(header);

    for (index, configuration) in summary.configurations.iter().enumerate() {
        let mut row = vec![
            configuration.clone(),
            summary
                .trials
                .get(index)
                .map(|trials| trials.to_string())
                .unwrap_or_else(|| ABSENT.to_string()),
        ];
        row.extend(summary.metrics.values().map(|means| {
            means
                .get(index)
                .copied()
                .flatten()
                .map(format_with_thousands_sep)
                .unwrap_or_else(|| ABSENT.to_string())
        }));
        builder.push_record(row);
    }

    // Line after panel header: use ┬ to connect with columns below
    let header_line = HorizontalLine::full('─', '┬', '├', '┤');
    let column_line = HorizontalLine::inherit(Style::modern());
    let title = (Color::BOLD | Color::FG_CYAN).colorize(format!("Test {test}"));

    let mut table = builder.build();
    table
        .with(Panel::header(title))
        .with(
            Style::rounded()
                .remove_horizontals()
                .intersection_top('─')
                .horizontals([(1, header_line), (2, column_line)]),
        )
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Modify::new(Rows::new(1..2)).with(Color::BOLD))
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use results_shared::Metric;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0.00")]
    #[case(999.0, "999.00")]
    #[case(1000.0, "1,000.00")]
    #[case(1234567.891, "1,234,567.89")]
    #[case(-1234.5, "-1,234.50")]
    fn test_format_with_thousands_sep(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_with_thousands_sep(value), expected);
    }

    #[test]
    fn test_summary_table() {
        let summary = TestSummary {
            configurations: vec!["art:4".to_string(), "masstree:4".to_string()],
            trials: vec![3, 1],
            metrics: IndexMap::from([
                (Metric::PutsPerSec, vec![Some(1234567.5), None]),
                (Metric::OpsPerSec, vec![Some(10.0), Some(20.25)]),
            ]),
        };

        let table = build_summary_table("rw1", &summary);
        let table = console::strip_ansi_codes(&table).to_string();

        assert!(table.contains("Test rw1"));
        assert!(table.contains("Configuration"));
        assert!(table.contains("puts_per_sec"));
        assert!(table.contains("ops_per_sec"));
        assert!(!table.contains("gets_per_sec"));
        assert!(table.contains("1,234,567.50"));
        assert!(table.contains("20.25"));

        let masstree_row = table
            .lines()
            .find(|line| line.contains("masstree:4"))
            .unwrap();
        assert!(masstree_row.contains(" - "));
        assert!(masstree_row.contains(" 1 "));
    }
}
