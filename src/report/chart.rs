use crate::prelude::*;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use results_shared::{Metric, TestSummary};
use std::path::Path;

const SIZE: (u32, u32) = (960, 540);
const FONT: &str = "sans-serif";
/// Share of a configuration slot covered by its bars
const GROUP_FILL: f64 = 0.8;

const Y_LABEL: &str = "Throughput per second (K)";

fn metric_color(metric: Metric) -> RGBColor {
    match metric {
        Metric::PutsPerSec => RGBColor(0x1f, 0x77, 0xb4), // blue
        Metric::GetsPerSec => RGBColor(0xff, 0x7f, 0x0e), // orange
        Metric::OpsPerSec => RGBColor(0x2c, 0xa0, 0x2c),  // green
    }
}

/// `Test <test> with <n> threads` when every configuration runs with the same thread count
fn chart_title(test: &str, summary: &TestSummary) -> String {
    match summary.common_threads() {
        Some(threads) => format!("Test {test} with {threads} threads"),
        None => format!("Test {test}"),
    }
}

/// Grouped bar chart of one test: a group per configuration, a bar per metric
pub struct BarChart<'a> {
    title: String,
    configurations: &'a [String],
    series: Vec<(Metric, Vec<Option<f64>>)>,
}

impl<'a> BarChart<'a> {
    pub fn from_summary(test: &str, summary: &'a TestSummary) -> Self {
        let series = summary
            .metrics
            .iter()
            .map(|(metric, means)| {
                let scaled = means.iter().map(|mean| mean.map(to_thousands)).collect();
                (*metric, scaled)
            })
            .collect();

        Self {
            title: chart_title(test, summary),
            configurations: &summary.configurations,
            series,
        }
    }

    fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|(_, values)| values.iter().flatten())
            .copied()
            .fold(0.0, f64::max)
    }

    /// Draw the chart as an SVG document
    pub fn render(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
            root.fill(&WHITE)?;

            let groups = self.configurations.len().max(1);
            let group_centers = (0..groups).map(|group| group as f64 + 0.5).collect_vec();
            let mut chart = ChartBuilder::on(&root)
                .caption(&self.title, (FONT, 22))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d(
                    (0f64..groups as f64).with_key_points(group_centers),
                    0f64..nice_upper_bound(self.max_value()),
                )?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(groups)
                .x_label_formatter(&|x| {
                    self.configurations
                        .get(x.floor() as usize)
                        .cloned()
                        .unwrap_or_default()
                })
                .y_desc(Y_LABEL)
                .y_label_formatter(&|y| format!("{y:.1}"))
                .label_style((FONT, 13))
                .draw()?;

            let bar_width = GROUP_FILL / self.series.len().max(1) as f64;
            let value_style = TextStyle::from((FONT, 11).into_font())
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            for (index, (metric, values)) in self.series.iter().enumerate() {
                let color = metric_color(*metric);
                let offset = (1.0 - GROUP_FILL) / 2.0 + index as f64 * bar_width;
                // Absent values draw no bar
                let bars = values.iter().enumerate().filter_map(|(group, value)| {
                    value.map(|value| (group as f64 + offset, value))
                });

                chart
                    .draw_series(bars.clone().map(|(x, value)| {
                        Rectangle::new([(x, 0.0), (x + bar_width, value)], color.filled())
                    }))?
                    .label(metric.key())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
                    });
                chart.draw_series(bars.map(|(x, value)| {
                    Text::new(
                        format!("{value:.2}"),
                        (x + bar_width / 2.0, value),
                        value_style.clone(),
                    )
                }))?;
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((FONT, 13))
                .draw()?;

            root.present()?;
        }
        Ok(svg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let svg = self
            .render()
            .with_context(|| format!("Failed to draw the chart {}", self.title))?;
        std::fs::write(path, svg)
            .with_context(|| format!("Failed to write the chart {}", path.display()))?;
        debug!("Chart written to {}", path.display());
        Ok(())
    }
}

fn to_thousands(value: f64) -> f64 {
    value / 1000.0
}

/// Smallest round value above `max`, leaving headroom for the bar labels
fn nice_upper_bound(max: f64) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let target = max * 1.15;
    let magnitude = 10f64.powf(target.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|step| step * magnitude)
        .find(|bound| *bound >= target)
        .unwrap_or(10.0 * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn summary(configurations: &[&str], puts: Vec<Option<f64>>) -> TestSummary {
        let trials = vec![1; configurations.len()];
        TestSummary {
            configurations: configurations.iter().map(|c| c.to_string()).collect(),
            trials,
            metrics: IndexMap::from([
                (Metric::PutsPerSec, puts),
                (Metric::OpsPerSec, vec![None; configurations.len()]),
            ]),
        }
    }

    #[test]
    fn test_chart_title() {
        let same_threads = summary(&["art:4", "masstree:4"], vec![None, None]);
        assert_eq!(chart_title("rw1", &same_threads), "Test rw1 with 4 threads");

        let mixed_threads = summary(&["art:4", "masstree:8"], vec![None, None]);
        assert_eq!(chart_title("rw1", &mixed_threads), "Test rw1");
    }

    #[test]
    fn test_render_contains_labels_and_legend() {
        let summary = summary(&["art:4", "masstree:4"], vec![Some(1500.0), Some(2250.5)]);
        let svg = BarChart::from_summary("rw1", &summary).render().unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Test rw1 with 4 threads"));
        assert!(svg.contains("art:4"));
        assert!(svg.contains("masstree:4"));
        assert!(svg.contains("puts_per_sec"));
        assert!(svg.contains("ops_per_sec"));
        assert!(svg.contains(Y_LABEL));
        // Values are drawn in thousands
        assert!(svg.contains("1.50"));
        assert!(svg.contains("2.25"));
    }

    #[test]
    fn test_absent_values_draw_no_bar() {
        let absent = summary(&["art:4", "masstree:4"], vec![Some(4321.0), None]);
        let present = summary(&["art:4", "masstree:4"], vec![Some(4321.0), Some(1234.0)]);
        let absent_svg = BarChart::from_summary("rw1", &absent).render().unwrap();
        let present_svg = BarChart::from_summary("rw1", &present).render().unwrap();

        assert_eq!(absent_svg.matches("4.32").count(), 1);
        assert!(!absent_svg.contains("1.23"));
        assert_eq!(
            present_svg.matches("<rect").count(),
            absent_svg.matches("<rect").count() + 1
        );
    }

    #[test]
    fn test_nice_upper_bound() {
        assert_eq!(nice_upper_bound(0.0), 1.0);
        assert_eq!(nice_upper_bound(1.5), 2.0);
        assert_eq!(nice_upper_bound(80.0), 100.0);
        assert_eq!(nice_upper_bound(2.1), 2.5);
        assert!(nice_upper_bound(123.0) >= 123.0 * 1.15);
    }

    #[test]
    fn test_save() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("fig_1_rw1.svg");
        let summary = summary(&["art:4"], vec![Some(1000.0)]);

        BarChart::from_summary("rw1", &summary).save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Test rw1 with 4 threads"));
        assert!(content.contains("art:4"));
    }
}
