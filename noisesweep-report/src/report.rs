//! Console report text.
//!
//! Every function here returns a `String`; writing it anywhere is the
//! pipeline's job. Output depends only on its inputs, so rendering the same
//! dataset twice is byte-identical.

use noisesweep_core::{DatasetOverview, DegradationError, DegradationRecord, DegradationReport, StatisticsTable};

/// Printed in place of an absent CI bound.
pub const CI_PLACEHOLDER: &str = "N/A";

const BANNER_WIDTH: usize = 80;
const BLOCK_RULE_WIDTH: usize = 60;

fn banner(out: &mut String, title: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    out.push_str(&format!("\n{rule}\n  {title}\n{rule}\n"));
}

fn ci_cell(bound: Option<f64>) -> String {
    match bound {
        Some(v) => format!("{v:7.2}"),
        None => format!("{CI_PLACEHOLDER:>7}"),
    }
}

/// Source file facts shown before the tables.
pub fn render_dataset_overview(overview: &DatasetOverview) -> String {
    let epsilons: Vec<String> = overview.epsilons.iter().map(|e| format!("{e:.2}")).collect();
    format!(
        "Loaded data file: {}\n  Samples: {}\n  Strategies: {}\n  Noise levels: [{}]\n  Fingerprint: {}\n",
        overview.source,
        overview.rows,
        overview.strategies,
        epsilons.join(", "),
        overview.fingerprint.short(),
    )
}

/// One block per epsilon (ascending), strategies ranked by mean.
pub fn render_ranked_table(table: &StatisticsTable<'_>) -> String {
    let mut out = String::new();
    banner(&mut out, "Noise Analysis Statistics");

    for group in table.groups() {
        out.push_str(&format!(
            "\nε = {:.2}\n{}\n",
            group.epsilon,
            "-".repeat(BLOCK_RULE_WIDTH)
        ));
        for sample in &group.ranked {
            out.push_str(&format!(
                "  {:<20} | Mean: {:7.2} | CI: [{}, {}]\n",
                sample.strategy,
                sample.mean,
                ci_cell(sample.ci_lower),
                ci_cell(sample.ci_upper),
            ));
        }
    }
    out
}

/// One line per strategy, in the analyzer's order.
pub fn render_degradation_summary(
    records: &[DegradationRecord],
    epsilon_min: f64,
    epsilon_max: f64,
) -> String {
    let mut out = String::new();
    banner(&mut out, "Performance Drop Analysis");
    out.push_str(&format!(
        "\nPerformance change from ε={epsilon_min:.2} to ε={epsilon_max:.2}:\n{}\n",
        "-".repeat(BANNER_WIDTH)
    ));

    for r in records {
        out.push_str(&format!(
            "  {:<20} | Initial: {:7.2} → Final: {:7.2} | Drop: {:7.2} ({:5.1}%)\n",
            r.strategy, r.initial_mean, r.final_mean, r.absolute_drop, r.percentage_drop,
        ));
    }
    out
}

/// Strategies left out of the degradation ranking, with the reason.
pub fn render_skipped(skipped: &[DegradationError]) -> String {
    if skipped.is_empty() {
        return String::new();
    }
    let mut out = String::from("\nNot ranked:\n");
    for err in skipped {
        out.push_str(&format!("  - {err}\n"));
    }
    out
}

/// Ranked tables, degradation summary and skipped strategies.
pub fn render_report(table: &StatisticsTable<'_>, degradation: &DegradationReport) -> String {
    let mut out = render_ranked_table(table);
    match degradation.epsilon_range {
        Some((lo, hi)) => out.push_str(&render_degradation_summary(&degradation.records, lo, hi)),
        None => {
            banner(&mut out, "Performance Drop Analysis");
            out.push_str("\nNo samples; nothing to compare.\n");
        }
    }
    out.push_str(&render_skipped(&degradation.skipped));
    out.push_str(&format!("\n{}\n", "=".repeat(BANNER_WIDTH)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use noisesweep_core::{analyze, group_by_epsilon, Dataset, Sample};

    fn sweep() -> Dataset {
        Dataset::new(vec![
            Sample::new("TitForTat", 0.0, 450.0).with_ci(440.0, 460.0),
            Sample::new("TitForTat", 0.2, 300.0).with_ci(290.0, 310.0),
            Sample::new("AllDefect", 0.0, 300.0),
            Sample::new("AllDefect", 0.2, 300.0),
        ])
    }

    #[test]
    fn ranked_block_lists_best_first() {
        let data = sweep();
        let text = render_ranked_table(&group_by_epsilon(&data));

        let block = text.split("ε = 0.00").nth(1).unwrap();
        let tft = block.find("TitForTat").unwrap();
        let ad = block.find("AllDefect").unwrap();
        assert!(tft < ad);
        assert!(text.find("ε = 0.00").unwrap() < text.find("ε = 0.20").unwrap());
    }

    #[test]
    fn row_layout_is_fixed_width() {
        let data = sweep();
        let text = render_ranked_table(&group_by_epsilon(&data));
        assert!(text.contains(
            "  TitForTat            | Mean:  450.00 | CI: [ 440.00,  460.00]\n"
        ));
    }

    #[test]
    fn missing_ci_prints_placeholder() {
        let data = sweep();
        let text = render_ranked_table(&group_by_epsilon(&data));
        assert!(text.contains(
            "  AllDefect            | Mean:  300.00 | CI: [    N/A,     N/A]\n"
        ));
    }

    #[test]
    fn half_ci_prints_placeholder_for_missing_bound() {
        let mut sample = Sample::new("PROBER", 0.1, 2.0);
        sample.ci_lower = Some(1.5);
        let data = Dataset::new(vec![sample]);
        let text = render_ranked_table(&group_by_epsilon(&data));
        assert!(text.contains("CI: [   1.50,     N/A]"));
    }

    #[test]
    fn degradation_lines_follow_analyzer_order() {
        let report = analyze(&sweep());
        let text = render_degradation_summary(&report.records, 0.0, 0.2);

        assert!(text.contains("Performance change from ε=0.00 to ε=0.20:"));
        assert!(text.contains(
            "  TitForTat            | Initial:  450.00 → Final:  300.00 | Drop:  150.00 ( 33.3%)\n"
        ));
        assert!(text.contains(
            "  AllDefect            | Initial:  300.00 → Final:  300.00 | Drop:    0.00 (  0.0%)\n"
        ));
        assert!(text.find("TitForTat").unwrap() < text.find("AllDefect").unwrap());
    }

    #[test]
    fn skipped_strategies_are_listed() {
        let mut samples = sweep().samples().to_vec();
        samples.push(Sample::new("PROBER", 0.0, 400.0));
        let data = Dataset::new(samples);
        let text = render_report(&group_by_epsilon(&data), &analyze(&data));
        assert!(text.contains("Not ranked:\n  - PROBER: no observation at ε=0.20\n"));
    }

    #[test]
    fn empty_dataset_renders_without_summary() {
        let data = Dataset::default();
        let text = render_report(&group_by_epsilon(&data), &analyze(&data));
        assert!(text.contains("No samples"));
        assert!(!text.contains("Performance change"));
    }

    #[test]
    fn ranked_block_has_heading_and_rule() {
        let data = sweep();
        let text = render_ranked_table(&group_by_epsilon(&data));
        let rule = "=".repeat(80);
        assert!(text.starts_with(&format!("\n{rule}\n  Noise Analysis Statistics\n{rule}\n")));
        assert!(text.contains(&format!("\nε = 0.20\n{}\n", "-".repeat(60))));
        assert!(text.ends_with("CI: [    N/A,     N/A]\n"));
    }

    #[test]
    fn report_closes_with_rule() {
        let data = sweep();
        let text = render_report(&group_by_epsilon(&data), &analyze(&data));
        assert!(text.ends_with(&format!("\n{}\n", "=".repeat(80))));
    }

    #[test]
    fn report_is_deterministic() {
        let data = sweep();
        let a = render_report(&group_by_epsilon(&data), &analyze(&data));
        let b = render_report(&group_by_epsilon(&data), &analyze(&data));
        assert_eq!(a, b);
    }

    #[test]
    fn overview_lists_noise_levels() {
        let overview = DatasetOverview::from_dataset("noise_analysis.csv", &sweep());
        let text = render_dataset_overview(&overview);
        assert!(text.starts_with("Loaded data file: noise_analysis.csv\n"));
        assert!(text.contains("  Samples: 4\n"));
        assert!(text.contains("  Strategies: 2\n"));
        assert!(text.contains("  Noise levels: [0.00, 0.20]\n"));
    }
}
