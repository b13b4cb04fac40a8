//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the estimation code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{GridScore, UnitEstimate};
use crate::report::{accuracy_percent, closest_candidates};

/// How many step sizes the summary lists before eliding the rest.
const STEP_PREVIEW: usize = 10;

/// How many runner-up candidates the summary lists.
const CANDIDATE_PREVIEW: usize = 5;

/// Format the full run summary (sample, discovery, verification).
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();
    let sample = &run.sample_config;
    let est = &run.estimate;

    out.push_str("=== Millikan Oil Drop Simulation ===\n");
    out.push_str(&format!(
        "True unit (unknown to the experimenter): {}\n",
        sample.true_unit
    ));
    out.push_str(&format!(
        "Drops: n={} | electrons=[{}, {}] | base mass={:.2} | seed={}\n",
        run.sample.stats.n_drops,
        run.sample.stats.electrons_min,
        run.sample.stats.electrons_max,
        sample.base_mass,
        sample.seed,
    ));
    out.push_str(&format!(
        "Search: [{}, {}] step {} | near-zero threshold {}\n",
        run.estimator_config.search_low,
        run.estimator_config.search_high,
        run.estimator_config.search_step,
        run.estimator_config.zero_threshold,
    ));

    out.push_str("\nExperimental data:\n");
    out.push_str(&format!("Lightest drop mass: {:.2}\n", run.analysis.lightest));
    out.push_str(&format!("Sorted masses: {}\n", fmt_vec(&run.analysis.sorted_masses)));
    let preview: Vec<f64> = run.analysis.step_sizes.iter().take(STEP_PREVIEW).copied().collect();
    let more = if run.analysis.step_sizes.len() > STEP_PREVIEW { "..." } else { "" };
    out.push_str(&format!("Step sizes between drops: {}{more}\n", fmt_vec(&preview)));

    out.push_str("\nDiscovery:\n");
    out.push_str(&format_estimate(est));
    out.push_str(&format!("Actual unit: {}\n", sample.true_unit));
    out.push_str(&format!(
        "Accuracy: {:.1}%\n",
        accuracy_percent(est.unit, sample.true_unit)
    ));

    out.push_str("\nClosest candidates:\n");
    out.push_str(&format_candidates(&closest_candidates(&run.scores, CANDIDATE_PREVIEW), est.unit));

    let v = &run.verification;
    out.push_str("\nVerification (mass = intercept + slope * electrons):\n");
    out.push_str(&format!("- slope    : {:.6} (unit)\n", v.slope));
    out.push_str(&format!("- intercept: {:.6} (base mass)\n", v.intercept));
    out.push_str(&format!("- rmse     : {:.6}\n", v.rmse));

    out
}

/// Format a bare estimate (used by `oildrop estimate`).
pub fn format_estimate(est: &UnitEstimate) -> String {
    format!(
        "Discovered unit: {} (score={:.6}, {} candidates, {} differences)\n",
        est.unit, est.score, est.candidates_probed, est.differences_used
    )
}

/// The questions the original classroom handout closes with.
pub fn format_discussion_questions() -> String {
    let mut out = String::new();
    out.push_str("=== Discussion questions ===\n");
    out.push_str("1. Why do the step sizes cluster around certain values?\n");
    out.push_str("2. What would happen if charge wasn't quantized?\n");
    out.push_str("3. How does increasing the number of drops improve accuracy?\n");
    out.push_str("4. What sources of experimental error might Millikan have faced?\n");
    out
}

fn format_candidates(rows: &[GridScore], chosen: f64) -> String {
    let mut out = String::new();
    out.push_str(format!("  {:>10} {:>12}", "candidate", "score").trim_end());
    out.push('\n');
    out.push_str(format!("  {:-<10} {:-<12}", "", "").trim_end());
    out.push('\n');
    for r in rows {
        let mark = if r.candidate == chosen { "*" } else { " " };
        out.push_str(&format!("{mark} {:>10} {:>12.6}\n", r.candidate, r.score));
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.2}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_simulation;
    use crate::domain::{EstimatorConfig, SampleConfig};

    #[test]
    fn summary_mentions_discovery_and_accuracy() {
        let run = run_simulation(&SampleConfig::default(), &EstimatorConfig::default()).unwrap();
        let txt = format_run_summary(&run);
        assert!(txt.starts_with("=== Millikan Oil Drop Simulation ===\n"));
        assert!(txt.contains("Discovered unit: 1.2 "));
        assert!(txt.contains("Actual unit: 1.2\n"));
        assert!(txt.contains("Accuracy: 100.0%\n"));
        assert!(txt.contains("- slope    : 1.200000 (unit)\n"));
    }

    #[test]
    fn candidate_table_marks_the_winner() {
        let rows = vec![
            GridScore { candidate: 1.2, score: 0.0 },
            GridScore { candidate: 0.6, score: 0.0 },
        ];
        let txt = format_candidates(&rows, 1.2);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "   candidate        score");
        assert!(lines[2].starts_with("*        1.2"));
        assert!(lines[3].starts_with("         0.6"));
    }

    #[test]
    fn estimate_line_is_stable() {
        let est = UnitEstimate {
            unit: 1.2,
            score: 0.0,
            candidates_probed: 26,
            differences_used: 3,
        };
        assert_eq!(
            format_estimate(&est),
            "Discovered unit: 1.2 (score=0.000000, 26 candidates, 3 differences)\n"
        );
    }
}
