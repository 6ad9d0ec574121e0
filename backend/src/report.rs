//! Plain-text rendering of results
//!
//! Every function returns a `String`; printing is left to the caller.

use crate::experiment::{ExperimentResults, MethodOutcome, SingleRun};
use crate::models::EntityTable;
use crate::sampling::{DistortionEstimate, InclusionMode};

const RULE_WIDTH: usize = 64;

/// Format an integer with `,` thousands separators
///
/// ```
/// use apportionment_core_rs::report::group_thousands;
///
/// assert_eq!(group_thousands(39538223), "39,538,223");
/// assert_eq!(group_thousands(435), "435");
/// ```
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Seat listing for one apportionment, most seats first
///
/// Entities with equal seats keep table order.
pub fn apportionment_listing(title: &str, table: &EntityTable) -> String {
    let mut rows: Vec<_> = table.iter().collect();
    rows.sort_by(|a, b| b.seats().cmp(&a.seats()));

    let mut out = String::new();
    out.push_str(&format!("\n{} Method Results:\n", title));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!(
        "{:<20} {:>15} {:>8} {:>18}\n",
        "Entity", "Population", "Seats", "Seats per Million"
    ));
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    for entity in rows {
        out.push_str(&format!(
            "{:<20} {:>15} {:>8} {:>18.2}\n",
            entity.id(),
            group_thousands(entity.population()),
            entity.seats(),
            entity.seats_per_million()
        ));
    }

    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!(
        "{:<20} {:>15} {:>8}\n",
        "TOTAL",
        table
            .total_population()
            .map_or_else(|| "overflow".to_string(), group_thousands),
        table.total_seats()
    ));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out
}

/// Summary of one distortion estimate
pub fn estimate_summary(estimate: &DistortionEstimate) -> String {
    let mut out = String::new();
    let mode = match estimate.mode {
        InclusionMode::Uniform => "uniform".to_string(),
        InclusionMode::Threshold { probability } => format!("threshold p = {}", probability),
    };

    out.push_str(&format!(
        "Sampled {} subsets ({} accepted, {})\n",
        estimate.samples_drawn, estimate.samples_accepted, mode
    ));
    out.push_str(&format!("[APPROXIMATE] alpha <= {:.6} (sampled)\n", estimate.alpha));

    match &estimate.worst {
        Some(worst) => {
            out.push_str(&format!("Worst subset found: {}\n", worst.members.join(" ")));
            out.push_str(&format!(
                "  population share {:.4}%, seat share {:.4}%\n",
                worst.population_share * 100.0,
                worst.seat_share * 100.0
            ));
        }
        None => out.push_str("No subset below alpha = 1 was found\n"),
    }
    out
}

/// Per-method alpha sequences with per-threshold mean and std dev
pub fn alpha_series(results: &ExperimentResults) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Sweep {} ({} seats, config {})\n",
        results.run_id,
        results.total_seats,
        &results.config_hash[..results.config_hash.len().min(12)]
    ));

    for series in &results.series {
        out.push_str(&format!("\n{}\n", series.method));
        match &series.outcome {
            MethodOutcome::Completed { alphas, groups } => {
                let joined: Vec<String> = alphas.iter().map(|a| format!("{:.6}", a)).collect();
                out.push_str(&format!("  alphas: {}\n", joined.join(" ")));
                out.push_str(&format!(
                    "  {:>9} {:>10} {:>10} {:>10}\n",
                    "threshold", "mean", "std", "min"
                ));
                for group in groups {
                    out.push_str(&format!(
                        "  {:>9.1} {:>10.6} {:>10.6} {:>10.6}\n",
                        group.threshold, group.mean, group.std_dev, group.min
                    ));
                }
            }
            MethodOutcome::Failed { error } => {
                out.push_str(&format!("  FAILED: {}\n", error));
            }
        }
    }
    out
}

/// Side-by-side seats per entity across methods
///
/// Rows follow the first run's allocation order.
pub fn seat_comparison(runs: &[SingleRun]) -> String {
    let Some(first) = runs.first() else {
        return String::new();
    };

    let mut out = String::new();
    out.push_str(&format!("{:<20}", "Entity"));
    for run in runs {
        out.push_str(&format!(" {:>16}", run.method.name()));
    }
    out.push('\n');
    out.push_str(&"-".repeat(20 + 17 * runs.len()));
    out.push('\n');

    for (row, (id, _, _)) in first.allocation.iter().enumerate() {
        out.push_str(&format!("{:<20}", id));
        for run in runs {
            match run.allocation.get(row) {
                Some((_, _, seats)) => out.push_str(&format!(" {:>16}", seats)),
                None => out.push_str(&format!(" {:>16}", "-")),
            }
        }
        out.push('\n');
    }

    out.push_str(&format!("{:<20}", "alpha <="));
    for run in runs {
        out.push_str(&format!(" {:>16.6}", run.estimate.alpha));
    }
    out.push('\n');
    out
}
