//! Statistics reporting.

use console::style;

use crate::collect::CollectStats;

/// Print the final counters of a run.
pub fn print_collect_stats(stats: &CollectStats) {
    println!();
    println!(
        "Done. Files found: {}, copied: {}.",
        style(stats.found).bold(),
        style(stats.copied).green().bold()
    );
}
