//! Nightly pruning of raw observations

use crate::store::{CleanupStats, PriceHistory};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Drops raw observations from past days, keeping every record that carries
/// a peak flag and everything recorded today.
///
/// A future-dated record points at a clock problem; it is kept and counted
/// so an operator can see it, never silently discarded. A record with an
/// unparsable date gets the same treatment. Running the pass twice on the
/// same day removes nothing further.
pub fn cleanup(history: &mut PriceHistory, now: DateTime<Utc>) -> CleanupStats {
    let today = now.date_naive();
    let initial_count = history.records.len();
    let mut anomalies = 0usize;

    history.records.retain(|record| match record.parsed_date() {
        Some(date) if date == today => true,
        Some(date) if date < today => record.is_peak(),
        Some(date) => {
            warn!(
                "Keeping future-dated record from {} (today is {})",
                date, today
            );
            anomalies += 1;
            true
        }
        None => {
            warn!("Keeping record with unparsable date '{}'", record.date);
            anomalies += 1;
            true
        }
    });

    let final_count = history.records.len();
    let stats = CleanupStats {
        initial_count,
        final_count,
        removed_count: initial_count - final_count,
        anomalies,
    };

    history.cleanup_stats = Some(stats);
    history.last_cleanup = Some(now);
    history.total_records = final_count;

    info!(
        "Cleanup removed {} of {} records",
        stats.removed_count, stats.initial_count
    );
    stats
}
