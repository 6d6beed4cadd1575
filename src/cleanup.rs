//! Retention round: drop past non-peak readings and save the result.

use anyhow::Result;

use crate::core::clock::Clock;
use crate::core::retention;
use crate::store::{CleanupStats, HistoryStore};

/// Loads the history, applies the retention policy and saves the result.
pub fn cleanup_once(store: &HistoryStore, clock: &dyn Clock) -> Result<CleanupStats> {
    let mut history = store.load();
    let stats = retention::cleanup(&mut history, clock.now());
    store.save(&history)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::store::{PriceHistory, PriceRecord};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn record(date: &str, portfolio_value: f64, daily_peak: bool) -> PriceRecord {
        PriceRecord {
            timestamp: 0,
            date: date.to_string(),
            time: "12:00".to_string(),
            gold_price: Some(100.0),
            silver_price: Some(50.0),
            portfolio_value,
            daily_peak,
            monthly_peak: false,
        }
    }

    #[test]
    fn test_cleanup_drops_unflagged_past_readings() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let mut history = PriceHistory::default();
        history.records = vec![
            record("2024-01-01", 140.0, false),
            record("2024-01-01", 150.0, true),
            record("2024-01-02", 145.0, false),
        ];
        store.save(&history).unwrap();

        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 2, 23, 55, 0).unwrap());
        let stats = cleanup_once(&store, &clock).unwrap();

        assert_eq!(stats.initial_count, 3);
        assert_eq!(stats.final_count, 2);
        assert_eq!(stats.removed_count, 1);

        let reloaded = store.load();
        assert_eq!(reloaded.records.len(), 2);
        assert_eq!(reloaded.total_records, 2);
        assert_eq!(reloaded.cleanup_stats, Some(stats));
        assert!(reloaded.last_cleanup.is_some());
    }

    #[test]
    fn test_cleanup_of_a_missing_store_saves_an_empty_history() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 2, 23, 55, 0).unwrap());
        let stats = cleanup_once(&store, &clock).unwrap();

        assert_eq!(stats.initial_count, 0);
        assert_eq!(stats.removed_count, 0);
        assert!(store.path().exists());
        assert!(store.load().records.is_empty());
    }
}
