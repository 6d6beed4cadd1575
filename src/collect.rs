//! One collection round: fetch both spot prices, append, re-derive peaks.

use anyhow::Result;
use tracing::{info, warn};

use crate::core::clock::Clock;
use crate::core::metal::Metal;
use crate::core::peaks;
use crate::core::price::SpotPriceProvider;
use crate::core::valuation;
use crate::store::{HistoryStore, PriceRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum CollectOutcome {
    /// A reading was appended and saved, returned with its final peak flags.
    Recorded(PriceRecord),
    /// Neither source produced a price. The store was not touched.
    NoData,
}

async fn fetch_or_none(provider: &dyn SpotPriceProvider, metal: Metal) -> Option<f64> {
    match provider.fetch_price(metal).await {
        Ok(price) => Some(price),
        Err(err) => {
            warn!("Failed to fetch {} price: {}", metal, err);
            None
        }
    }
}

/// Fetches both metals concurrently and commits the reading in one save.
pub async fn collect_once(
    store: &HistoryStore,
    provider: &dyn SpotPriceProvider,
    clock: &dyn Clock,
) -> Result<CollectOutcome> {
    let (gold, silver) = futures::join!(
        fetch_or_none(provider, Metal::Gold),
        fetch_or_none(provider, Metal::Silver)
    );

    if gold.is_none() && silver.is_none() {
        warn!("No spot prices available, skipping this round");
        return Ok(CollectOutcome::NoData);
    }

    let now = clock.now();
    let record = PriceRecord {
        timestamp: now.timestamp(),
        date: now.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M").to_string(),
        gold_price: gold,
        silver_price: silver,
        portfolio_value: valuation::reference_value(gold, silver),
        daily_peak: false,
        monthly_peak: false,
    };

    let mut history = store.load();
    history.records.push(record.clone());
    peaks::optimize(&mut history, now);
    history.last_update = Some(now);
    history.total_records = history.records.len();
    store.save(&history)?;

    // The appended record may have picked up peak flags during optimization.
    let recorded = history.records.last().cloned().unwrap_or(record);
    info!(
        "Recorded reading for {} {} (portfolio value {:.2})",
        recorded.date, recorded.time, recorded.portfolio_value
    );
    Ok(CollectOutcome::Recorded(recorded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    struct StubProvider {
        gold: Option<f64>,
        silver: Option<f64>,
    }

    #[async_trait]
    impl SpotPriceProvider for StubProvider {
        async fn fetch_price(&self, metal: Metal) -> Result<f64> {
            let price = match metal {
                Metal::Gold => self.gold,
                Metal::Silver => self.silver,
            };
            price.ok_or_else(|| anyhow!("{} source down", metal))
        }
    }

    fn clock_at(hour: u32, minute: u32) -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 1, 2, hour, minute, 0).unwrap())
    }

    #[tokio::test]
    async fn test_collect_appends_and_flags_the_peak() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let provider = StubProvider {
            gold: Some(41250.5),
            silver: Some(495.0),
        };

        let outcome = collect_once(&store, &provider, &clock_at(9, 30))
            .await
            .unwrap();

        let record = match outcome {
            CollectOutcome::Recorded(record) => record,
            CollectOutcome::NoData => panic!("expected a recorded reading"),
        };
        assert_eq!(record.date, "2024-01-02");
        assert_eq!(record.time, "09:30");
        assert_eq!(record.gold_price, Some(41250.5));
        assert_eq!(record.silver_price, Some(495.0));
        assert_eq!(record.portfolio_value, 41745.5);
        assert!(record.daily_peak);
        assert!(record.monthly_peak);

        let history = store.load();
        assert_eq!(history.records.len(), 1);
        assert_eq!(history.total_records, 1);
        assert!(history.last_update.is_some());
        assert!(history.last_optimization.is_some());
    }

    #[tokio::test]
    async fn test_collect_with_one_source_down() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let provider = StubProvider {
            gold: Some(41000.0),
            silver: None,
        };

        let outcome = collect_once(&store, &provider, &clock_at(9, 30))
            .await
            .unwrap();

        let record = match outcome {
            CollectOutcome::Recorded(record) => record,
            CollectOutcome::NoData => panic!("expected a recorded reading"),
        };
        assert_eq!(record.gold_price, Some(41000.0));
        assert_eq!(record.silver_price, None);
        assert_eq!(record.portfolio_value, 0.0);
        assert!(!record.daily_peak);
        assert!(!record.monthly_peak);
        assert_eq!(store.load().records.len(), 1);
    }

    #[tokio::test]
    async fn test_collect_with_both_sources_down() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let provider = StubProvider {
            gold: None,
            silver: None,
        };

        let outcome = collect_once(&store, &provider, &clock_at(9, 30))
            .await
            .unwrap();

        assert_eq!(outcome, CollectOutcome::NoData);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_no_data_leaves_an_existing_store_untouched() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let good_provider = StubProvider {
            gold: Some(41000.0),
            silver: Some(500.0),
        };
        collect_once(&store, &good_provider, &clock_at(9, 0))
            .await
            .unwrap();
        let before = store.load();

        let dead_provider = StubProvider {
            gold: None,
            silver: None,
        };
        let outcome = collect_once(&store, &dead_provider, &clock_at(12, 0))
            .await
            .unwrap();

        assert_eq!(outcome, CollectOutcome::NoData);
        assert_eq!(store.load(), before);
    }

    #[tokio::test]
    async fn test_later_higher_reading_takes_the_daily_peak() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        let morning = StubProvider {
            gold: Some(41000.0),
            silver: Some(500.0),
        };
        collect_once(&store, &morning, &clock_at(9, 0)).await.unwrap();

        let noon = StubProvider {
            gold: Some(42000.0),
            silver: Some(505.0),
        };
        let outcome = collect_once(&store, &noon, &clock_at(12, 0)).await.unwrap();

        let record = match outcome {
            CollectOutcome::Recorded(record) => record,
            CollectOutcome::NoData => panic!("expected a recorded reading"),
        };
        assert!(record.daily_peak);
        assert!(record.monthly_peak);

        let history = store.load();
        assert_eq!(history.records.len(), 2);
        assert_eq!(history.total_records, 2);
        assert!(!history.records[0].daily_peak);
        assert!(history.records[1].daily_peak);
    }
}
