//! Serialized shape of the price history document

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const HISTORY_FORMAT: &str = "ingot-price-history";
pub const HISTORY_VERSION: u32 = 2;

/// One spot price observation.
///
/// A missing metal price means the source failed to supply a value for that
/// cycle. `portfolio_value` is the 1 g gold + 1 g silver reference valuation
/// captured at collection time; it is authoritative once written and never
/// recomputed from the price fields on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Collection instant, epoch seconds UTC.
    pub timestamp: i64,
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
    /// `HH:MM`, UTC.
    pub time: String,
    pub gold_price: Option<f64>,
    pub silver_price: Option<f64>,
    pub portfolio_value: f64,
    #[serde(default)]
    pub daily_peak: bool,
    #[serde(default)]
    pub monthly_peak: bool,
}

impl PriceRecord {
    pub fn has_both_prices(&self) -> bool {
        self.gold_price.is_some() && self.silver_price.is_some()
    }

    pub fn is_peak(&self) -> bool {
        self.daily_peak || self.monthly_peak
    }

    /// The `YYYY-MM` prefix of the record date.
    pub fn month(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Counts of one retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupStats {
    pub initial_count: usize,
    pub final_count: usize,
    pub removed_count: usize,
    /// Records kept despite being future-dated or carrying an unparsable
    /// date. Non-zero values point at a clock or data problem.
    #[serde(default)]
    pub anomalies: usize,
}

/// The full record store document as persisted on disk.
///
/// Every metadata field defaults when absent so documents written by older
/// versions keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub records: Vec<PriceRecord>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_optimization: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_cleanup: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_records: usize,
    #[serde(default)]
    pub cleanup_stats: Option<CleanupStats>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_format() -> String {
    HISTORY_FORMAT.to_string()
}

fn default_version() -> u32 {
    HISTORY_VERSION
}

impl Default for PriceHistory {
    fn default() -> Self {
        PriceHistory {
            records: Vec::new(),
            last_update: None,
            last_optimization: None,
            last_cleanup: None,
            total_records: 0,
            cleanup_stats: None,
            format: default_format(),
            version: default_version(),
        }
    }
}

impl PriceHistory {
    /// The most recent observation, if any.
    pub fn latest(&self) -> Option<&PriceRecord> {
        self.records.last()
    }

    /// The record flagged as the peak of the given `YYYY-MM-DD` date.
    pub fn daily_peak_record(&self, date: &str) -> Option<&PriceRecord> {
        self.records
            .iter()
            .find(|r| r.daily_peak && r.date == date)
    }

    /// The record flagged as the peak of the given `YYYY-MM` month.
    pub fn monthly_peak_record(&self, month: &str) -> Option<&PriceRecord> {
        self.records
            .iter()
            .find(|r| r.monthly_peak && r.month() == month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> PriceRecord {
        PriceRecord {
            timestamp: 1_704_100_000,
            date: date.to_string(),
            time: "08:30".to_string(),
            gold_price: Some(100.0),
            silver_price: Some(50.0),
            portfolio_value: 150.0,
            daily_peak: false,
            monthly_peak: false,
        }
    }

    #[test]
    fn test_record_month_prefix() {
        assert_eq!(record("2024-01-15").month(), "2024-01");
        assert_eq!(record("bad").month(), "bad");
    }

    #[test]
    fn test_record_date_parsing() {
        assert_eq!(
            record("2024-01-15").parsed_date(),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert!(record("15/01/2024").parsed_date().is_none());
    }

    #[test]
    fn test_older_document_loads_without_metadata() {
        // A v1 document: records only, flags and metadata absent.
        let json = r#"{
            "records": [
                {
                    "timestamp": 1704100000,
                    "date": "2024-01-01",
                    "time": "08:30",
                    "gold_price": 100.5,
                    "silver_price": null,
                    "portfolio_value": 0.0
                }
            ]
        }"#;

        let history: PriceHistory = serde_json::from_str(json).expect("older document must load");
        assert_eq!(history.records.len(), 1);
        assert!(!history.records[0].daily_peak);
        assert!(!history.records[0].monthly_peak);
        assert_eq!(history.records[0].silver_price, None);
        assert!(history.last_update.is_none());
        assert!(history.cleanup_stats.is_none());
        assert_eq!(history.total_records, 0);
        assert_eq!(history.format, HISTORY_FORMAT);
        assert_eq!(history.version, HISTORY_VERSION);
    }

    #[test]
    fn test_empty_object_loads_as_empty_document() {
        let history: PriceHistory = serde_json::from_str("{}").unwrap();
        assert!(history.records.is_empty());
        assert!(history.latest().is_none());
    }

    #[test]
    fn test_peak_record_lookups() {
        let mut history = PriceHistory::default();
        history.records.push(record("2024-01-01"));
        history.records.push({
            let mut r = record("2024-01-02");
            r.daily_peak = true;
            r.monthly_peak = true;
            r
        });
        history.records.push(record("2024-01-02"));

        assert!(history.daily_peak_record("2024-01-01").is_none());
        let peak = history.daily_peak_record("2024-01-02").unwrap();
        assert!(peak.daily_peak);

        let monthly = history.monthly_peak_record("2024-01").unwrap();
        assert_eq!(monthly.date, "2024-01-02");
        assert!(history.monthly_peak_record("2024-02").is_none());

        assert_eq!(history.latest().unwrap().date, "2024-01-02");
    }
}
