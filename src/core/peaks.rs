//! Daily and monthly peak maintenance over the price history

use crate::store::PriceHistory;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Recomputes the peak flags for the current day and month.
///
/// Each pass clears every flag in its period and re-derives the single
/// maximum from scratch, so running it again on the same document changes
/// nothing. Records from past days and months keep whatever flags their own
/// day's runs gave them.
///
/// The daily peak of a date goes to the first record, in store order, holding
/// the maximum `portfolio_value` among that date's records with both prices
/// present. The monthly peak goes to the first daily-peak record holding the
/// maximum value within the month.
pub fn optimize(history: &mut PriceHistory, now: DateTime<Utc>) {
    let today = now.format("%Y-%m-%d").to_string();
    let month = now.format("%Y-%m").to_string();

    // Daily pass. Partial observations have no comparable value and can
    // never carry the flag.
    let mut best: Option<(usize, f64)> = None;
    for (i, record) in history.records.iter_mut().enumerate() {
        if record.date != today {
            continue;
        }
        record.daily_peak = false;
        if record.has_both_prices()
            && best.is_none_or(|(_, max)| record.portfolio_value > max)
        {
            best = Some((i, record.portfolio_value));
        }
    }
    if let Some((i, value)) = best {
        history.records[i].daily_peak = true;
        debug!("Daily peak for {}: {:.2}", today, value);
    }

    // Monthly pass. Candidates are the month's daily peaks, including the
    // one refreshed above.
    let mut best: Option<(usize, f64)> = None;
    for (i, record) in history.records.iter_mut().enumerate() {
        if record.month() != month {
            continue;
        }
        record.monthly_peak = false;
        if record.daily_peak && best.is_none_or(|(_, max)| record.portfolio_value > max) {
            best = Some((i, record.portfolio_value));
        }
    }
    if let Some((i, value)) = best {
        history.records[i].monthly_peak = true;
        debug!("Monthly peak for {}: {:.2}", month, value);
    }

    history.last_optimization = Some(now);
}
