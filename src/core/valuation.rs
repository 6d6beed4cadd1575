/// Values a metal holding at the given spot prices.
///
/// Returns 0 when either price is missing: a partial observation has no
/// comparable portfolio value.
pub fn value(gold: Option<f64>, silver: Option<f64>, gold_grams: f64, silver_grams: f64) -> f64 {
    match (gold, silver) {
        (Some(g), Some(s)) => g * gold_grams + s * silver_grams,
        _ => 0.0,
    }
}

/// The fixed 1 g gold + 1 g silver reference holding recorded on every
/// observation and compared by the peak passes.
pub fn reference_value(gold: Option<f64>, silver: Option<f64>) -> f64 {
    value(gold, silver, 1.0, 1.0)
}
