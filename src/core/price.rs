//! Pricing abstractions and core types

use crate::core::metal::Metal;
use anyhow::Result;
use async_trait::async_trait;

/// A source of current spot prices, one fetch per metal.
///
/// Implementations surface transport and parse failures as errors; the
/// collection flow converts those into an absent price for the cycle, so
/// nothing throws past that boundary.
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    async fn fetch_price(&self, metal: Metal) -> Result<f64>;
}
