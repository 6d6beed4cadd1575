//! Core business logic abstractions

pub mod clock;
pub mod config;
pub mod log;
pub mod metal;
pub mod peaks;
pub mod price;
pub mod retention;
pub mod valuation;

// Re-export main types for cleaner imports
pub use clock::{Clock, FixedClock, SystemClock};
pub use metal::Metal;
pub use price::SpotPriceProvider;
