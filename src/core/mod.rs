//! Core business logic abstractions

pub mod catalog;
pub mod config;
pub mod converter;
pub mod dashboard;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use converter::{ChartView, ConversionController};
pub use dashboard::DashboardState;
pub use error::FxError;
pub use rates::{
    ComparisonRate, ConversionResult, DashboardPairRate, HistoryPoint, RateProvider, RateSnapshot,
};
