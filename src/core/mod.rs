//! Core business logic abstractions

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod cross_rate;
pub mod language;
pub mod log;
pub mod quote;

// Re-export main types for cleaner imports
pub use analyzer::{Analyzer, GenericAnalyzer};
pub use catalog::{Currency, CurrencyCatalog};
pub use quote::{
    CONVERSION_FAILED_MESSAGE, Conversion, ConversionMethod, ConversionQuote, CurrentPrice,
    Document, PriceQuote, ProviderError,
};
