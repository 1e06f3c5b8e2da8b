//! Print cost model.
//!
//! Turns a shape analysis plus user-chosen print parameters into an
//! itemized quote over the configured material catalog and pricing
//! constants.

pub mod calculator;
pub mod models;

pub use calculator::QuoteCalculator;
pub use models::{
    CostBreakdown, MaterialCatalog, MaterialProfile, MaterialUsage, PricingSettings,
    PrintParameters, PrintTime, QuoteError, QuoteParameters, QuoteResult, SupportPreference,
};
