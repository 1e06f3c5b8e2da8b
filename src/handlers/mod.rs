//! HTTP handlers
//!
//! - analyze: upload a model file, get an analysis + quote back
//! - materials: expose the material catalog
//! - quotes: store and retrieve computed quotes
//! - health: liveness/readiness probes
//! - metrics_handler: Prometheus exposition

pub mod analyze;
pub mod health;
pub mod materials;
pub mod metrics_handler;
pub mod quotes;
