//! Command implementations for the CLI
//!
//! - start: Start the pricing server
//! - stop: Stop a running instance
//! - reload: Reload configuration
//! - test: Test configuration validity
//! - config: Configuration display and validation

pub mod config;
pub mod reload;
pub mod start;
pub mod stop;
pub mod test;
