//! Ambient infrastructure for Voyage: environment configuration and the
//! tracing subscriber.
//!
//! ```no_run
//! use voyage_core::{TracingSetup, VoyageConfig};
//!
//! let config = VoyageConfig::from_env()?;
//! TracingSetup::new().with_format(config.log_format).init();
//! tracing::info!(model = %config.model_id, "starting");
//! # Ok::<(), voyage_core::ConfigError>(())
//! ```

pub mod config;
pub mod tracing_setup;

pub use config::{ConfigError, VoyageConfig};
pub use tracing_setup::{TracingFormat, TracingSetup};
