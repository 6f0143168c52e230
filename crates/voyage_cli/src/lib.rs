//! The `voyage` command-line travel assistant.
//!
//! [`Cli`] parses the flags, [`App::from_config`] assembles the model,
//! tools and orchestrator from a [`VoyageConfig`](voyage_core::VoyageConfig),
//! and a [`Session`] keeps one conversation across user messages.

mod cli;
mod session;

pub use cli::Cli;
pub use session::{App, AppError, Session};
