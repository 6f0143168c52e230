//! Command-line arguments.

use clap::Parser;
use voyage_core::{TracingFormat, VoyageConfig};

/// Travel assistant that finds flights and hotels and books flights.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "voyage",
    version,
    about = "Travel assistant that finds flights and hotels and books flights",
    long_about = "Voyage answers travel questions with a local model, looking up airport \
                  codes, searching flights and hotels and managing flight bookings.\n\n\
                  Without a QUERY it starts an interactive session; type 'exit' or 'quit' \
                  to leave and press Ctrl-C to cancel a running request.\n\n\
                  Examples:\n  \
                  voyage \"Flights from Bengaluru to Mumbai tomorrow\"\n  \
                  voyage --model ollama/llama3.1:8b --user-id u42"
)]
pub struct Cli {
    /// Model identifier, `provider/model`. Overrides `VOYAGE_MODEL`.
    #[arg(long, value_name = "ID")]
    pub model: Option<String>,

    /// User id for bookings. Overrides `VOYAGE_USER_ID`.
    #[arg(long, value_name = "ID")]
    pub user_id: Option<String>,

    /// Maximum model calls per request. Overrides `VOYAGE_MAX_ITERATIONS`.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_iterations: Option<u32>,

    /// Log format: pretty, compact or json. Overrides `VOYAGE_LOG_FORMAT`.
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<TracingFormat>,

    /// Ask a single question and exit.
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,
}

impl Cli {
    /// Applies the flags given on the command line over `config`.
    pub fn apply(&self, config: &mut VoyageConfig) {
        if let Some(model) = &self.model {
            config.model_id.clone_from(model);
        }
        if let Some(user_id) = &self.user_id {
            config.user_id.clone_from(user_id);
        }
        if let Some(max) = self.max_iterations {
            config.max_iterations = max as usize;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}
