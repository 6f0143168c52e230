//! Voyage travel assistant CLI.
//!
//! # Usage
//!
//! ```bash
//! voyage [--model ID] [--user-id ID] [--max-iterations N] [--log-format FORMAT] [QUERY]
//! ```
//!
//! # Example
//!
//! ```bash
//! voyage "Flights from Bengaluru to Mumbai tomorrow"
//! ```

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use voyage_agent::{RunError, RunOutcome};
use voyage_cli::{App, Cli, Session};
use voyage_core::{TracingSetup, VoyageConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match VoyageConfig::from_env() {
        Ok(config) => config,
        Err(err) => return fail(&err),
    };
    cli.apply(&mut config);
    TracingSetup::new().with_format(config.log_format).init();

    let app = match App::from_config(&config) {
        Ok(app) => app,
        Err(err) => return fail(&err),
    };
    let mut session = app.session();

    let result = match cli.query {
        Some(query) => ask(&mut session, &query).await,
        None => repl(&mut session).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

fn fail(err: &dyn std::error::Error) -> ExitCode {
    // The exit code still reports the failure if stderr is closed.
    writeln!(std::io::stderr(), "error: {err}").ok();
    ExitCode::FAILURE
}

/// Reads messages from stdin until `exit`, `quit` or end of input.
async fn repl(session: &mut Session<'_>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        {
            let mut out = std::io::stdout().lock();
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            break;
        }
        ask(session, text).await?;
    }
    Ok(())
}

/// Sends one message; Ctrl-C cancels it.
async fn ask(session: &mut Session<'_>, text: &str) -> std::io::Result<()> {
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let outcome = session.send(text, &cancel).await;
    watcher.abort();

    let mut out = std::io::stdout().lock();
    match outcome {
        Ok(outcome) => render(&mut out, &outcome),
        Err(err) => writeln!(out, "error: {err}"),
    }
}

fn render(out: &mut impl Write, outcome: &RunOutcome) -> std::io::Result<()> {
    match &outcome.failure {
        Some(RunError::Cancelled) => writeln!(out, "(cancelled)"),
        Some(RunError::Conversation(err)) => writeln!(out, "error: {err}"),
        Some(_) | None => {
            let text = outcome.conversation.last_assistant_text().unwrap_or_default();
            writeln!(out, "{text}")
        }
    }
}
