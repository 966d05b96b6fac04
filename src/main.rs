//! Main entry point for passkeeper.

use anyhow::Context;
use clap::Parser;
use passkeeper::cli::Cli;
use passkeeper::generator::PasswordConfig;
use passkeeper::interactive::InteractiveForm;
use passkeeper::session::Session;
use passkeeper::utils::error_exit;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // RUST_LOG=passkeeper=debug for verbose output. Passwords are never logged.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("passkeeper=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.command.is_some() {
        run_cli(&cli);
    } else if let Err(e) = run_interactive(cli).await {
        error_exit(&format!("{e:#}"), 1);
    }
}

/// Run a single subcommand.
fn run_cli(cli: &Cli) {
    if let Err(e) = cli.execute() {
        error_exit(&e.to_string(), 1);
    }
}

/// Run the interactive form.
async fn run_interactive(cli: Cli) -> anyhow::Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        anyhow::bail!("interactive mode needs a terminal; use 'passkeeper --help' for commands");
    }

    let session = Session::new(cli.store(), PasswordConfig::default(), &cli.default_email);
    let mut form = InteractiveForm::new(session, cli.clipboard_timeout)
        .context("failed to start interactive mode")?;
    form.run().await.context("interactive session failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        // Test that CLI can be parsed without panicking
        let cli = Cli::try_parse_from(["passkeeper", "generate"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["passkeeper", "find", "site.com", "--copy"]);
        assert!(cli.is_ok());
    }
}
