//! `folio serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "FOLIO_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "FOLIO_PORT")]
    port: Option<u16>,

    /// Page tree directory (overrides config).
    #[arg(long)]
    pages_dir: Option<PathBuf>,

    /// User accounts directory (overrides config).
    #[arg(long)]
    users_dir: Option<PathBuf>,

    /// Enable verbose output (request and mutation logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            pages_dir: self.pages_dir,
            users_dir: self.users_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.validate()?;

        output.info(&format!(
            "Starting server on {}:{}{}",
            config.server.host, config.server.port, config.server.prefix
        ));
        output.info(&format!(
            "Pages directory: {}",
            config.pages_resolved.dir.display()
        ));
        output.info(&format!(
            "Accounts directory: {}",
            config.users_resolved.dir.display()
        ));
        if !config.pages_resolved.dir.is_dir() {
            output.warning("Pages directory does not exist yet; it is created on first page");
        }

        run_server(server_config_from_config(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
