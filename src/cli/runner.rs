//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{AboutFormat, Cli, Command};
use crate::config::TapConfig;
use crate::connector::{CensusConnector, Connector};
use crate::error::{Error, Result};
use crate::output::MessageWriter;
use crate::state::StateManager;
use std::io::{self, Write};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the command, writing to stdout
    pub async fn run(&self) -> Result<()> {
        self.run_to(io::stdout()).await.map(|_| ())
    }

    /// Run the command, writing to `out`, and hand `out` back
    pub async fn run_to<W: Write + Send>(&self, mut out: W) -> Result<W> {
        match self.cli.command() {
            Command::About(format) => {
                self.about(&mut out, format)?;
                Ok(out)
            }
            Command::Discover => {
                self.discover(&mut out).await?;
                Ok(out)
            }
            Command::Test => {
                self.test().await?;
                Ok(out)
            }
            Command::Sync => self.sync(out).await,
        }
    }

    fn load_config(&self) -> Result<TapConfig> {
        if self.cli.config.is_empty() {
            return Err(Error::config(
                "No configuration given; pass --config FILE or --config ENV",
            ));
        }
        TapConfig::load(&self.cli.config)
    }

    fn about<W: Write>(&self, out: &mut W, format: AboutFormat) -> Result<()> {
        let spec = CensusConnector::describe();
        match format {
            AboutFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &spec)?;
                writeln!(out)?;
            }
            AboutFormat::Markdown => write!(out, "{}", spec.to_markdown())?,
        }
        Ok(())
    }

    async fn discover<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = Catalog::discover(&crate::streams::all_streams());
        serde_json::to_writer_pretty(&mut *out, &catalog)?;
        writeln!(out)?;
        Ok(())
    }

    async fn test(&self) -> Result<()> {
        let connector = CensusConnector::new(self.load_config()?);
        let result = connector.check().await?;
        if result.success {
            info!("Connection test succeeded");
            Ok(())
        } else {
            Err(Error::Other(format!(
                "Connection test failed: {}",
                result.message.unwrap_or_default()
            )))
        }
    }

    async fn sync<W: Write + Send>(&self, out: W) -> Result<W> {
        let connector = CensusConnector::new(self.load_config()?);
        let state = match &self.cli.state {
            Some(path) => StateManager::from_file(path)?,
            None => StateManager::in_memory(),
        };
        let catalog = match &self.cli.catalog {
            Some(path) => Some(Catalog::from_file(path)?),
            None => None,
        };

        let (stats, writer) = connector
            .read(catalog.as_ref(), state, MessageWriter::new(out))
            .await?;
        for (stream, count) in &stats.records_by_stream {
            info!(stream = %stream, records = count, "Stream totals");
        }
        Ok(writer.into_inner())
    }
}
