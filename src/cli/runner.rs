//! CLI runner - executes commands

use crate::auth::CredentialResolver;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{self, ConnectorConfig};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::service::{AnalyticsService, QuerySpec, ServiceHandle};
use crate::state::StateManager;
use crate::stream::{DateWindow, SearchAnalyticsStream, STREAM_NAME};
use chrono::{Days, Utc};
use futures::StreamExt;
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
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

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check { config_json } => self.check(config_json.as_deref()).await,
            Commands::Spec => self.spec(),
            Commands::Read {
                config_json,
                output,
                max_records,
            } => {
                self.read(config_json.as_deref(), output.as_deref(), *max_records)
                    .await
            }
        }
    }

    /// Load configuration
    fn load_config(&self, inline: Option<&str>) -> Result<ConnectorConfig> {
        // Inline config takes precedence
        if let Some(json_str) = inline {
            return ConnectorConfig::from_json(json_str);
        }

        if let Some(path) = &self.cli.config {
            return ConnectorConfig::from_file(path);
        }

        Err(Error::config(
            "Configuration not specified (use -C or --config-json)",
        ))
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Build an authenticated service handle from the configuration
    async fn build_service(&self, config: &ConnectorConfig) -> Result<ServiceHandle> {
        let http = HttpClient::new();
        let resolver = CredentialResolver::new(&config.service_account_key, http.inner().clone())?;
        info!(
            client_email = resolver.client_email(),
            "Resolved service account credentials"
        );
        let tokens = resolver.resolve()?;
        Ok(ServiceHandle::new(http, tokens, &config.site_url))
    }

    /// Check connection
    async fn check(&self, config_json: Option<&str>) -> Result<()> {
        let config = self.load_config(config_json)?;
        let service = self.build_service(&config).await?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Checking access to {}", config.site_url)
            }
        }));

        // Single-row probe against the most recent finalized date
        let probe_date = Utc::now().date_naive() - Days::new(1);
        let probe = QuerySpec {
            start_date: probe_date,
            end_date: probe_date,
            dimensions: config.dimensions.clone(),
            row_limit: 1,
            start_row: 0,
        };

        match service.query(&probe).await {
            Ok(_) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "message": "Connection successful"
                    }
                }));
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Connection failed: {e}")
                    }
                }));
            }
        }

        Ok(())
    }

    /// Show spec
    fn spec(&self) -> Result<()> {
        self.output_message(&json!({
            "type": "SPEC",
            "spec": {
                "documentationUrl": "https://developers.google.com/webmaster-tools/v1/searchanalytics/query",
                "connectionSpecification": config::config_schema()
            }
        }));

        Ok(())
    }

    /// Extract records
    async fn read(
        &self,
        config_json: Option<&str>,
        output: Option<&Path>,
        max_records: Option<usize>,
    ) -> Result<()> {
        let sync_start = Instant::now();
        let config = self.load_config(config_json)?;
        let state = self.load_state()?;

        let checkpoint = state.get_checkpoint(STREAM_NAME).await;
        let today = Utc::now().date_naive();
        let window = DateWindow::for_run(checkpoint, config.start_date, today);

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Starting sync for stream: {STREAM_NAME} ({} to {})",
                    window.start, window.end
                )
            }
        }));

        let mut writer = output.map(Self::open_output).transpose()?;
        let mut records_emitted = 0usize;
        let mut truncated = false;

        if window.is_empty() {
            self.output_message(&json!({
                "type": "LOG",
                "log": {
                    "level": "INFO",
                    "message": "No new finalized dates since last checkpoint, nothing to sync"
                }
            }));
        } else {
            let service = Arc::new(self.build_service(&config).await?);
            let stream = SearchAnalyticsStream::new(
                service,
                config.dimensions.clone(),
                config.row_limit,
                window,
            );

            let mut records = Box::pin(stream.records());
            while let Some(result) = records.next().await {
                let record = match result {
                    Ok(record) => record,
                    Err(e) => {
                        self.output_message(&json!({
                            "type": "LOG",
                            "log": {
                                "level": "ERROR",
                                "message": format!("Error syncing stream {STREAM_NAME}: {e}")
                            }
                        }));
                        return Err(e);
                    }
                };

                self.emit_record(&record, writer.as_mut())?;
                records_emitted += 1;

                if max_records.is_some_and(|max| records_emitted >= max) {
                    truncated = true;
                    break;
                }
            }
        }

        if let Some(writer) = writer.as_mut() {
            writer.flush()?;
        }

        // A truncated run never observed the short page, so the window is not
        // known to be complete and the checkpoint must stay put
        if truncated {
            self.output_message(&json!({
                "type": "LOG",
                "log": {
                    "level": "WARN",
                    "message": format!(
                        "Stopped after {records_emitted} records (--max-records), checkpoint not advanced"
                    )
                }
            }));
        } else if !window.is_empty() {
            state.set_checkpoint(STREAM_NAME, window.end).await?;
        }

        self.output_message(&json!({
            "type": "STATE",
            "state": serde_json::from_str::<Value>(&state.to_json_pretty().await?)
                .unwrap_or_default()
        }));

        self.output_message(&json!({
            "type": "SYNC_SUMMARY",
            "summary": {
                "status": "SUCCEEDED",
                "stream": STREAM_NAME,
                "site_url": config.site_url,
                "records_emitted": records_emitted,
                "window_start": window.start,
                "window_end": window.end,
                "duration_ms": sync_start.elapsed().as_millis() as u64
            }
        }));

        Ok(())
    }

    fn open_output(path: &Path) -> Result<BufWriter<File>> {
        let file = File::create(path)
            .map_err(|e| Error::config(format!("Failed to create output file: {e}")))?;
        Ok(BufWriter::new(file))
    }

    /// Emit one record, either as a JSON line in the output file or as a
    /// RECORD message on stdout
    fn emit_record(
        &self,
        record: &crate::record::CanonicalRecord,
        writer: Option<&mut BufWriter<File>>,
    ) -> Result<()> {
        if let Some(writer) = writer {
            serde_json::to_writer(&mut *writer, record)?;
            writeln!(writer)?;
            return Ok(());
        }

        self.output_message(&json!({
            "type": "RECORD",
            "record": {
                "stream": STREAM_NAME,
                "data": record,
                "emitted_at": Utc::now().timestamp_millis()
            }
        }));

        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
