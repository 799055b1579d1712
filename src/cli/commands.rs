//! CLI command implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::http_server::HttpServer;
use crate::logging;
use crate::store::MemoryStore;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, host, port } => serve(&config, host, port),
    }
}

/// Write a default configuration file. Never overwrites an existing one.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path.display()));
    }

    let content = serde_json::to_string_pretty(&ServiceConfig::default())
        .map_err(|e| CliError::io_error(format!("JSON error: {}", e)))?;
    fs::write(config_path, content)?;

    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}

/// Boot the store and serve HTTP until SIGINT/SIGTERM.
///
/// 1. Load config (missing file means defaults), apply CLI overrides
/// 2. Install the tracing subscriber
/// 3. Open the store, locking and seeding it from the data file if configured
/// 4. Serve; every write already reached the data file when this returns
pub fn serve(config_path: &Path, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let mut config = ServiceConfig::load_or_default(config_path)?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config.validate()?;

    if !logging::init(&config.log_filter, config.log_json) {
        tracing::debug!("tracing subscriber already installed, keeping it");
    }

    let store = match &config.data_file {
        Some(path) => MemoryStore::open(path)?,
        None => MemoryStore::new(),
    };

    let server = HttpServer::new(config.clone(), Arc::new(store));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start(shutdown_signal())
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable, waiting for Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.json");

        init(&path).unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.json");
        fs::write(&path, "{}").unwrap();

        let err = init(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_serve_rejects_invalid_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.json");

        let err = serve(&path, None, Some(0)).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_serve_refuses_data_file_held_by_another_store() {
        let temp_dir = TempDir::new().unwrap();
        let data_file = temp_dir.path().join("store.json");
        let path = temp_dir.path().join("inventory.json");
        let config = ServiceConfig {
            data_file: Some(data_file.clone()),
            ..ServiceConfig::with_port(0)
        };
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let _held = MemoryStore::open(&data_file).unwrap();

        let err = serve(&path, None, Some(8000)).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::BootFailed);
        assert!(err.to_string().contains("locked"));
    }
}
