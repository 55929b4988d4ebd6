//! intervu REST API, realtime gateway and operator CLI entry point.
//!
//! Binary name: `intervu`
//!
//! Parses CLI arguments, loads configuration, opens the database, then
//! dispatches to the operator commands or starts the server.

mod cli;
mod http;
mod state;

#[cfg(test)]
mod testing;

use anyhow::Context;
use clap::Parser;

use intervu_infra::config::{load_app_config, resolve_data_dir};
use intervu_observe::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::{AppState, open_database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn,intervu=info",
        1 => "info,intervu=debug",
        _ => "trace",
    };

    init_tracing(TracingOptions {
        format: cli.log_format,
        enable_otel: cli.otel,
        default_directive: filter.to_string(),
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir();
    let config = load_app_config(&data_dir).await;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::init(&data_dir, config).await?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            tracing::info!(%addr, data_dir = %data_dir.display(), "intervu listening");
            if !cli.quiet {
                println!(
                    "  {} intervu API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Credits { action } => {
            let pool = open_database(&data_dir, &config).await?;
            cli::credits::handle_credits_command(action, &pool, cli.json).await?;
        }

        Commands::Migrate => {
            // Opening the pool applies pending migrations.
            open_database(&data_dir, &config).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "migrated": true }));
            } else if !cli.quiet {
                println!(
                    "  {} Database is up to date in {}",
                    console::style("ok").green(),
                    console::style(data_dir.display()).cyan()
                );
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
