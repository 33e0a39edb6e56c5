//! Conference Central CLI and REST API entry point.
//!
//! Binary name: `confcentral`
//!
//! Parses CLI arguments, loads configuration, initializes database and
//! services, then dispatches to the appropriate command handler or starts
//! the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use confcentral_infra::config::{load_global_config, resolve_data_dir};
use confcentral_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands, KeyCommand, ListResource};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config, tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "confcentral", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = load_global_config(&data_dir).await;

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), config.enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli, AppState::init(data_dir, config).await?).await;

    shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.host.clone());
            let port = port.unwrap_or(state.config.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(%addr, "REST API listening");
            if !cli.quiet {
                println!(
                    "  {} Conference Central API listening on {}",
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

        Commands::Key { action } => match action {
            KeyCommand::Issue { email, name } => {
                cli::key::issue_key(&state, &email, &name, cli.json).await?;
            }
        },

        Commands::List { resource } => match resource {
            ListResource::Conferences => {
                cli::conference::list_conferences(&state, cli.json).await?;
            }
            ListResource::Sessions { key } => {
                cli::session::list_sessions(&state, &key, cli.json).await?;
            }
        },

        Commands::Show { key } => {
            cli::conference::show_conference(&state, &key, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled before state init"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that branch never resolves and the
/// other one still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
