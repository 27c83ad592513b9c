//! Tacoline CLI and LINE webhook server entry point.
//!
//! Binary name: `tacoline`
//!
//! Parses CLI arguments, loads the shop configuration, then runs the webhook
//! server, the local chat REPL or the menu printer.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use secrecy::SecretString;

use tacoline_core::reply::box_sender::BoxReplySender;
use tacoline_infra::line::client::LineReplyClient;
use tacoline_infra::log_sender::LoggingReplySender;
use tacoline_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::{AppState, Shop};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let serving = matches!(cli.command, Commands::Serve { .. });
    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });

    // Set up tracing based on verbosity; the server logs requests by default.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 if serving => "info",
        0 => "warn",
        1 => "info,tacoline=debug",
        _ => "trace",
    };
    init_tracing(filter, enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need the shop
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "tacoline", &mut std::io::stdout());
        return Ok(());
    }

    let shop = Shop::load(&cli.config).await?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            channel_secret,
            channel_access_token,
            dry_run,
            otel: _,
        } => {
            let replies = if dry_run {
                tracing::warn!("dry run: replies are logged, not sent to LINE");
                BoxReplySender::new(LoggingReplySender)
            } else {
                let token = channel_access_token
                    .ok_or_else(|| anyhow::anyhow!("LINE_CHANNEL_ACCESS_TOKEN is not set"))?;
                BoxReplySender::new(LineReplyClient::new(SecretString::from(token))?)
            };

            let channel_secret = match channel_secret {
                Some(secret) => Some(SecretString::from(secret)),
                None if dry_run => {
                    tracing::warn!("LINE_CHANNEL_SECRET is not set: webhook signatures are not verified");
                    None
                }
                None => anyhow::bail!("LINE_CHANNEL_SECRET is not set"),
            };

            let state = AppState::new(shop.router(), replies, channel_secret);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} Tacoline listening on {}",
                    console::style("🌮").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {}",
                    console::style(format!("LINE webhook URL: http://{addr}/callback")).dim()
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

        Commands::Chat { user } => {
            cli::chat::run(&shop.router(), &user).await?;
        }

        Commands::Menu => {
            cli::menu::show_menu(&shop, cli.json)?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
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
