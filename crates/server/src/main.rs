use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use session_bridge_core::OperationRequest;
use session_bridge_dispatcher::{BatchItem, CommandDispatcher};
use session_bridge_provider::{DryRunTransport, DynTransport, NoBinaryData};
use session_bridge_server::api::{self, AppState};
use session_bridge_server::config::BridgeConfig;
use session_bridge_session::SessionClient;
use session_bridge_trigger::{ChannelSink, DynEventSink, HttpForwardSink, LogSink, WebhookEventRouter};

/// Session Webhook Server bridge.
#[derive(Parser, Debug)]
#[command(name = "session-bridge", about = "Bridge to a Session Webhook Server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "session-bridge.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the webhook server (default).
    Serve,
    /// Dispatch a batch of operations read from a JSON file and print the results.
    Dispatch {
        /// Batch file, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Record per-item failures and continue instead of aborting.
        #[arg(long)]
        continue_on_fail: bool,

        /// Log the commands instead of sending them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Query `GET /status` on the Session Webhook Server.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = BridgeConfig::load(&cli.config)?;
    let telemetry_guard = session_bridge_server::telemetry::init(&config.telemetry);

    if !Path::new(&cli.config).exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, cli.host, cli.port).await,
        Commands::Dispatch {
            input,
            continue_on_fail,
            dry_run,
        } => run_dispatch(&config, &input, continue_on_fail, dry_run).await,
        Commands::Status => run_status(&config).await,
    };

    telemetry_guard.shutdown();
    result
}

async fn serve(
    config: BridgeConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let subscription = config.trigger.subscription()?;
    info!(
        events = ?config.trigger.events,
        path = %config.trigger.path,
        "webhook subscription loaded"
    );

    let sink: Arc<dyn DynEventSink> = match &config.forward.url {
        Some(url) => {
            info!(url = %url, "forwarding routed events");
            Arc::new(HttpForwardSink::new(
                url.clone(),
                Duration::from_secs(config.forward.timeout_seconds),
            ))
        }
        None => {
            info!("no [forward] url configured, logging routed events");
            Arc::new(LogSink)
        }
    };

    let (queue, receiver) = ChannelSink::channel(config.forward.queue_capacity);
    let forwarder = tokio::spawn(api::webhook::run_forwarder(receiver, sink));

    let state = AppState::new(WebhookEventRouter::new(subscription), queue);
    let app = api::router(state, &config.trigger.path);

    let host = host.unwrap_or(config.server.host);
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "session-bridge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The app and its queue sender are gone once serve returns; the
    // forwarder finishes after draining what is left.
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    info!(
        timeout_secs = config.server.shutdown_timeout_seconds,
        "waiting for queued events..."
    );
    if tokio::time::timeout(shutdown_timeout, forwarder).await.is_err() {
        warn!(
            timeout_secs = config.server.shutdown_timeout_seconds,
            "shutdown timeout exceeded, some events may not have been forwarded"
        );
    }

    info!("session-bridge shut down");
    Ok(())
}

fn build_transport(
    config: &BridgeConfig,
    dry_run: bool,
) -> Result<Arc<dyn DynTransport>, Box<dyn std::error::Error>> {
    if dry_run {
        return Ok(Arc::new(DryRunTransport::new()));
    }
    let client_config = config.session.to_client_config()?;
    info!(base_url = %client_config.base_url, "using Session Webhook Server");
    Ok(Arc::new(SessionClient::new(client_config)))
}

/// Run the `dispatch` subcommand: read a batch, send it, print the results.
async fn run_dispatch(
    config: &BridgeConfig,
    input: &str,
    continue_on_fail: bool,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };

    // A single object is a batch of one.
    let batch: Vec<BatchItem> = match serde_json::from_str::<serde_json::Value>(&raw)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value::<BatchItem>)
            .collect::<Result<Vec<_>, _>>()?,
        single => vec![serde_json::from_value(single)?],
    };

    let mut dispatcher_config = config.dispatcher_config();
    if continue_on_fail {
        dispatcher_config = dispatcher_config.with_isolate_failures(true);
    }

    let dispatcher = CommandDispatcher::new(build_transport(config, dry_run)?, dispatcher_config);
    let results = dispatcher.dispatch(&batch).await?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// Run the `status` subcommand.
async fn run_status(config: &BridgeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = CommandDispatcher::new(build_transport(config, false)?, config.dispatcher_config());
    let status = dispatcher
        .dispatch_one(&OperationRequest::GetStatus {}, &NoBinaryData)
        .await
        .inspect_err(|e| {
            warn!(kind = %e.kind(), retryable = e.is_retryable(), error = %e, "status check failed");
        })?;

    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
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
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
