use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wsimage_engine::{BuilderProvisioner, ProvisionerConfig, handle_event};

#[derive(Debug, Parser)]
#[command(name = "wsimage", about = "Provision a WorkSpaces image builder desktop", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve invocations from the Lambda runtime API (default)
    Serve,
    /// Run a single invocation locally and print the response
    Invoke {
        /// Path to the event JSON, or `-` for stdin
        #[arg(long, short = 'e', default_value = "-")]
        event: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ProvisionerConfig::from_env().context("load provisioner configuration")?;
    let clients = wsimage_api::aws::load_service_clients().await;
    let provisioner = Arc::new(BuilderProvisioner::new(config, clients));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(provisioner).await,
        Command::Invoke { event } => invoke(&provisioner, &event).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // CloudWatch stamps each line itself and does not render ANSI colours.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
}

async fn serve(provisioner: Arc<BuilderProvisioner>) -> Result<()> {
    info!("starting lambda runtime loop");
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let provisioner = Arc::clone(&provisioner);
        async move {
            info!(request_id = %event.context.request_id, "received invocation");
            let response = handle_event(&provisioner, event.payload).await;
            Ok::<_, lambda_runtime::Error>(response)
        }
    }))
    .await
    .map_err(|error| anyhow!("lambda runtime stopped: {error}"))
}

async fn invoke(provisioner: &BuilderProvisioner, source: &str) -> Result<()> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("read event from stdin")?;
        buffer
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("read event file {source}"))?
    };
    let event: Value = if raw.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&raw).with_context(|| format!("parse event JSON from {source}"))?
    };

    let response = handle_event(provisioner, event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
