// ABOUTME: Entry point for the eosup CLI application.
// ABOUTME: Parses arguments and dispatches run/stop against the local daemon.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use eosup::config::{DEFAULT_INSTANCE, NodeConfig};
use eosup::error::Result;
use eosup::output::{Output, OutputMode};
use eosup::reconcile::Reconciler;
use eosup::runtime::BollardRuntime;
use eosup::types::ContainerName;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);

    if let Err(e) = run(cli, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    let runtime = BollardRuntime::connect_local()?;
    let reconciler = Reconciler::new(&runtime);

    match cli.command {
        Commands::Run {
            instance_name,
            image,
            port,
            volumes,
        } => {
            let config = NodeConfig::from_args(
                instance_name.as_deref(),
                image.as_deref(),
                port.as_deref(),
                volumes.as_deref(),
            )?;

            let id = reconciler
                .run(&config, |event| output.handle(&event))
                .await?;

            output.result(&format!(
                "Node is running: name={} id={}",
                config.name.trimmed(),
                id
            ));
            Ok(())
        }
        Commands::Stop { instance_name } => {
            let name = ContainerName::new(instance_name.as_deref().unwrap_or(DEFAULT_INSTANCE))?;
            reconciler.stop(&name).await?;

            output.result(&format!("Node stopped: name={}", name.trimmed()));
            Ok(())
        }
    }
}
