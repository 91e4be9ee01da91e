//! netclock command line
//!
//! - `serve`  host the homepage and the clock page over HTTP
//! - `watch`  mount the clock page and print it on every update
//! - `home`   print the homepage document

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use netclock_core::NetclockResult;
use netclock_site::{render_home_page, telemetry, ClockPage, SiteConfig, SiteServer};
use netclock_time::{SystemClock, WorldTimeApi, Zone};

#[derive(Debug, Parser)]
#[command(name = "netclock", version, about = "Network-corrected clock and feature site")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the site over HTTP
    Serve {
        /// Override server.listen
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    /// Show the clock page in the terminal until Ctrl-C
    Watch,
    /// Print the homepage HTML
    Home,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SiteConfig::from_file(path)?,
        None => SiteConfig::default(),
    };
    telemetry::init(&config.log)?;

    match cli.command {
        Command::Serve { listen } => {
            if let Some(listen) = listen {
                config.server.listen = listen;
            }
            serve(&config).await?;
        }
        Command::Watch => watch(&config).await?,
        Command::Home => println!("{}", render_home_page()),
    }

    Ok(())
}

async fn serve(config: &SiteConfig) -> NetclockResult<()> {
    let source = Arc::new(WorldTimeApi::new(config.time_source.endpoint.clone()));
    let server = SiteServer::bind(config, source, Arc::new(SystemClock), Zone::local()).await?;
    server.run(shutdown_signal()).await
}

async fn watch(config: &SiteConfig) -> NetclockResult<()> {
    let source = Arc::new(WorldTimeApi::new(config.time_source.endpoint.clone()));
    let page = ClockPage::new(source, Arc::new(SystemClock))
        .with_refresh_interval(config.clock.refresh_interval)
        .mount();
    page.watch(
        &Zone::local(),
        config.clock.locale,
        &mut std::io::stdout(),
        shutdown_signal(),
    )
    .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
