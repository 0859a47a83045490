//! devsrv - local development web server.
//!
//! Entry point: parses arguments, initializes logging, runs the server until
//! Ctrl+C, then tears it down gracefully.

mod cli;
mod logger;
mod ui;

use clap::Parser;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    run(&args).await.map_err(|error| miette::miette!("{}", error))
}

async fn run(args: &cli::Cli) -> devsrv::Result<()> {
    let config = args.to_config();
    ui::info(&format!("options: {:?}", config));

    let server = devsrv::Server::new(config);
    let addr = server.start().await?;

    ui::success(&format!("Server running at http://{}", addr));
    ui::info("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    ui::info("Shutting down...");
    server.stop()?;
    server.wait_until_stopped().await;
    ui::success("Server stopped");

    Ok(())
}
