#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod bot;
mod error;
mod fetch;
mod format;
mod model;
mod scheduler;
mod status;
mod utils;

use crate::model::read_config;
use crate::utils::{create_client, init_logger};
use clap::Parser;
use log::{error, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "streamwatch")]
#[command(version)]
#[command(about = "Streaming panel watchdog with Telegram alerts", long_about = None)]
struct Args {
    /// The config file
    #[arg(short = 'c', long = "config", default_value = "config.yml")]
    config_file: String,

    /// log level
    #[arg(short = 'l', long = "log-level", default_missing_value = "info")]
    log_level: Option<String>,
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logger(args.log_level.as_ref(), args.config_file.as_str());

    info!("Version: {VERSION}");
    info!("Current time: {}", chrono::offset::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("Config file: {:?}", args.config_file);

    let config = read_config(&args.config_file).unwrap_or_else(|err| exit!("{}", err));
    info!("Panel url: {}", config.panel.url);
    let config = Arc::new(config);

    let client = create_client().build().unwrap_or_else(|err| {
        error!("Failed to build client {err}");
        reqwest::Client::new()
    });
    let client = Arc::new(client);

    let cancel = CancellationToken::new();
    let scheduler = tokio::spawn(scheduler::start_scheduler(
        Arc::clone(&client),
        Arc::clone(&config),
        cancel.clone(),
    ));
    let commands = tokio::spawn(bot::run_command_loop(
        Arc::clone(&client),
        Arc::clone(&config),
        cancel.clone(),
    ));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(err) => error!("Failed to listen for shutdown signal: {err}"),
    }
    cancel.cancel();
    let _ = tokio::join!(scheduler, commands);
}
