//! `qpowerhalctl`: talks to the daemon over its unix socket.

mod app;
mod client;
mod executor;
mod output;

pub use app::Cli;
use crate::Result;

pub async fn run() -> Result<()> {
    use clap::Parser;

    executor::execute(Cli::parse()).await
}
