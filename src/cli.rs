mod check;
mod hue;
mod thresholds;
mod tibber;
mod watch;

use clap::{Parser, Subcommand};

use crate::cli::{check::CheckArgs, watch::WatchArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: keep the heater on or off following the temperature and the prices.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Query the collaborators once, for troubleshooting.
    #[clap(name = "check")]
    Check(Box<CheckArgs>),
}
