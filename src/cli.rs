use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::guide::{DEFAULT_TICK_INTERVAL, Service};

#[derive(Debug, Parser)]
#[command(
    name = "tvguide",
    version,
    about = "Today's TV guide, filtered to your shows, with live airing status"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Endpoint serving today's guide as JSON
    #[arg(long, env = "TVGUIDE_URL", global = true)]
    pub guide_url: Option<String>,

    /// Read the guide from a JSON file instead of the network
    #[arg(long, env = "TVGUIDE_FILE", global = true)]
    pub guide_file: Option<PathBuf>,

    /// IANA timezone the broadcast times are expressed in
    #[arg(long, env = "TVGUIDE_TIMEZONE", default_value = "Australia/Sydney", global = true)]
    pub timezone: String,

    /// Seconds between live status refreshes
    #[arg(long, env = "TVGUIDE_TICK_SECS", default_value_t = DEFAULT_TICK_INTERVAL.as_secs(), global = true)]
    pub tick_secs: u64,

    /// Viewer whose subscriptions filter the guide
    #[arg(long, env = "TVGUIDE_VIEWER", global = true)]
    pub viewer: Option<String>,

    /// Show every programme, ignoring subscriptions
    #[arg(long, global = true)]
    pub all: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive guide (default)
    Tui,
    /// Print the guide once
    List {
        #[arg(long, value_enum, default_value_t = ServiceArg::All)]
        service: ServiceArg,
    },
    /// Follow a show by its exact title
    Subscribe { title: String },
    /// Stop following a show
    Unsubscribe { title: String },
    /// List followed shows
    Subscriptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceArg {
    Fta,
    Bbc,
    All,
}

impl From<ServiceArg> for Service {
    fn from(value: ServiceArg) -> Self {
        match value {
            ServiceArg::Fta => Self::Fta,
            ServiceArg::Bbc => Self::Bbc,
            ServiceArg::All => Self::All,
        }
    }
}
