use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "heimdallr")]
#[command(author = "Jerome Froelich")]
#[command(version)]
#[command(about = "Reconcile HTTPCheck resources onto Pingdom", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sync with Pingdom, then reconcile a stream of watch events
    Run(RunArgs),

    /// Sync with Pingdom and show the checks heimdallr owns
    List(ConnectionArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// How to reach Pingdom and which checks are ours
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Pingdom username (the owner's email)
    #[arg(long, env = "PINGDOM_USERNAME", default_value = "")]
    pub username: String,

    /// Pingdom password
    #[arg(long, env = "PINGDOM_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Pingdom application key
    #[arg(long, env = "PINGDOM_APPKEY", default_value = "", hide_env_values = true)]
    pub appkey: String,

    /// Pingdom API root
    #[arg(long, env = "PINGDOM_API_BASE", default_value = pingdom::DEFAULT_API_BASE)]
    pub api_base: String,

    /// Tag marking checks managed by heimdallr
    #[arg(long, env = "HEIMDALLR_TAG", default_value = reconciler::DEFAULT_TAG)]
    pub tag: String,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Read watch events from a file instead of stdin
    ///
    /// Expects the output of
    /// `kubectl get httpchecks -A --watch --output-watch-events -o json`.
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,
}
