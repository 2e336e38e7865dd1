//! CLI definition using clap derive.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vimsmoke", about = "smoke-test a Vim plugin inside tmux")]
pub struct Cli {
    /// tmux server socket name (tmux -L), for an isolated server
    #[arg(long, short = 'L', global = true)]
    pub tmux_socket: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the probe and print what the pane rendered
    Run(RunOpts),
    /// Check the environment: tmux, editor binary, plugin file
    Preflight(PreflightOpts),
    /// Kill a leftover probe session
    Clean(CleanOpts),
}

#[derive(Args)]
pub struct RunOpts {
    /// Plugin file loaded via :runtime!
    #[arg(long, default_value = "plugin/ferret.vim")]
    pub plugin: String,

    /// Directory appended to Vim's runtime path (default: current dir)
    #[arg(long)]
    pub rtp: Option<String>,

    /// Session name (default: vimsmoke-<plugin stem>)
    #[arg(long)]
    pub session: Option<String>,

    /// Append a per-run suffix to the session name
    #[arg(long)]
    pub unique: bool,

    /// Kill the session after a successful probe
    #[arg(long)]
    pub kill: bool,

    /// Keystroke script delivered after startup, as raw send-keys args
    #[arg(long = "keys", value_name = "KEY", num_args = 1.., allow_hyphen_values = true)]
    pub keys: Option<Vec<String>>,

    /// Editor launch line typed into the fresh session
    #[arg(long, default_value = "vim -u NONE")]
    pub editor: String,

    /// Replace readiness polling with a single fixed delay
    #[arg(long, value_name = "MS")]
    pub fixed_delay_ms: Option<u64>,

    /// Pause between readiness captures
    #[arg(long, value_name = "MS", default_value = "150")]
    pub poll_interval_ms: u64,

    /// Consecutive identical frames required to call the pane settled
    #[arg(long, default_value = "3")]
    pub stable_after: u32,

    /// Maximum readiness wait before proceeding anyway
    #[arg(long, value_name = "MS", default_value = "5000")]
    pub settle_timeout_ms: u64,

    /// Emit the structured JSON report instead of the raw capture
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PreflightOpts {
    /// Plugin file the probe would load
    #[arg(long, default_value = "plugin/ferret.vim")]
    pub plugin: String,

    /// Editor binary the probe would launch
    #[arg(long, default_value = "vim")]
    pub editor: String,
}

#[derive(Args)]
pub struct CleanOpts {
    /// Session to kill (default: derived from --plugin)
    #[arg(long)]
    pub session: Option<String>,

    /// Plugin file whose derived session name to kill
    #[arg(long, default_value = "plugin/ferret.vim")]
    pub plugin: String,
}
