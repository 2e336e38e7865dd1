//! vimsmoke: smoke-test driver for Vim plugins inside tmux.
//! Boots a detached session, loads one plugin into a bare Vim, injects a
//! keystroke script, and prints what the pane rendered.

use clap::Parser;

mod cli;
mod cmd_clean;
mod cmd_run;
mod driver;
mod preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logging goes to stderr; stdout carries only the probe output.
    let filter = std::env::var("VIMSMOKE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let code = match args.command {
        cli::Command::Run(opts) => cmd_run::cmd_run(opts, args.tmux_socket).await?,
        cli::Command::Preflight(opts) => preflight::run_preflight(&opts.editor, &opts.plugin),
        cli::Command::Clean(opts) => {
            let session = opts
                .session
                .unwrap_or_else(|| vimsmoke_core::session_name_for(&opts.plugin));
            let mut executor = vimsmoke_tmux::TmuxExecutor::default();
            if let Some(name) = args.tmux_socket {
                executor = executor.with_socket_name(name);
            }
            cmd_clean::cmd_clean(&executor, &session)
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
