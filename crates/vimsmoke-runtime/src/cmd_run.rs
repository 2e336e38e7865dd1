//! `vimsmoke run` — execute the probe and print what the pane rendered.

use std::time::Duration;

use anyhow::Context;
use vimsmoke_core::script::ProbeScript;
use vimsmoke_core::settle::SettleConfig;
use vimsmoke_core::{session_name_for, unique_session_name};
use vimsmoke_tmux::TmuxExecutor;

use crate::cli::RunOpts;
use crate::driver::{self, ProbeOptions, WaitMode};

/// Returns the process exit code. Probe failures are reported on stderr;
/// stdout carries only the captured text (or the JSON report).
pub async fn cmd_run(opts: RunOpts, tmux_socket: Option<String>) -> anyhow::Result<i32> {
    let rtp = match opts.rtp {
        Some(dir) => dir,
        None => std::env::current_dir()
            .context("cannot resolve current directory for rtp")?
            .to_string_lossy()
            .into_owned(),
    };

    let mut script =
        ProbeScript::for_plugin(&opts.plugin, &rtp).with_editor_cmd(opts.editor.as_str());
    if let Some(keys) = opts.keys {
        script = script.with_keystrokes(keys);
    }

    let base = opts
        .session
        .unwrap_or_else(|| session_name_for(&opts.plugin));
    let session = if opts.unique {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        unique_session_name(&base, std::process::id(), nanos)
    } else {
        base
    };

    let wait = match opts.fixed_delay_ms {
        Some(ms) => WaitMode::Fixed(Duration::from_millis(ms)),
        None => WaitMode::Poll(SettleConfig {
            poll_interval: Duration::from_millis(opts.poll_interval_ms),
            stable_after: opts.stable_after,
            max_wait: Duration::from_millis(opts.settle_timeout_ms),
        }),
    };

    let mut executor = TmuxExecutor::default();
    if let Some(name) = tmux_socket {
        executor = executor.with_socket_name(name);
    }

    let probe_opts = ProbeOptions {
        session,
        wait,
        kill_on_success: opts.kill,
    };

    match driver::run_probe(&executor, &script, &probe_opts).await {
        Ok(report) => {
            if opts.json {
                let encoded =
                    serde_json::to_string_pretty(&report).context("failed to encode report")?;
                println!("{encoded}");
            } else {
                // Verbatim, exactly as tmux returned the buffer.
                print!("{}", report.captured);
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("vimsmoke: {e}");
            Ok(e.exit_code())
        }
    }
}
