//! Sequential probe driver: one linear pass over a detached session.
//!
//! Create the session, launch the editor, wait for it to draw, configure
//! it, inject the keystroke script, wait again, then capture the pane
//! through the copy buffer. Any failing step aborts with a diagnostic
//! naming the step; a session this run created is torn down on abort.

use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;
use vimsmoke_core::report::{ProbeReport, Step};
use vimsmoke_core::script::ProbeScript;
use vimsmoke_core::settle::{SettleConfig, SettleStatus, SettleTracker};
use vimsmoke_tmux::{TmuxCommandRunner, TmuxError, capture, session};

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("session creation failed: {0}")]
    Session(#[source] TmuxError),

    #[error("{step} delivery failed: {source}")]
    Delivery {
        step: Step,
        #[source]
        source: TmuxError,
    },

    #[error("capture failed: {0}")]
    Capture(#[source] TmuxError),

    #[error("interrupted")]
    Interrupted,
}

impl ProbeError {
    /// Process exit code: 1 probe failure, 2 tmux missing, 3 interrupted.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Session(TmuxError::NotFound) => 2,
            Self::Interrupted => 3,
            _ => 1,
        }
    }
}

/// How the driver waits for the editor between deliveries.
#[derive(Debug, Clone, Copy)]
pub enum WaitMode {
    /// Bounded stabilization poll (default).
    Poll(SettleConfig),
    /// Single fixed delay, no readiness check.
    Fixed(Duration),
}

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub session: String,
    pub wait: WaitMode,
    pub kill_on_success: bool,
}

/// Run the whole probe sequence against one fresh session.
///
/// The session must not already exist; a name collision aborts before
/// any delivery step. On success the session is left running unless
/// `kill_on_success` is set. On any abort after creation the session is
/// killed best-effort so failed runs do not leak a half-initialized
/// editor.
pub async fn run_probe(
    runner: &impl TmuxCommandRunner,
    script: &ProbeScript,
    opts: &ProbeOptions,
) -> Result<ProbeReport, ProbeError> {
    let mut report = ProbeReport::new(opts.session.clone(), Utc::now());
    let name = opts.session.as_str();

    let t = Instant::now();
    session::new_session(runner, name).map_err(ProbeError::Session)?;
    report.record(Step::CreateSession, t.elapsed());
    tracing::info!(session = name, "session created");

    match drive(runner, script, opts, &mut report).await {
        Ok(captured) => {
            report.captured = captured;
            if opts.kill_on_success {
                let t = Instant::now();
                if let Err(e) = session::kill_session(runner, name) {
                    tracing::warn!(session = name, error = %e, "failed to kill session");
                }
                report.record(Step::Cleanup, t.elapsed());
            }
            Ok(report)
        }
        Err(e) => {
            if let Err(kill_err) = session::kill_session(runner, name) {
                tracing::warn!(session = name, error = %kill_err, "failed to kill session after abort");
            }
            Err(e)
        }
    }
}

async fn drive(
    runner: &impl TmuxCommandRunner,
    script: &ProbeScript,
    opts: &ProbeOptions,
    report: &mut ProbeReport,
) -> Result<String, ProbeError> {
    let name = opts.session.as_str();

    let t = Instant::now();
    session::send_line(runner, name, &script.editor_cmd).map_err(|e| ProbeError::Delivery {
        step: Step::LaunchEditor,
        source: e,
    })?;
    report.record(Step::LaunchEditor, t.elapsed());
    tracing::debug!(session = name, cmd = %script.editor_cmd, "editor launched");

    settle(runner, name, &opts.wait, report).await?;

    let t = Instant::now();
    for cmd in &script.startup_cmds {
        session::send_line(runner, name, cmd).map_err(|e| ProbeError::Delivery {
            step: Step::Configure,
            source: e,
        })?;
    }
    report.record(Step::Configure, t.elapsed());

    let t = Instant::now();
    let keys: Vec<&str> = script.keystrokes.iter().map(String::as_str).collect();
    session::send_keys(runner, name, &keys).map_err(|e| ProbeError::Delivery {
        step: Step::SendKeys,
        source: e,
    })?;
    report.record(Step::SendKeys, t.elapsed());
    tracing::debug!(session = name, count = keys.len(), "keystrokes delivered");

    settle(runner, name, &opts.wait, report).await?;

    let t = Instant::now();
    capture::capture_pane(runner, name).map_err(ProbeError::Capture)?;
    let captured = capture::show_buffer(runner).map_err(ProbeError::Capture)?;
    // Cleanup of multiplexer scratch state only — the result is already
    // in hand, so a failure here is not fatal.
    if let Err(e) = capture::delete_buffer(runner) {
        tracing::warn!(error = %e, "failed to delete copy buffer");
    }
    report.record(Step::Capture, t.elapsed());

    Ok(captured)
}

/// Wait for the pane to stop changing, or just sleep in fixed mode.
/// Ctrl-C aborts the wait.
async fn settle(
    runner: &impl TmuxCommandRunner,
    name: &str,
    wait: &WaitMode,
    report: &mut ProbeReport,
) -> Result<(), ProbeError> {
    let t = Instant::now();
    match wait {
        WaitMode::Fixed(delay) => {
            tokio::select! {
                _ = tokio::time::sleep(*delay) => {}
                _ = tokio::signal::ctrl_c() => return Err(ProbeError::Interrupted),
            }
        }
        WaitMode::Poll(config) => {
            let mut tracker = SettleTracker::new(*config);
            let mut last = Instant::now();
            loop {
                let frame =
                    capture::capture_pane_lines(runner, name).map_err(ProbeError::Capture)?;
                let status = tracker.observe(frame, last.elapsed());
                last = Instant::now();
                match status {
                    SettleStatus::Settled => break,
                    SettleStatus::TimedOut => {
                        tracing::debug!(session = name, "settle budget exhausted, proceeding");
                        report.settled = false;
                        break;
                    }
                    SettleStatus::Pending => {}
                }
                tokio::select! {
                    _ = tokio::time::sleep(config.poll_interval) => {}
                    _ = tokio::signal::ctrl_c() => return Err(ProbeError::Interrupted),
                }
            }
        }
    }
    report.record(Step::Settle, t.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted runner: records every call, answers captures with canned
    /// frames.
    struct ScriptedRunner {
        calls: Mutex<Vec<Vec<String>>>,
        existing_session: bool,
        fail_send_keys: bool,
        changing_frames: bool,
        frame_counter: Mutex<u32>,
    }

    const BUFFER_TEXT: &str = "~\n~\nVIM - Vi IMproved 9.1\n";

    impl ScriptedRunner {
        fn fresh() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                existing_session: false,
                fail_send_keys: false,
                changing_frames: false,
                frame_counter: Mutex::new(0),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().expect("lock").clone()
        }

        fn commands(&self) -> Vec<String> {
            self.calls()
                .iter()
                .map(|c| c.first().cloned().unwrap_or_default())
                .collect()
        }
    }

    impl TmuxCommandRunner for ScriptedRunner {
        fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
            self.calls
                .lock()
                .expect("lock")
                .push(args.iter().map(|s| s.to_string()).collect());
            match args.first().copied() {
                Some("has-session") => {
                    if self.existing_session {
                        Ok(String::new())
                    } else {
                        Err(TmuxError::CommandFailed("can't find session".to_string()))
                    }
                }
                Some("send-keys") if self.fail_send_keys => {
                    Err(TmuxError::CommandFailed("no server running".to_string()))
                }
                Some("capture-pane") if args.contains(&"-p") => {
                    if self.changing_frames {
                        let mut counter = self.frame_counter.lock().expect("lock");
                        *counter += 1;
                        Ok(format!("redraw {counter}\n"))
                    } else {
                        Ok(BUFFER_TEXT.to_string())
                    }
                }
                Some("show-buffer") => Ok(BUFFER_TEXT.to_string()),
                _ => Ok(String::new()),
            }
        }
    }

    fn poll_opts(session: &str) -> ProbeOptions {
        ProbeOptions {
            session: session.to_string(),
            wait: WaitMode::Poll(SettleConfig {
                poll_interval: Duration::from_millis(1),
                stable_after: 1,
                max_wait: Duration::from_millis(200),
            }),
            kill_on_success: false,
        }
    }

    fn script() -> ProbeScript {
        ProbeScript::for_plugin("plugin/ferret.vim", "/repo/ferret")
    }

    #[tokio::test]
    async fn happy_path_issues_documented_sequence() {
        let runner = ScriptedRunner::fresh();
        let report = run_probe(&runner, &script(), &poll_opts("vimsmoke-ferret"))
            .await
            .expect("probe should succeed");

        let commands = runner.commands();
        let deliveries = commands.iter().filter(|c| *c == "send-keys").count();
        assert_eq!(deliveries, 5, "launch + three configure + one keystroke batch");

        // Documented order: create, launch, settle, configure x3, keys,
        // settle, capture, buffer read, buffer delete. Settle polls use
        // capture-pane -p and never touch the buffer.
        let calls = runner.calls();
        let without_polls: Vec<&str> = calls
            .iter()
            .filter(|c| !(c[0] == "capture-pane" && c.iter().any(|a| a == "-p")))
            .map(|c| c[0].as_str())
            .collect();
        assert_eq!(
            without_polls,
            vec![
                "has-session",
                "new-session",
                "send-keys",
                "send-keys",
                "send-keys",
                "send-keys",
                "send-keys",
                "capture-pane",
                "show-buffer",
                "delete-buffer",
            ]
        );

        assert!(!commands.contains(&"kill-session".to_string()));
        assert!(report.settled);
        assert_eq!(report.captured, BUFFER_TEXT, "buffer text printed untransformed");
        assert_eq!(report.steps.first().map(|s| s.step), Some(Step::CreateSession));
        assert_eq!(report.steps.last().map(|s| s.step), Some(Step::Capture));
    }

    #[tokio::test]
    async fn collision_aborts_before_any_delivery() {
        let runner = ScriptedRunner {
            existing_session: true,
            ..ScriptedRunner::fresh()
        };
        let err = run_probe(&runner, &script(), &poll_opts("vimsmoke-ferret"))
            .await
            .expect_err("collision must fail");

        match err {
            ProbeError::Session(TmuxError::SessionExists(name)) => {
                assert_eq!(name, "vimsmoke-ferret");
            }
            other => panic!("expected SessionExists, got {other:?}"),
        }
        assert_eq!(runner.commands(), vec!["has-session"]);
    }

    #[tokio::test]
    async fn delivery_failure_kills_created_session() {
        let runner = ScriptedRunner {
            fail_send_keys: true,
            ..ScriptedRunner::fresh()
        };
        let err = run_probe(&runner, &script(), &poll_opts("vimsmoke-ferret"))
            .await
            .expect_err("delivery must fail");

        match &err {
            ProbeError::Delivery { step, .. } => assert_eq!(*step, Step::LaunchEditor),
            other => panic!("expected Delivery, got {other:?}"),
        }
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            runner.commands().last().map(String::as_str),
            Some("kill-session"),
            "aborted run must tear down the session it created"
        );
    }

    #[tokio::test]
    async fn settle_timeout_marks_report_unsettled() {
        let runner = ScriptedRunner {
            changing_frames: true,
            ..ScriptedRunner::fresh()
        };
        let opts = ProbeOptions {
            session: "vimsmoke-ferret".to_string(),
            wait: WaitMode::Poll(SettleConfig {
                poll_interval: Duration::from_millis(1),
                stable_after: 99,
                max_wait: Duration::from_millis(10),
            }),
            kill_on_success: false,
        };
        let report = run_probe(&runner, &script(), &opts)
            .await
            .expect("timeout still yields a capture");
        assert!(!report.settled);
        assert_eq!(report.captured, BUFFER_TEXT);
    }

    #[tokio::test]
    async fn fixed_delay_skips_readiness_polling() {
        let runner = ScriptedRunner::fresh();
        let opts = ProbeOptions {
            session: "vimsmoke-ferret".to_string(),
            wait: WaitMode::Fixed(Duration::from_millis(1)),
            kill_on_success: false,
        };
        let report = run_probe(&runner, &script(), &opts)
            .await
            .expect("probe should succeed");

        let polls = runner
            .calls()
            .iter()
            .filter(|c| c[0] == "capture-pane" && c.iter().any(|a| a == "-p"))
            .count();
        assert_eq!(polls, 0);
        assert!(report.settled);
    }

    #[tokio::test]
    async fn kill_on_success_records_cleanup() {
        let runner = ScriptedRunner::fresh();
        let opts = ProbeOptions {
            kill_on_success: true,
            ..poll_opts("vimsmoke-ferret")
        };
        let report = run_probe(&runner, &script(), &opts)
            .await
            .expect("probe should succeed");

        assert_eq!(runner.commands().last().map(String::as_str), Some("kill-session"));
        assert_eq!(report.steps.last().map(|s| s.step), Some(Step::Cleanup));
    }
}
