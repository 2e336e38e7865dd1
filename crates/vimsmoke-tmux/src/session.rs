//! Session lifecycle and keystroke delivery.

use crate::error::TmuxError;
use crate::executor::TmuxCommandRunner;

/// Check whether a session with this name exists.
///
/// `has-session` exits non-zero for an unknown name, so a command failure
/// maps to `Ok(false)`; only transport-level errors propagate.
pub fn has_session(runner: &impl TmuxCommandRunner, name: &str) -> Result<bool, TmuxError> {
    match runner.run(&["has-session", "-t", name]) {
        Ok(_) => Ok(true),
        Err(TmuxError::CommandFailed(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create a detached session, refusing to reuse an existing name.
pub fn new_session(runner: &impl TmuxCommandRunner, name: &str) -> Result<(), TmuxError> {
    if has_session(runner, name)? {
        return Err(TmuxError::SessionExists(name.to_string()));
    }
    runner.run(&["new-session", "-d", "-s", name])?;
    Ok(())
}

pub fn kill_session(runner: &impl TmuxCommandRunner, name: &str) -> Result<(), TmuxError> {
    runner.run(&["kill-session", "-t", name])?;
    Ok(())
}

/// Deliver raw `send-keys` arguments to the session's active pane.
/// Symbolic key names (`Enter`, `Space`, `Escape`) pass through to tmux.
pub fn send_keys(runner: &impl TmuxCommandRunner, name: &str, keys: &[&str]) -> Result<(), TmuxError> {
    let mut args = vec!["send-keys", "-t", name];
    args.extend_from_slice(keys);
    runner.run(&args)?;
    Ok(())
}

/// Type a literal line and press Enter.
pub fn send_line(runner: &impl TmuxCommandRunner, name: &str, text: &str) -> Result<(), TmuxError> {
    send_keys(runner, name, &[text, "Enter"])
}
