//! Pane capture and copy-buffer access.

use crate::error::TmuxError;
use crate::executor::TmuxCommandRunner;

/// Snapshot the visible pane into the tmux copy buffer.
pub fn capture_pane(runner: &impl TmuxCommandRunner, name: &str) -> Result<(), TmuxError> {
    runner.run(&["capture-pane", "-t", name])?;
    Ok(())
}

/// Capture the visible pane directly as lines, bypassing the copy
/// buffer. Used by readiness polling so the buffer stays untouched until
/// the final capture.
pub fn capture_pane_lines(
    runner: &impl TmuxCommandRunner,
    name: &str,
) -> Result<Vec<String>, TmuxError> {
    let output = runner.run(&["capture-pane", "-p", "-t", name])?;
    Ok(output.lines().map(String::from).collect())
}

/// Read the most recent copy buffer verbatim, trailing newline included.
pub fn show_buffer(runner: &impl TmuxCommandRunner) -> Result<String, TmuxError> {
    runner.run(&["show-buffer"])
}

/// Drop the most recent copy buffer.
pub fn delete_buffer(runner: &impl TmuxCommandRunner) -> Result<(), TmuxError> {
    runner.run(&["delete-buffer"])?;
    Ok(())
}
