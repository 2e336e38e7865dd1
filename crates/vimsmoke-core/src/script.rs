//! Probe script model: everything the driver types into the session.

use std::path::Path;

/// Default editor launch line. `-u NONE` skips all user configuration so
/// the probe exercises exactly one plugin on a bare Vim.
pub const DEFAULT_EDITOR_CMD: &str = "vim -u NONE";

/// A probe script: the editor launch line, the ordered `:` startup
/// commands, and the keystroke batch delivered once the editor is ready.
///
/// Keystrokes are raw `send-keys` arguments — literal text or symbolic
/// key names (`Space`, `Enter`, `Escape`) pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeScript {
    pub editor_cmd: String,
    pub startup_cmds: Vec<String>,
    pub keystrokes: Vec<String>,
}

impl ProbeScript {
    /// Build the standard plugin probe: compatibility mode off, the
    /// plugin root on the runtime path, the plugin sourced via
    /// `:runtime!`.
    pub fn for_plugin(plugin: &str, rtp_dir: &str) -> Self {
        Self {
            editor_cmd: DEFAULT_EDITOR_CMD.to_string(),
            startup_cmds: vec![
                ":set nocompatible".to_string(),
                format!(":set rtp+={rtp_dir}"),
                format!(":runtime! {plugin}"),
            ],
            keystrokes: default_keystrokes(),
        }
    }

    #[must_use]
    pub fn with_editor_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.editor_cmd = cmd.into();
        self
    }

    #[must_use]
    pub fn with_keystrokes(mut self, keys: Vec<String>) -> Self {
        self.keystrokes = keys;
        self
    }

    /// Total `send-keys` deliveries this script issues: the launch line,
    /// each startup command, and one keystroke batch.
    pub fn delivery_count(&self) -> usize {
        1 + self.startup_cmds.len() + 1
    }
}

/// Default keystroke batch: the leader-key mapping under test followed by
/// a two-word search pattern. `\a` is the stock Ferret `:Ack` mapping.
fn default_keystrokes() -> Vec<String> {
    ["\\", "a", "usr/bin/env", "Space", "ruby", "Enter"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Deterministic session name for a plugin file: `vimsmoke-<stem>`.
pub fn session_name_for(plugin: &str) -> String {
    let stem = Path::new(plugin)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("plugin");
    format!("vimsmoke-{}", sanitize(stem))
}

/// Per-run unique session name. The caller supplies pid and a nanosecond
/// timestamp so this stays deterministic under test.
pub fn unique_session_name(base: &str, pid: u32, nanos: u128) -> String {
    format!("{base}-{pid}-{nanos}")
}

/// tmux target syntax treats `.` and `:` as separators, so session names
/// keep only ASCII alphanumerics, `-` and `_`.
fn sanitize(value: &str) -> String {
    let mapped: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = mapped.trim_matches('-');
    if trimmed.is_empty() {
        "plugin".to_string()
    } else {
        trimmed.to_string()
    }
}
