//! Environment checks for `vimsmoke preflight`.

use std::process::Command;

struct CheckResult {
    passed: bool,
    label: String,
}

impl CheckResult {
    fn pass(label: impl Into<String>) -> Self {
        Self { passed: true, label: label.into() }
    }

    fn fail(label: impl Into<String>) -> Self {
        Self { passed: false, label: label.into() }
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "[{}] {}", tag, self.label)
    }
}

fn check_tmux() -> CheckResult {
    match Command::new("tmux").arg("-V").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            CheckResult::pass(format!("tmux found ({version})"))
        }
        Ok(_) => CheckResult::fail("tmux -V failed"),
        Err(_) => CheckResult::fail("tmux is not installed or not in PATH"),
    }
}

fn check_editor(editor: &str) -> CheckResult {
    match Command::new(editor).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let banner = String::from_utf8_lossy(&output.stdout);
            let first_line = banner.lines().next().unwrap_or(editor).to_string();
            CheckResult::pass(format!("editor found ({first_line})"))
        }
        Ok(_) => CheckResult::fail(format!("{editor} --version failed")),
        Err(_) => CheckResult::fail(format!("{editor} not found in PATH")),
    }
}

fn check_plugin(plugin: &str) -> CheckResult {
    if std::path::Path::new(plugin).is_file() {
        CheckResult::pass(format!("plugin file present: {plugin}"))
    } else {
        CheckResult::fail(format!(
            "plugin file not found: {plugin} (run from the plugin repo root, or pass --plugin)"
        ))
    }
}

pub fn run_preflight(editor: &str, plugin: &str) -> i32 {
    let results = [check_tmux(), check_editor(editor), check_plugin(plugin)];

    let mut any_fail = false;
    for r in &results {
        println!("{r}");
        if !r.passed {
            any_fail = true;
        }
    }

    if any_fail { 1 } else { 0 }
}
