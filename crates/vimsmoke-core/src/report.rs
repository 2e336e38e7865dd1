//! Structured probe result: per-step timings plus the captured text.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One step of the probe sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CreateSession,
    LaunchEditor,
    Configure,
    SendKeys,
    Settle,
    Capture,
    Cleanup,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateSession => "create_session",
            Self::LaunchEditor => "launch_editor",
            Self::Configure => "configure",
            Self::SendKeys => "send_keys",
            Self::Settle => "settle",
            Self::Capture => "capture",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall time one step took.
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub step: Step,
    pub elapsed_ms: u64,
}

/// The full probe result. `captured` is the verbatim copy-buffer text;
/// `settled` is false when any stabilization poll ran out of budget.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub session: String,
    pub started_at: DateTime<Utc>,
    pub steps: Vec<StepTiming>,
    pub settled: bool,
    pub captured: String,
}

impl ProbeReport {
    pub fn new(session: String, started_at: DateTime<Utc>) -> Self {
        Self {
            session,
            started_at,
            steps: Vec::new(),
            settled: true,
            captured: String::new(),
        }
    }

    pub fn record(&mut self, step: Step, elapsed: Duration) {
        self.steps.push(StepTiming {
            step,
            elapsed_ms: elapsed.as_millis() as u64,
        });
    }
}
