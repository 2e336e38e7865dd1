//! vimsmoke-core: probe model and decision logic.
//! What gets typed into the session, when the pane counts as settled, and
//! what the structured result looks like. No subprocess IO, no async —
//! the tmux boundary lives in vimsmoke-tmux, orchestration in the
//! vimsmoke binary.

pub mod report;
pub mod script;
pub mod settle;

pub use report::{ProbeReport, Step, StepTiming};
pub use script::{DEFAULT_EDITOR_CMD, ProbeScript, session_name_for, unique_session_name};
pub use settle::{SettleConfig, SettleStatus, SettleTracker};
