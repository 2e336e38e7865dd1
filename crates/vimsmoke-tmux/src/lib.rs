//! vimsmoke-tmux: tmux backend IO boundary.
//! Subprocess execution, session lifecycle, keystroke delivery, and pane
//! capture. No probe logic — pure IO boundary.

pub mod capture;
pub mod error;
pub mod executor;
pub mod session;

pub use capture::{capture_pane, capture_pane_lines, delete_buffer, show_buffer};
pub use error::TmuxError;
pub use executor::{TmuxCommandRunner, TmuxExecutor};
pub use session::{has_session, kill_session, new_session, send_keys, send_line};
