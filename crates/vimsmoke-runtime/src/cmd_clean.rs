//! `vimsmoke clean` — kill a leftover probe session.

use vimsmoke_tmux::{TmuxCommandRunner, has_session, kill_session};

pub fn cmd_clean(runner: &impl TmuxCommandRunner, session: &str) -> i32 {
    match has_session(runner, session) {
        Ok(false) => {
            println!("no session named {session}");
            0
        }
        Ok(true) => match kill_session(runner, session) {
            Ok(()) => {
                println!("killed {session}");
                0
            }
            Err(e) => {
                eprintln!("vimsmoke: failed to kill {session}: {e}");
                1
            }
        },
        Err(e) => {
            eprintln!("vimsmoke: {e}");
            2
        }
    }
}
