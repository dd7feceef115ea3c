//! User-facing input and output surfaces.
//!
//! - [`input`]: Enter-to-submit binding and auto-growing text area
//! - [`terminal`]: results region that prints to the terminal

pub mod input;
pub mod terminal;

pub use input::{auto_resize, handle_key, key_action, KeyAction, TextSurface};
pub use terminal::TerminalView;

use is_terminal::IsTerminal;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}
