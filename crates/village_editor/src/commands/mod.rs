//! Undo history and keyboard shortcuts

mod history;
mod shortcuts;

pub use history::UndoHistory;
pub use shortcuts::handle_keyboard_shortcuts;
