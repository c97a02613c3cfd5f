//! Enumerations for TUI state management.

/// Screen state for the terminal user interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    TaskList,
    EditTask,
}

/// Which widget keyboard input is routed to on the main screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Input,
    List,
}
