//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod cell;
pub mod help_dialog;
pub mod layout;
pub mod table_view;

pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup, MainLayout};
pub use table_view::TableView;
