//! Output utilities for CLI commands
//!
//! Terminal helpers shared by the commands: a spinner with elapsed time
//! for network calls and consistent styling of workspace states.

pub mod colors;
pub mod spinner;

pub use colors::{state_color, state_style};
pub use spinner::CommandSpinner;
