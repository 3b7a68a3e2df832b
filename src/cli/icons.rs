//! Console output icons.

use console::{style, StyledObject};

/// Success checkmark icon (green ✓).
pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

/// Info arrow icon (cyan →).
pub fn info() -> StyledObject<&'static str> {
    style("→").cyan()
}

/// Warning icon (yellow !).
pub fn warn() -> StyledObject<&'static str> {
    style("!").yellow()
}

/// Error icon (red ✗).
pub fn error() -> StyledObject<&'static str> {
    style("✗").red()
}

pub fn bullet() -> StyledObject<&'static str> {
    style("•").dim()
}

/// Prompt shown before each chat input line.
pub fn chat_prompt() -> StyledObject<&'static str> {
    style("you>").bold().cyan()
}
