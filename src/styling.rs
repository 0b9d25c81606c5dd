//! Styling for terminal output.
//!
//! # Styling with color-print
//!
//! Use `cformat!` with HTML-like tags for user-facing messages:
//!
//! ```rust,ignore
//! use color_print::cformat;
//!
//! cformat!("<green>Wrote <bold>{path}</></>")
//!
//! // Semantic mapping:
//! // - Errors: <red>...</>
//! // - Warnings: <yellow>...</>
//! // - Hints: <dim>...</>
//! // - Success: <green>...</>
//! ```
//!
//! Printing goes through `anstream`, which strips escapes when stderr is not a
//! terminal or `NO_COLOR` is set.

use color_print::cformat;

/// Auto-detecting eprintln that respects NO_COLOR, CLICOLOR_FORCE, and terminal capabilities
pub use anstream::eprintln;

// ============================================================================
// Message Emojis
// ============================================================================

/// Success emoji: `cformat!("{SUCCESS_EMOJI} <green>message</>")`
pub const SUCCESS_EMOJI: &str = "✅";

/// Error emoji: `cformat!("{ERROR_EMOJI} <red>message</>")`
pub const ERROR_EMOJI: &str = "❌";

/// Warning emoji: `cformat!("{WARNING_EMOJI} <yellow>message</>")`
pub const WARNING_EMOJI: &str = "🟡";

/// Hint emoji: `cformat!("{HINT_EMOJI} <dim>message</>")`
pub const HINT_EMOJI: &str = "💡";

// ============================================================================
// Message Formatting Functions
// ============================================================================
//
// Canonical formatting for each message type. Used by the reports and by the
// fatal error path in main.rs.

/// Format an error message with emoji and red styling
pub fn error_message(content: impl AsRef<str>) -> String {
    cformat!("{ERROR_EMOJI} <red>{}</>", content.as_ref())
}

/// Format a hint message with emoji and dim styling
pub fn hint_message(content: impl AsRef<str>) -> String {
    cformat!("{HINT_EMOJI} <dim>{}</>", content.as_ref())
}

/// Format a warning message with emoji and yellow styling
pub fn warning_message(content: impl AsRef<str>) -> String {
    cformat!("{WARNING_EMOJI} <yellow>{}</>", content.as_ref())
}

/// Format a success message with emoji and green styling
pub fn success_message(content: impl AsRef<str>) -> String {
    cformat!("{SUCCESS_EMOJI} <green>{}</>", content.as_ref())
}

/// Print a warning to stderr.
pub fn warn(content: impl AsRef<str>) {
    eprintln!("{}", warning_message(content));
}

/// Print a success line to stderr.
pub fn success(content: impl AsRef<str>) {
    eprintln!("{}", success_message(content));
}

/// Print a hint to stderr.
pub fn hint(content: impl AsRef<str>) {
    eprintln!("{}", hint_message(content));
}
