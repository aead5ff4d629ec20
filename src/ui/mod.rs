//! User interface module - terminal output for the inspection binary.
//!
//! Library code never prints; everything written to the terminal goes
//! through the [formatter] functions.

pub mod formatter;

pub use formatter::{
    display_changelog_summary, display_error, display_status, format_groups, format_release_line,
};
