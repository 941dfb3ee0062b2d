//! Utility functions for common operations.
//!
//! - **Relative age**: data-driven "45s" / "2.1m" / "1.4w" labels
//! - **Text processing**: Unicode-aware truncation and control-char stripping
//!   for titles and summaries supplied by remote servers
//! - **Link validation**: only http(s) links reach the system opener

mod age;
mod links;
mod text;

pub use age::format_age;
pub use links::{validate_link, LinkError};
pub use text::{collapse_whitespace, display_width, strip_control_chars, truncate_to_width};
