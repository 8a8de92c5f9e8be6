//! Utility functions for display formatting.

pub mod format;

pub use format::{contains_ignore_case, format_age, format_price, truncate_string};
