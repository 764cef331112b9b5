//! Environment validation.
//!
//! This module checks that the tools and files catalog maintenance relies
//! on are present and readable.

pub mod checker;
pub mod formatter;

// Re-export checker types
pub use checker::{CheckResult, CheckStatus, EnvironmentChecker};
pub use formatter::{DoctorFormatter, OutputFormat};
