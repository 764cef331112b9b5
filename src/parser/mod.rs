//! Parsing and generation of the Markdown the site generator consumes.
//!
//! This module handles page frontmatter and the curated categories tables.

pub mod categories;
pub mod frontmatter;

// Re-export commonly used functions
pub use categories::{generate_categories, parse_categories, CategoryRow};
pub use frontmatter::{generate_frontmatter, parse_page_frontmatter, split_frontmatter};
