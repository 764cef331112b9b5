//! StylistGuild Library
//!
//! Core functionality behind the `stylistguild` binary: catalog models and
//! persistence, official/addon synchronization, contributor workflows,
//! GitHub lookups and rendering of the theme documentation pages.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod doctor;
pub mod git;
pub mod github;
pub mod lint;
pub mod models;
pub mod parser;
pub mod render;
pub mod services;
pub mod validator;
