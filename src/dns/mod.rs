//! DNS analysis core
//!
//! Pure analysis modules: each takes text in and hands a formatted report
//! back, with no network or filesystem access of its own.

/// Zone file parsing, validation, and statistics
pub mod zone_analyzer;

/// Server configuration scanning for five dialects
pub mod config_validator;

/// Configuration and zone file template generation
pub mod config_generator;

/// Diagnostic check runner over an injected probe source
pub mod debugger;

/// Built-in reference topics
pub mod knowledge;

/// Error types shared across the crate
pub mod errors;
