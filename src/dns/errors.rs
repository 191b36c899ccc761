//! Error types for advisor operations with context information

use std::error::Error;
use std::fmt;
use std::io;

/// Advisor operation error with detailed context
#[derive(Debug)]
pub enum AdvisorError {
    /// File and stream I/O errors
    Io(io::Error),
    /// Probe lookup failures (nodata, nxdomain, refused)
    Probe(ProbeError),
    /// Generic operational error
    Operation(OperationError),
}

#[derive(Debug)]
pub struct ProbeError {
    pub domain: String,
    pub query: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct OperationError {
    pub context: String,
    pub details: String,
}

impl fmt::Display for AdvisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisorError::Io(e) => write!(f, "I/O error: {}", e),
            AdvisorError::Probe(e) => {
                write!(f, "{} lookup for {} failed: {}", e.query, e.domain, e.reason)
            }
            AdvisorError::Operation(e) => {
                write!(f, "Operation failed: {} - {}", e.context, e.details)
            }
        }
    }
}

impl Error for AdvisorError {}

impl From<io::Error> for AdvisorError {
    fn from(err: io::Error) -> Self {
        AdvisorError::Io(err)
    }
}

impl AdvisorError {
    /// Shorthand for a probe failure on a specific query type
    pub fn probe(domain: &str, query: &str, reason: &str) -> Self {
        AdvisorError::Probe(ProbeError {
            domain: domain.to_string(),
            query: query.to_string(),
            reason: reason.to_string(),
        })
    }

    pub fn operation(context: &str, details: &str) -> Self {
        AdvisorError::Operation(OperationError {
            context: context.to_string(),
            details: details.to_string(),
        })
    }
}

/// Result type alias for advisor operations
pub type DnsResult<T> = Result<T, AdvisorError>;
