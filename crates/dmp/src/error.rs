//! Fallible domain types for the delta, patch-text, and configuration-ceiling
//! surfaces. `match_main`'s "no match" and `apply`'s per-patch `applied[i]`
//! entries are ordinary values, not errors — see the module docs on
//! [`crate::match_`] and [`crate::patch`].

use thiserror::Error;

/// Failures from [`crate::diff::from_delta`] parsing a malformed delta string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeltaError {
    #[error("unknown delta token prefix {0:?}")]
    InvalidTokenPrefix(char),
    #[error("invalid delta count {0:?}")]
    InvalidCount(String),
    #[error("invalid percent-encoding in delta insert token {0:?}")]
    InvalidEncoding(String),
    #[error("delta count overruns source text by {0} characters")]
    Overrun(usize),
    #[error("delta leaves {0} characters of source text unconsumed")]
    Unconsumed(usize),
}

/// Failures from [`crate::patch::from_text`] parsing a malformed patch string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchTextError {
    #[error("invalid patch header line {0:?}")]
    InvalidHeader(String),
    #[error("invalid patch line prefix in {0:?}")]
    InvalidLine(String),
    #[error("invalid percent-encoding in patch body {0:?}")]
    InvalidEncoding(String),
}

/// Unrecoverable configuration-ceiling failures: these are programmer
/// errors, not recoverable input faults.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("line-mode diff has {found} distinct lines, exceeding the {limit} ceiling")]
    TooManyUniqueLines { limit: usize, found: usize },
    #[error("pattern length {0} exceeds match_max_bits ({1})")]
    PatternTooLong(usize, u32),
}
