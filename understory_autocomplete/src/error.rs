// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for autocompleter configuration.

use thiserror::Error;

/// Result type alias for autocompleter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring an autocompleter.
///
/// All of these are configuration errors reported at construction. Problems
/// with fetched data are never errors; they are treated as "no candidates".
#[derive(Debug, Error)]
pub enum Error {
    /// The multi-value separator pattern does not compile.
    #[error("invalid separator pattern {pattern:?}: {source}")]
    InvalidSeparator {
        /// The offending pattern.
        pattern: String,
        /// The regex compilation error.
        source: regex::Error,
    },

    /// The multi-value separator pattern matches the empty string.
    #[error("separator pattern {pattern:?} matches the empty string")]
    EmptySeparatorMatch {
        /// The offending pattern.
        pattern: String,
    },

    /// An option holds a value outside its valid range.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A query matcher could not be built.
    #[error("query matcher error: {0}")]
    Matcher(#[from] regex::Error),

    /// Options could not be parsed from JSON.
    #[error("options parsing error: {0}")]
    Options(#[from] serde_json::Error),
}
