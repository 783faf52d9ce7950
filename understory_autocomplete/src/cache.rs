// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The candidate cache and its reuse policy.

use crate::Token;

/// Tokens returned by the most recent applied fetch, with the query that produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    /// The query the fetch was issued for.
    pub query: String,
    /// The unfiltered result set.
    pub tokens: Vec<Token>,
}

/// Inputs to the reuse decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    /// Whether reuse is allowed at all (`cache` option).
    pub enabled: bool,
    /// Result sets of this size or larger may be truncated and are never reused.
    pub max_choices: usize,
    /// Compare query prefixes case-sensitively (`filterCase`).
    pub case_sensitive: bool,
}

/// Holds at most one [`CacheEntry`], replaced wholesale on every applied fetch.
#[derive(Clone, Debug, Default)]
pub struct CandidateCache {
    entry: Option<CacheEntry>,
}

impl CandidateCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the current entry.
    #[must_use]
    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    /// Replaces the entry with a fresh fetch result.
    pub fn replace(&mut self, query: String, tokens: Vec<Token>) {
        self.entry = Some(CacheEntry { query, tokens });
    }

    /// Drops the entry.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Returns the cached tokens if they can answer `query` without a fetch.
    ///
    /// The entry must be non-empty, smaller than `max_choices` (so it is known
    /// to be complete), and built from a query that `query` continues. An entry
    /// built from the empty query is complete for every query; an entry built
    /// from a narrower or diverging query may be missing matches.
    #[must_use]
    pub fn lookup(&self, query: &str, policy: CachePolicy) -> Option<&[Token]> {
        if !policy.enabled {
            return None;
        }
        let entry = self.entry.as_ref()?;
        if entry.tokens.is_empty() || entry.tokens.len() >= policy.max_choices {
            return None;
        }
        let continues = if policy.case_sensitive {
            query.starts_with(entry.query.as_str())
        } else {
            query
                .to_lowercase()
                .starts_with(entry.query.to_lowercase().as_str())
        };
        continues.then_some(entry.tokens.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: CachePolicy = CachePolicy {
        enabled: true,
        max_choices: 10,
        case_sensitive: false,
    };

    fn cache_with(query: &str, n: usize) -> CandidateCache {
        let mut cache = CandidateCache::new();
        let tokens = (0..n).map(|i| Token::new(format!("{query}{i}"))).collect();
        cache.replace(query.to_string(), tokens);
        cache
    }

    #[test]
    fn continuation_of_small_result_is_served() {
        let cache = cache_with("ap", 3);
        assert!(cache.lookup("apr", POLICY).is_some());
        assert!(cache.lookup("AP", POLICY).is_some());
        assert!(cache.lookup("ap", POLICY).is_some());
    }

    #[test]
    fn broader_or_diverging_query_is_not_served() {
        let cache = cache_with("ap", 3);
        assert!(cache.lookup("a", POLICY).is_none());
        assert!(cache.lookup("b", POLICY).is_none());
    }

    #[test]
    fn empty_query_entry_serves_everything() {
        let cache = cache_with("", 5);
        assert!(cache.lookup("zzz", POLICY).is_some());
    }

    #[test]
    fn possibly_truncated_or_empty_entries_are_not_served() {
        assert!(cache_with("ap", 10).lookup("apr", POLICY).is_none());
        assert!(cache_with("ap", 0).lookup("apr", POLICY).is_none());
        assert!(CandidateCache::new().lookup("apr", POLICY).is_none());
    }

    #[test]
    fn disabled_or_case_sensitive_policies() {
        let cache = cache_with("ap", 3);
        let disabled = CachePolicy {
            enabled: false,
            ..POLICY
        };
        assert!(cache.lookup("apr", disabled).is_none());

        let exact = CachePolicy {
            case_sensitive: true,
            ..POLICY
        };
        assert!(cache.lookup("APR", exact).is_none());
        assert!(cache.lookup("apr", exact).is_some());
    }
}
