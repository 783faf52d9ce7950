// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fetch boundary: how candidate sets reach the engine.
//!
//! The engine decides *when* a fetch is warranted and hands the host a
//! [`FetchRequest`]. The host answers either synchronously with
//! [`FetchReply::Ready`] or later through
//! [`Autocompleter::deliver`](crate::Autocompleter::deliver), passing back the
//! request's [`FetchTicket`]. Results whose ticket no longer matches the
//! current query are discarded.

use crate::filter::filter_tokens;
use crate::{MatchOptions, Token, compile_query_matcher};

/// Tag identifying one dispatched fetch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    seq: u64,
    query: String,
}

impl FetchTicket {
    pub(crate) fn new(seq: u64, query: String) -> Self {
        Self { seq, query }
    }

    /// Dispatch sequence number, increasing per session.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// The query that triggered the fetch.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn into_query(self) -> String {
        self.query
    }
}

/// A request for the candidate set matching a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// Ticket to hand back with an asynchronous result.
    pub ticket: FetchTicket,
}

impl FetchRequest {
    /// The query to fetch candidates for.
    #[must_use]
    pub fn query(&self) -> &str {
        self.ticket.query()
    }
}

/// A fetcher's answer to a [`FetchRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchReply {
    /// Candidates are available now.
    Ready(Vec<Token>),
    /// The host will call [`Autocompleter::deliver`](crate::Autocompleter::deliver) later.
    Pending,
}

/// Outcome of delivering a fetch result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The result matched the current query and was applied.
    Applied,
    /// The result was superseded by a newer query (or the engine was torn down) and dropped.
    Stale,
}

/// Supplies candidate sets for queries.
///
/// Closures of the form `FnMut(&FetchRequest) -> FetchReply` implement this
/// trait.
pub trait Fetcher {
    /// Starts (or completes) a fetch for `request`.
    fn fetch(&mut self, request: &FetchRequest) -> FetchReply;
}

impl<F> Fetcher for F
where
    F: FnMut(&FetchRequest) -> FetchReply,
{
    fn fetch(&mut self, request: &FetchRequest) -> FetchReply {
        self(request)
    }
}

/// A fetcher answering from a fixed in-memory token set.
#[derive(Clone, Debug, Default)]
pub struct LocalSource {
    tokens: Vec<Token>,
    options: MatchOptions,
}

impl LocalSource {
    /// Creates a source over `tokens`, matched with `options`.
    pub fn new<T: Into<Token>>(tokens: impl IntoIterator<Item = T>, options: MatchOptions) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            options,
        }
    }

    /// Returns every token in the source.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Replaces the token set.
    pub fn set_tokens<T: Into<Token>>(&mut self, tokens: impl IntoIterator<Item = T>) {
        self.tokens = tokens.into_iter().map(Into::into).collect();
    }
}

impl Fetcher for LocalSource {
    fn fetch(&mut self, request: &FetchRequest) -> FetchReply {
        match compile_query_matcher(request.query(), self.options) {
            Ok(matcher) => FetchReply::Ready(filter_tokens(&self.tokens, &matcher)),
            Err(err) => {
                tracing::warn!(error = %err, query = request.query(), "local source could not match query");
                FetchReply::Ready(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: &str) -> FetchRequest {
        FetchRequest {
            ticket: FetchTicket::new(0, query.to_string()),
        }
    }

    #[test]
    fn local_source_answers_synchronously() {
        let mut source = LocalSource::new(["apple", "Apricot", "banana"], MatchOptions::default());
        let FetchReply::Ready(tokens) = source.fetch(&request("ap")) else {
            panic!("local source must answer immediately");
        };
        assert_eq!(tokens, [Token::new("apple"), Token::new("Apricot")]);
    }

    #[test]
    fn closures_are_fetchers() {
        let mut seen = Vec::new();
        let mut fetcher = |req: &FetchRequest| {
            seen.push(req.query().to_string());
            FetchReply::Pending
        };
        assert_eq!(fetcher.fetch(&request("x")), FetchReply::Pending);
        assert_eq!(seen, ["x"]);
    }
}
