// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-field session state.

use crate::{CandidateCache, FetchTicket, Query};

/// State of one bound field, created at bind time and dropped at teardown.
#[derive(Clone, Debug, Default)]
pub struct Session {
    /// `None` until a query long enough to act on has been computed.
    pub(crate) query: Option<Query>,
    pub(crate) selected_value: Option<String>,
    pub(crate) visible: bool,
    pub(crate) opted: String,
    pub(crate) baseline: String,
    pub(crate) cache: CandidateCache,
    pub(crate) pending: Option<FetchTicket>,
    next_seq: u64,
}

impl Session {
    pub(crate) fn new(opted: String) -> Self {
        Self {
            baseline: opted.clone(),
            opted,
            ..Self::default()
        }
    }

    /// The active query, if any.
    #[must_use]
    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Value of the choice last highlighted by keyboard.
    #[must_use]
    pub fn selected_value(&self) -> Option<&str> {
        self.selected_value.as_deref()
    }

    /// Whether the choice list is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// The value last committed by the engine.
    ///
    /// `force_select` reverts the field to this text when the list closes.
    #[must_use]
    pub fn opted(&self) -> &str {
        &self.opted
    }

    /// The field text when the active query was computed, or as the engine
    /// last wrote it.
    ///
    /// Confirming a choice with Enter requires the field to still hold this text.
    #[must_use]
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// The candidate cache.
    #[must_use]
    pub fn cache(&self) -> &CandidateCache {
        &self.cache
    }

    /// The outstanding asynchronous fetch, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&FetchTicket> {
        self.pending.as_ref()
    }

    pub(crate) fn issue_ticket(&mut self, query: String) -> FetchTicket {
        let ticket = FetchTicket::new(self.next_seq, query);
        self.next_seq += 1;
        ticket
    }

    /// `true` if `ticket` is the outstanding fetch and still answers the active query.
    pub(crate) fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.pending.as_ref() == Some(ticket)
            && self
                .query
                .as_ref()
                .is_some_and(|q| q.value == ticket.query())
    }
}
