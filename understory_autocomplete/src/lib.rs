// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Autocomplete: a headless autocomplete session engine.
//!
//! This crate implements the state and decisions behind an autocompleting
//! text input, independent of any UI toolkit:
//!
//! - [`extract_query`]: finds the active query in a single- or multi-value
//!   field, given the caret.
//! - [`compile_query_matcher`] and [`filter_tokens`]: the only place regular
//!   expressions are built from user text, with prefix or subset matching.
//! - [`CandidateCache`]: decides whether the last result set can answer a new
//!   query without fetching again.
//! - [`Autocompleter`]: the controller. It debounces edits with an
//!   [`understory_input_observer::ChangeObserver`], drives a [`ChoiceList`]
//!   from keyboard and pointer input, scrolls an overflowing list, and writes
//!   the chosen value back into a [`TextField`].
//! - [`commit`](commit()), [`splice`], [`normalize`]: pure functions rewriting
//!   field text and selection when a choice is committed.
//! - [`Signals`]: typed listeners for show, hide, select, selection, confirm,
//!   focus, blur, and empty-result events.
//!
//! Host frameworks are responsible for:
//!
//! - Forwarding edits, keys, pointer hover and clicks, and focus changes.
//! - Calling [`Autocompleter::tick`] by [`Autocompleter::next_deadline`].
//! - Rendering the entries pushed into their [`ChoiceList`].
//! - Fetching candidates through a [`Fetcher`], either synchronously or by
//!   handing results back with [`Autocompleter::deliver`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_autocomplete::{
//!     Autocompleter, FixedRowList, Key, KeyOutcome, LocalSource, MatchOptions, Options,
//!     TextBuffer, TextField,
//! };
//!
//! let source = LocalSource::new(["apple", "apricot", "banana"], MatchOptions::default());
//! let list = FixedRowList::new(20.0, 200.0);
//! let mut ac = Autocompleter::new(TextBuffer::default(), source, list, Options::default(), 0)
//!     .unwrap();
//!
//! // The user types "ap"; the query runs once the default 400ms delay elapses.
//! ac.input("ap", 2, 0);
//! ac.tick(400);
//! assert_eq!(ac.list().values(), ["apple", "apricot"]);
//!
//! // Highlight the first choice and confirm it.
//! assert_eq!(ac.on_key(Key::Down, false), KeyOutcome::Consumed);
//! assert_eq!(ac.on_key(Key::Enter, false), KeyOutcome::Committed { submit: false });
//! assert_eq!(ac.field().text(), "apple");
//! ```
//!
//! Offsets into field text are byte offsets and always fall on char
//! boundaries. Time is a caller-supplied millisecond timestamp.

mod autocompleter;
mod cache;
mod choices;
mod commit;
mod error;
mod events;
mod fetch;
mod field;
mod filter;
mod matcher;
mod options;
mod overflow;
mod query;
mod session;
mod token;
mod util;

pub use autocompleter::{Autocompleter, ChoiceMatchFn, Key, KeyOutcome, ListState};
pub use cache::{CacheEntry, CachePolicy, CandidateCache};
pub use choices::{ChoiceList, FixedRowList};
pub use commit::{CommitOptions, Committed, auto_trim, commit, normalize, splice};
pub use error::{Error, Result};
pub use events::{Event, EventKinds, Signals, SubscriptionId};
pub use fetch::{Delivery, FetchReply, FetchRequest, FetchTicket, Fetcher, LocalSource};
pub use field::{TextBuffer, TextField};
pub use filter::{FilterFn, filter_tokens};
pub use matcher::{MatchOptions, Matcher, compile_query_matcher};
pub use options::{Options, SelectMode};
pub use overflow::scroll_into_view;
pub use query::{Query, QueryMode, Separator, extract_query};
pub use session::Session;
pub use token::{ChoiceEntry, MarkedText, Token};
