// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The autocomplete controller.
//!
//! An [`Autocompleter`] binds three collaborators:
//!
//! - a [`TextField`] holding the text and selection being completed,
//! - a [`Fetcher`] supplying candidate tokens for a query,
//! - a [`ChoiceList`] presenting the choices.
//!
//! The host forwards user input to it ([`Autocompleter::input`],
//! [`Autocompleter::on_key`], pointer and focus calls) and drives time with
//! [`Autocompleter::tick`]. Edits are debounced by a
//! [`ChangeObserver`]; when one settles, the active query is extracted,
//! candidates come from the cache or a fetch, are filtered, and the list is
//! shown. Choosing a choice rewrites the field and closes the list.
//!
//! ## Choice list states
//!
//! | State | Entered by |
//! | --- | --- |
//! | `Closed` | Escape, Tab, blur, [`Autocompleter::hide`], a commit, an empty result, a query below `min_length` |
//! | `Open { highlighted: None }` | a non-empty result set |
//! | `Open { highlighted: Some(i) }` | Up/Down, pointer hover, or auto-highlight on open |
//!
//! Up/Down first re-check the field. If that changes anything (a new query, or
//! a hidden list re-shown) the key does not also move the highlight.

use core::fmt;

use tracing::{debug, trace, warn};
use understory_input_observer::ChangeObserver;

use crate::commit::{auto_trim, commit};
use crate::overflow::scroll_into_view;
use crate::{
    ChoiceEntry, ChoiceList, Delivery, Event, EventKinds, FetchReply, FetchRequest, FetchTicket,
    Fetcher, FilterFn, MarkedText, Options, Query, QueryMode, Result, Session, Signals,
    SubscriptionId, TextField, Token, compile_query_matcher, extract_query, filter_tokens,
};

/// Predicate deciding which choices keyboard navigation may land on.
pub type ChoiceMatchFn = Box<dyn Fn(&Token) -> bool>;

/// Keys the autocompleter reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move the highlight up.
    Up,
    /// Move the highlight down.
    Down,
    /// Confirm the highlighted choice.
    Enter,
    /// Confirm the highlighted choice, or close the list.
    Tab,
    /// Close the list.
    Escape,
}

/// What the host should do with a key after the autocompleter saw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not handled; run the default action.
    Ignored,
    /// Handled; suppress the default action.
    Consumed,
    /// A choice was committed. `submit` asks the host to submit its form.
    Committed {
        /// Whether the enclosing form should be submitted.
        submit: bool,
    },
}

/// Observable state of the choice list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListState {
    /// The list is hidden.
    Closed,
    /// The list is shown.
    Open {
        /// The highlighted entry, if any.
        highlighted: Option<usize>,
    },
}

/// Autocomplete engine for one text field.
///
/// See the [module documentation](self) for the overall flow.
pub struct Autocompleter<F, S, L> {
    field: F,
    fetcher: S,
    list: L,
    options: Options,
    mode: QueryMode,
    observer: ChangeObserver<String>,
    session: Session,
    highlighted: Option<usize>,
    overflown: bool,
    focused: bool,
    torn_down: bool,
    signals: Signals,
    filter: Option<FilterFn>,
    choices_match: Option<ChoiceMatchFn>,
}

impl<F: fmt::Debug, S: fmt::Debug, L: fmt::Debug> fmt::Debug for Autocompleter<F, S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autocompleter")
            .field("field", &self.field)
            .field("fetcher", &self.fetcher)
            .field("list", &self.list)
            .field("options", &self.options)
            .field("mode", &self.mode)
            .field("observer", &self.observer)
            .field("session", &self.session)
            .field("highlighted", &self.highlighted)
            .field("overflown", &self.overflown)
            .field("focused", &self.focused)
            .field("torn_down", &self.torn_down)
            .field("signals", &self.signals)
            .field("filter", &self.filter.is_some())
            .field("choices_match", &self.choices_match.is_some())
            .finish()
    }
}

/// Builds the navigation eligibility test from an optional predicate.
fn eligibility(pred: Option<&ChoiceMatchFn>) -> impl Fn(&Token) -> bool + '_ {
    move |token: &Token| pred.is_none_or(|p| p(token))
}

impl<F: TextField, S: Fetcher, L: ChoiceList> Autocompleter<F, S, L> {
    /// Binds an autocompleter to `field`.
    ///
    /// Fails if `options` are out of range or the separator pattern is invalid.
    pub fn new(field: F, fetcher: S, mut list: L, options: Options, now: u64) -> Result<Self> {
        options.validate()?;
        let mode = options.query_mode()?;
        let current = field.text().to_owned();
        let observer = ChangeObserver::new(current.clone(), &options.observer_options(), now);
        list.clear();
        list.set_visible(false);
        debug!(multiple = options.multiple, delay = options.delay, "autocompleter bound");
        Ok(Self {
            field,
            fetcher,
            list,
            options,
            mode,
            observer,
            session: Session::new(current),
            highlighted: None,
            overflown: false,
            focused: false,
            torn_down: false,
            signals: Signals::new(),
            filter: None,
            choices_match: None,
        })
    }

    /// Replaces the default regex filter.
    ///
    /// The function receives the candidate set and the active query and
    /// returns the tokens to show, in order.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Fn(&[Token], &str) -> Vec<Token> + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Restricts which choices keyboard navigation and auto-highlighting may select.
    #[must_use]
    pub fn with_choices_match(mut self, pred: impl Fn(&Token) -> bool + 'static) -> Self {
        self.choices_match = Some(Box::new(pred));
        self
    }

    /// The bound field.
    #[must_use]
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Mutable access to the bound field, for hosts that edit it directly (polling mode).
    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    /// The fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &S {
        &self.fetcher
    }

    /// Mutable access to the fetcher.
    pub fn fetcher_mut(&mut self) -> &mut S {
        &mut self.fetcher
    }

    /// The choice list.
    #[must_use]
    pub fn list(&self) -> &L {
        &self.list
    }

    /// The options the autocompleter was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Session state.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The active query, if any.
    #[must_use]
    pub fn query(&self) -> Option<&Query> {
        self.session.query.as_ref()
    }

    /// Current state of the choice list.
    #[must_use]
    pub fn list_state(&self) -> ListState {
        if self.session.visible {
            ListState::Open {
                highlighted: self.highlighted,
            }
        } else {
            ListState::Closed
        }
    }

    /// Whether the field has focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether [`Autocompleter::cleanup`] has run.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Registers a listener for events of the given kinds.
    pub fn subscribe(
        &mut self,
        kinds: EventKinds,
        callback: impl FnMut(&Event) + 'static,
    ) -> SubscriptionId {
        self.signals.subscribe(kinds, callback)
    }

    /// Removes a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.signals.unsubscribe(id)
    }

    /// Earliest time the host should call [`Autocompleter::tick`].
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.observer.next_deadline()
    }

    /// A user edit: the field now holds `text` with the caret at byte `caret`.
    pub fn input(&mut self, text: &str, caret: usize, now: u64) {
        if self.torn_down {
            return;
        }
        self.field.set_text(text);
        self.field.set_selection(caret..caret);
        self.observer.on_input(text.to_owned(), now);
    }

    /// Advances time. Runs the query pipeline when an edit has settled.
    pub fn tick(&mut self, now: u64) {
        if self.torn_down {
            return;
        }
        if let Some(value) = self.observer.tick(now, || self.field.text().to_owned()) {
            trace!(now, value = value.as_str(), "input settled");
            self.prefetch();
        }
    }

    /// Suspends change observation.
    pub fn pause(&mut self) {
        self.observer.pause();
    }

    /// Resumes change observation from the field's current text.
    pub fn resume(&mut self, now: u64) {
        if self.torn_down {
            return;
        }
        self.observer.resume(self.field.text().to_owned(), now);
    }

    /// Writes `text` into the field without triggering a query.
    pub fn set_text(&mut self, text: &str) {
        if self.torn_down {
            return;
        }
        self.write_field(text);
        self.session.opted = text.to_owned();
    }

    /// Re-runs the query pipeline immediately.
    ///
    /// Returns `false` if nothing changed: the list is already shown for the
    /// current query.
    pub fn refresh(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.prefetch()
    }

    /// Handles a key press.
    ///
    /// Shifted keys are ignored. Up and Down are consumed while the list is
    /// shown. Enter and Tab commit the highlighted choice as long as the field
    /// still holds the text the engine last saw; otherwise the key is left to
    /// the host. Escape closes the list.
    pub fn on_key(&mut self, key: Key, shift: bool) -> KeyOutcome {
        if self.torn_down || shift {
            return KeyOutcome::Ignored;
        }
        match key {
            Key::Up | Key::Down => {
                if !self.prefetch() && self.session.query.is_some() {
                    self.navigate(key == Key::Up);
                }
                if self.session.visible {
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Ignored
                }
            }
            Key::Enter => match self.confirmable() {
                Some(index) => {
                    self.choice_select(index);
                    KeyOutcome::Committed {
                        submit: self.options.auto_submit,
                    }
                }
                None => KeyOutcome::Ignored,
            },
            Key::Tab => {
                if let Some(index) = self.confirmable() {
                    self.choice_select(index);
                    return KeyOutcome::Committed { submit: false };
                }
                self.hide_choices(true);
                KeyOutcome::Ignored
            }
            Key::Escape => {
                let was_visible = self.session.visible;
                self.hide_choices(true);
                if was_visible {
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Ignored
                }
            }
        }
    }

    /// The pointer moved over entry `index`: highlight it without writing the field.
    pub fn pointer_over(&mut self, index: usize) {
        if self.torn_down || !self.session.visible {
            return;
        }
        self.choice_over(index, false);
    }

    /// Entry `index` was clicked: commit it. Returns `true` if a choice was committed.
    pub fn pointer_click(&mut self, index: usize) -> bool {
        if self.torn_down || !self.session.visible || index >= self.list.len() {
            return false;
        }
        self.choice_select(index);
        true
    }

    /// The field itself was clicked; re-checks the query under the new caret.
    pub fn field_click(&mut self) {
        if self.torn_down || !self.focused {
            return;
        }
        self.prefetch();
    }

    /// The field gained focus.
    pub fn focus(&mut self) {
        if self.torn_down {
            return;
        }
        self.focused = true;
        self.signals.emit(&Event::Focus);
    }

    /// The field lost focus. Closes the list, applying `force_select` and `auto_trim`.
    pub fn blur(&mut self) {
        if self.torn_down {
            return;
        }
        self.focused = false;
        self.hide_choices(true);
        self.signals.emit(&Event::Blur);
    }

    /// Closes the list on behalf of the host, applying `force_select` and `auto_trim`.
    pub fn hide(&mut self) {
        if self.torn_down {
            return;
        }
        self.hide_choices(true);
    }

    /// Hands in the result of an asynchronous fetch.
    ///
    /// The result is applied only if `ticket` is the outstanding fetch and its
    /// query is still the active query. A newer dispatch or closing the list
    /// with Escape, Tab, blur or [`Autocompleter::hide`] makes it stale, and
    /// [`Delivery::Stale`] is returned.
    pub fn deliver(&mut self, ticket: FetchTicket, tokens: Vec<Token>) -> Delivery {
        if self.torn_down || !self.session.is_current(&ticket) {
            debug!(
                seq = ticket.seq(),
                query = ticket.query(),
                "discarding stale fetch result"
            );
            return Delivery::Stale;
        }
        self.session.pending = None;
        self.apply_fetched(ticket.into_query(), tokens);
        Delivery::Applied
    }

    /// Tears the autocompleter down.
    ///
    /// Detaches the observer, drops every listener, hides and empties the
    /// list, and invalidates outstanding fetches. Every later call is a no-op.
    pub fn cleanup(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.observer.detach();
        self.signals.clear();
        self.list.clear();
        self.list.set_visible(false);
        self.highlighted = None;
        self.session = Session::default();
        debug!("autocompleter torn down");
    }

    /// Extracts the query and decides between re-showing, the cache, and a fetch.
    ///
    /// Returns `false` only when the list is already shown for this query.
    fn prefetch(&mut self) -> bool {
        let query = extract_query(self.field.text(), self.field.caret(), &self.mode);
        if query.char_len() < self.options.min_length {
            trace!(query = query.value.as_str(), "query below minimum length");
            self.session.query = None;
            self.session.pending = None;
            self.hide_choices(false);
            return true;
        }
        self.session.baseline = self.field.text().to_owned();
        let same_query = self
            .session
            .query
            .as_ref()
            .is_some_and(|q| q.value == query.value);
        let on_selected = self.session.visible
            && self.session.selected_value.as_deref() == Some(query.value.as_str());
        if on_selected || (same_query && self.session.visible) {
            return false;
        }
        if same_query {
            self.session.query = Some(query);
            self.show_choices();
        } else {
            debug!(query = query.value.as_str(), index = query.index, "query changed");
            self.session.query = Some(query);
            self.session.pending = None;
            if !self.fetch_cached() {
                self.dispatch_fetch();
            }
        }
        true
    }

    fn fetch_cached(&mut self) -> bool {
        let Some(query) = &self.session.query else {
            return false;
        };
        let Some(tokens) = self
            .session
            .cache
            .lookup(&query.value, self.options.cache_policy())
        else {
            return false;
        };
        debug!(
            query = query.value.as_str(),
            count = tokens.len(),
            "reusing cached candidates"
        );
        let tokens = tokens.to_vec();
        self.update(&tokens);
        true
    }

    fn dispatch_fetch(&mut self) {
        let Some(query) = self.session.query.as_ref().map(|q| q.value.clone()) else {
            return;
        };
        let ticket = self.session.issue_ticket(query);
        debug!(
            seq = ticket.seq(),
            query = ticket.query(),
            "dispatching fetch"
        );
        let request = FetchRequest { ticket };
        match self.fetcher.fetch(&request) {
            FetchReply::Ready(tokens) => {
                self.session.pending = None;
                self.apply_fetched(request.ticket.into_query(), tokens);
            }
            FetchReply::Pending => self.session.pending = Some(request.ticket),
        }
    }

    fn apply_fetched(&mut self, query: String, tokens: Vec<Token>) {
        if tokens.is_empty() {
            warn!(query = query.as_str(), "fetch returned no candidates");
        }
        self.update(&tokens);
        self.session.cache.replace(query, tokens);
    }

    /// Filters `tokens` by the active query and rebuilds the list.
    fn update(&mut self, tokens: &[Token]) {
        let Some(query) = self.session.query.clone() else {
            return;
        };
        let matcher = match compile_query_matcher(&query.value, self.options.match_options()) {
            Ok(matcher) => Some(matcher),
            Err(err) => {
                warn!(error = %err, query = query.value.as_str(), "query matcher failed");
                None
            }
        };
        let mut matched = match (&self.filter, &matcher) {
            (Some(filter), _) => filter(tokens, &query.value),
            (None, Some(matcher)) => filter_tokens(tokens, matcher),
            (None, None) => Vec::new(),
        };
        if !self.options.overflow {
            matched.truncate(self.options.max_choices);
        }
        self.list.clear();
        self.highlighted = None;
        for token in matched {
            let label = match (&matcher, self.options.mark_query) {
                (Some(matcher), true) => matcher.mark(token.label()),
                _ => MarkedText::plain(token.label()),
            };
            self.list.push(ChoiceEntry { token, label });
        }
        self.show_choices();
    }

    fn show_choices(&mut self) {
        self.session.selected_value = None;
        self.highlighted = None;
        self.list.set_highlighted(None);

        let (first, items) = {
            let eligible = eligibility(self.choices_match.as_ref());
            (
                self.list.first_eligible(&eligible),
                self.list.eligible_indices(&eligible),
            )
        };
        let Some(first) = first else {
            let query = self
                .session
                .query
                .as_ref()
                .map(|q| q.value.clone())
                .unwrap_or_default();
            debug!(query = query.as_str(), "no candidates");
            self.signals.emit(&Event::Empty { query });
            self.hide_choices(false);
            return;
        };

        if !self.session.visible {
            self.session.visible = true;
            self.list.set_visible(true);
            debug!(choices = self.list.len(), "showing choices");
            self.signals.emit(&Event::Show);
        }

        let max = self.options.max_choices;
        self.overflown = false;
        let mut viewport = None;
        if items.len() > max {
            if let Some(bounds) = items.get(max - 1).and_then(|&i| self.list.bounds(i)) {
                viewport = Some(bounds.y1);
                self.overflown = true;
            }
        }
        self.list.set_viewport_height(viewport);
        self.list.set_scroll_offset(0.0);

        let type_ahead = self.options.select_mode.is_type_ahead();
        let first_is_query = match (self.list.token(first), &self.session.query) {
            (Some(token), Some(query)) => token.value == query.value,
            _ => false,
        };
        if self.options.select_first || type_ahead || first_is_query {
            self.choice_over(first, type_ahead);
        }
    }

    fn navigate(&mut self, up: bool) {
        let target = {
            let eligible = eligibility(self.choices_match.as_ref());
            match (self.highlighted, up) {
                (Some(i), true) => self.list.previous_eligible(i, &eligible),
                (Some(i), false) => self.list.next_eligible(i, &eligible),
                (None, true) => self.list.last_eligible(&eligible),
                (None, false) => self.list.first_eligible(&eligible),
            }
        };
        if let Some(index) = target {
            self.choice_over(index, true);
        }
    }

    /// Highlights entry `index`.
    ///
    /// `selection` marks keyboard (or type-ahead) highlighting, which records
    /// the selected value, scrolls an overflowing list, and writes the field
    /// when a select mode is on.
    fn choice_over(&mut self, index: usize, selection: bool) {
        if self.highlighted == Some(index) {
            return;
        }
        let Some(value) = self.list.token(index).map(|t| t.value.clone()) else {
            return;
        };
        self.highlighted = Some(index);
        self.list.set_highlighted(Some(index));
        self.signals.emit(&Event::Select {
            index,
            value: value.clone(),
            selection,
        });
        if !selection {
            return;
        }
        self.session.selected_value = Some(value);
        if self.overflown {
            self.scroll_to(index);
        }
        if self.options.select_mode.is_enabled() {
            self.set_selection(false);
        }
    }

    fn scroll_to(&mut self, index: usize) {
        let (Some(item), Some(viewport)) = (self.list.bounds(index), self.list.viewport_height())
        else {
            return;
        };
        let content = self
            .list
            .len()
            .checked_sub(1)
            .and_then(|last| self.list.bounds(last))
            .map_or(item.y1, |last| last.y1);
        let offset = scroll_into_view(
            item,
            self.list.scroll_offset(),
            viewport,
            content,
            self.options.overflow_margin,
        );
        trace!(index, offset, "scrolling choices");
        self.list.set_scroll_offset(offset);
    }

    /// Writes the highlighted token into the field. `finish` commits it.
    fn set_selection(&mut self, finish: bool) {
        let (Some(index), Some(query)) = (self.highlighted, &self.session.query) else {
            return;
        };
        let Some(token) = self.list.token(index).map(|t| t.value.clone()) else {
            return;
        };
        let committed = commit(
            self.field.text(),
            query,
            &token,
            &self.mode,
            finish,
            self.options.commit_options(),
        );
        debug!(
            text = committed.text.as_str(),
            token = token.as_str(),
            finish,
            "writing choice"
        );
        self.write_field(&committed.text);
        self.field.set_selection(committed.selection);
        if finish {
            self.session.opted.clone_from(&committed.text);
        }
        self.signals.emit(&Event::Selection {
            text: committed.text,
            token,
        });
    }

    fn choice_select(&mut self, index: usize) {
        self.choice_over(index, false);
        self.set_selection(true);
        if let Some(value) = self.list.token(index).map(|t| t.value.clone()) {
            self.signals.emit(&Event::ChoiceConfirm { index, value });
        }
        self.session.query = None;
        self.session.pending = None;
        self.hide_choices(false);
    }

    /// The highlighted entry, if Enter or Tab may commit it now.
    fn confirmable(&self) -> Option<usize> {
        if !self.session.visible || self.field.text() != self.session.baseline {
            return None;
        }
        self.highlighted
    }

    /// Hides the list. With `clear`, an outstanding fetch is dropped and the
    /// field is settled: reverted to the last committed value under
    /// `force_select`, and stripped of empty tokens under `auto_trim`.
    fn hide_choices(&mut self, clear: bool) {
        if clear {
            if self.session.pending.take().is_some() {
                trace!("dropping outstanding fetch");
                self.session.query = None;
            }
            let mut value = if self.options.force_select {
                self.session.opted.clone()
            } else {
                self.field.text().to_owned()
            };
            if self.options.auto_trim {
                if let Some(sep) = self.mode.separator() {
                    value = auto_trim(&value, sep);
                }
            }
            if value == self.field.text() {
                self.observer.set_value(value);
            } else {
                debug!(text = value.as_str(), "settling field on close");
                self.write_field(&value);
                self.session.opted = value;
            }
        }
        if !self.session.visible {
            return;
        }
        self.session.visible = false;
        self.highlighted = None;
        self.list.set_highlighted(None);
        self.observer.clear();
        self.list.set_visible(false);
        debug!("hiding choices");
        self.signals.emit(&Event::Hide);
    }

    /// Writes `text` into the field through the observer, so the write is not
    /// seen as a user edit.
    fn write_field(&mut self, text: &str) {
        self.observer.set_value(text.to_owned());
        self.field.set_text(text);
        self.session.baseline = text.to_owned();
    }
}
