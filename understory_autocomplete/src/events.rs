// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed signals emitted by the autocompleter.
//!
//! Hosts register a listener for a set of [`EventKinds`] and receive every
//! matching [`Event`] synchronously, in emission order. Registration returns a
//! [`SubscriptionId`] that can later be passed to [`Signals::unsubscribe`].

use smallvec::SmallVec;

bitflags::bitflags! {
    /// Event kinds a listener can subscribe to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventKinds: u16 {
        /// The choice list became visible.
        const SHOW           = 0b0000_0001;
        /// The choice list was hidden.
        const HIDE           = 0b0000_0010;
        /// The highlighted choice changed.
        const SELECT         = 0b0000_0100;
        /// A value was written into the field.
        const SELECTION      = 0b0000_1000;
        /// A choice was confirmed by the user.
        const CHOICE_CONFIRM = 0b0001_0000;
        /// The field gained focus.
        const FOCUS          = 0b0010_0000;
        /// The field lost focus.
        const BLUR           = 0b0100_0000;
        /// A result set produced no candidates.
        const EMPTY          = 0b1000_0000;
    }
}

/// A signal emitted by the autocompleter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The choice list became visible.
    Show,
    /// The choice list was hidden.
    Hide,
    /// The highlighted choice changed.
    Select {
        /// Index of the highlighted entry.
        index: usize,
        /// Token value of the highlighted entry.
        value: String,
        /// `true` for keyboard (or type-ahead) highlighting, `false` for pointer hover.
        selection: bool,
    },
    /// A value was written into the field.
    Selection {
        /// The full field text after the write.
        text: String,
        /// The token that was committed.
        token: String,
    },
    /// A choice was confirmed (Enter, Tab or click).
    ChoiceConfirm {
        /// Index of the confirmed entry.
        index: usize,
        /// Token value of the confirmed entry.
        value: String,
    },
    /// The field gained focus.
    Focus,
    /// The field lost focus.
    Blur,
    /// A result set produced no candidates for `query`.
    Empty {
        /// The query that matched nothing.
        query: String,
    },
}

impl Event {
    /// Returns the kind flag for this event.
    #[must_use]
    pub const fn kind(&self) -> EventKinds {
        match self {
            Self::Show => EventKinds::SHOW,
            Self::Hide => EventKinds::HIDE,
            Self::Select { .. } => EventKinds::SELECT,
            Self::Selection { .. } => EventKinds::SELECTION,
            Self::ChoiceConfirm { .. } => EventKinds::CHOICE_CONFIRM,
            Self::Focus => EventKinds::FOCUS,
            Self::Blur => EventKinds::BLUR,
            Self::Empty { .. } => EventKinds::EMPTY,
        }
    }
}

/// Handle returned by [`Signals::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Listener {
    id: SubscriptionId,
    kinds: EventKinds,
    callback: Box<dyn FnMut(&Event)>,
}

/// Listener registry.
#[derive(Default)]
pub struct Signals {
    next_id: u64,
    listeners: SmallVec<[Listener; 4]>,
}

impl core::fmt::Debug for Signals {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signals")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Signals {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for events whose kind intersects `kinds`.
    pub fn subscribe(
        &mut self,
        kinds: EventKinds,
        callback: impl FnMut(&Event) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            kinds,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Delivers `event` to every interested listener.
    pub fn emit(&mut self, event: &Event) {
        let kind = event.kind();
        for listener in &mut self.listeners {
            if listener.kinds.intersects(kind) {
                (listener.callback)(event);
            }
        }
    }

    /// Removes every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_receive_only_their_kinds() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signals = Signals::new();
        let sink = seen.clone();
        signals.subscribe(EventKinds::SHOW | EventKinds::HIDE, move |e| {
            sink.borrow_mut().push(e.clone());
        });

        signals.emit(&Event::Show);
        signals.emit(&Event::Focus);
        signals.emit(&Event::Hide);
        assert_eq!(*seen.borrow(), [Event::Show, Event::Hide]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut signals = Signals::new();
        let sink = count.clone();
        let id = signals.subscribe(EventKinds::all(), move |_| *sink.borrow_mut() += 1);

        signals.emit(&Event::Blur);
        assert!(signals.unsubscribe(id));
        assert!(!signals.unsubscribe(id));
        signals.emit(&Event::Blur);
        assert_eq!(*count.borrow(), 1);
        assert!(signals.is_empty());
    }
}
