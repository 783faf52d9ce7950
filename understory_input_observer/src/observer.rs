// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The debouncing change observer.

use alloc::boxed::Box;

use crate::{ObserverOptions, Trigger};

/// Lifecycle state of a [`ChangeObserver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserverState {
    /// Comparing values and firing debounced changes.
    Active,
    /// Listening suspended; the last value is retained.
    Paused,
    /// Torn down. Nothing fires again.
    Detached,
}

/// Watches a field value and reports debounced changes.
///
/// The observer never reads a clock: every time-dependent call takes `now` in
/// milliseconds, and the host calls [`ChangeObserver::tick`] to let debounce
/// deadlines (and polling samples) elapse. A change is only reported once the
/// value has stayed put for the configured delay; every new change restarts
/// the delay, so a burst of edits yields a single report carrying the settled
/// value.
///
/// Values are compared with `PartialEq`, which for composite types is
/// structural equality.
#[derive(Debug)]
pub struct ChangeObserver<V> {
    last_value: V,
    delay: u64,
    /// At most one pending fire.
    deadline: Option<u64>,
    trigger: Box<dyn Trigger>,
    state: ObserverState,
}

impl<V: Clone + PartialEq> ChangeObserver<V> {
    /// Creates an active observer seeded with the field's current value.
    #[must_use]
    pub fn new(initial: V, options: &ObserverOptions, now: u64) -> Self {
        Self::with_trigger(initial, options.delay, options.trigger(), now)
    }

    /// Creates an active observer with an explicit trigger strategy.
    #[must_use]
    pub fn with_trigger(initial: V, delay: u64, mut trigger: Box<dyn Trigger>, now: u64) -> Self {
        trigger.arm(now);
        Self {
            last_value: initial,
            delay,
            deadline: None,
            trigger,
            state: ObserverState::Active,
        }
    }

    /// Returns the last observed value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.last_value
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ObserverState {
        self.state
    }

    /// Returns the debounce interval in milliseconds.
    #[must_use]
    pub const fn delay(&self) -> u64 {
        self.delay
    }

    /// Returns `true` while a debounced change is waiting to fire.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Records a value-changing input event.
    ///
    /// Ignored unless the observer is active and its trigger compares on input.
    pub fn on_input(&mut self, value: V, now: u64) {
        if self.state != ObserverState::Active || !self.trigger.accepts_input() {
            return;
        }
        self.changed(value, now);
    }

    /// Advances time to `now`.
    ///
    /// If the trigger polls and a sample is due, `read` is called once to fetch
    /// the current field value. Returns the settled value when the pending
    /// debounce deadline has passed.
    pub fn tick(&mut self, now: u64, read: impl FnOnce() -> V) -> Option<V> {
        if self.state != ObserverState::Active {
            return None;
        }
        if self.trigger.sample_due(now) {
            self.changed(read(), now);
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                tracing::trace!(now, "observer fired");
                Some(self.last_value.clone())
            }
            _ => None,
        }
    }

    /// Earliest time the host should call [`ChangeObserver::tick`].
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        if self.state != ObserverState::Active {
            return None;
        }
        match (self.deadline, self.trigger.next_sample()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Suspends observation, cancelling any pending fire.
    pub fn pause(&mut self) {
        if self.state == ObserverState::Active {
            self.state = ObserverState::Paused;
            self.deadline = None;
            self.trigger.disarm();
        }
    }

    /// Resumes observation, adopting `current` as the last value.
    ///
    /// Has no effect unless paused.
    pub fn resume(&mut self, current: V, now: u64) {
        if self.state == ObserverState::Paused {
            self.last_value = current;
            self.trigger.arm(now);
            self.state = ObserverState::Active;
        }
    }

    /// Overwrites the last value without firing, cancelling any pending fire.
    ///
    /// Used when the owner writes the field itself, so its own write is not
    /// mistaken for an edit.
    pub fn set_value(&mut self, value: V) {
        if self.state == ObserverState::Detached {
            return;
        }
        self.last_value = value;
        self.deadline = None;
    }

    /// Cancels any pending fire.
    pub fn clear(&mut self) {
        self.deadline = None;
    }

    /// Tears the observer down permanently.
    pub fn detach(&mut self) {
        self.state = ObserverState::Detached;
        self.deadline = None;
        self.trigger.disarm();
    }

    fn changed(&mut self, value: V, now: u64) {
        if value == self.last_value {
            return;
        }
        self.last_value = value;
        self.deadline = Some(now.saturating_add(self.delay));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OnInput, Periodic};
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    fn observer(delay: u64) -> ChangeObserver<String> {
        ChangeObserver::with_trigger(String::new(), delay, Box::new(OnInput), 0)
    }

    fn unreachable_read() -> String {
        panic!("event-driven observer must not sample")
    }

    #[test]
    fn burst_of_edits_fires_once_with_settled_value() {
        let mut obs = observer(400);
        obs.on_input("a".to_string(), 0);
        obs.on_input("ab".to_string(), 20);
        obs.on_input("abc".to_string(), 50);

        assert_eq!(obs.tick(300, unreachable_read), None);
        assert_eq!(obs.tick(449, unreachable_read), None);
        assert_eq!(obs.tick(450, unreachable_read), Some("abc".to_string()));
        assert_eq!(obs.tick(2_000, unreachable_read), None);
    }

    #[test]
    fn unchanged_value_does_not_schedule() {
        let mut obs = observer(100);
        obs.on_input("x".to_string(), 0);
        assert_eq!(obs.tick(100, unreachable_read), Some("x".to_string()));

        obs.on_input("x".to_string(), 150);
        assert!(!obs.is_pending());
        assert_eq!(obs.tick(1_000, unreachable_read), None);
    }

    #[test]
    fn each_edit_restarts_the_delay() {
        let mut obs = observer(100);
        obs.on_input("a".to_string(), 0);
        obs.on_input("ab".to_string(), 90);
        assert_eq!(obs.tick(150, unreachable_read), None);
        assert_eq!(obs.next_deadline(), Some(190));
        assert_eq!(obs.tick(190, unreachable_read), Some("ab".to_string()));
    }

    #[test]
    fn set_value_suppresses_pending_fire() {
        let mut obs = observer(100);
        obs.on_input("ab".to_string(), 0);
        obs.set_value("abacus".to_string());
        assert_eq!(obs.value(), "abacus");
        assert_eq!(obs.tick(500, unreachable_read), None);

        // Re-typing the value the owner wrote is not a change.
        obs.on_input("abacus".to_string(), 600);
        assert!(!obs.is_pending());
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut obs = observer(100);
        obs.on_input("a".to_string(), 0);
        obs.pause();
        obs.pause();
        assert_eq!(obs.state(), ObserverState::Paused);
        assert!(!obs.is_pending(), "pause cancels the pending fire");

        obs.on_input("ab".to_string(), 10);
        assert_eq!(obs.tick(1_000, unreachable_read), None);

        obs.resume("abc".to_string(), 1_000);
        obs.resume("zzz".to_string(), 1_001);
        assert_eq!(obs.value(), "abc");
        obs.on_input("abc".to_string(), 1_010);
        assert!(!obs.is_pending());
    }

    #[test]
    fn detach_silences_everything() {
        let mut obs = observer(10);
        obs.on_input("a".to_string(), 0);
        obs.detach();
        obs.on_input("ab".to_string(), 5);
        obs.resume("abc".to_string(), 6);
        assert_eq!(obs.state(), ObserverState::Detached);
        assert_eq!(obs.tick(1_000, unreachable_read), None);
        assert_eq!(obs.next_deadline(), None);
    }

    #[test]
    fn polling_samples_the_field() {
        let mut obs: ChangeObserver<String> =
            ChangeObserver::with_trigger(String::new(), 50, Box::new(Periodic::new(100)), 0);
        // Input events are ignored in polling mode.
        obs.on_input("ignored".to_string(), 10);
        assert!(!obs.is_pending());

        let mut field = "r".to_string();
        assert_eq!(obs.tick(100, || field.clone()), None);
        assert_eq!(obs.next_deadline(), Some(150));

        field.push('e');
        // Sample at 200 sees "re" and restarts the debounce.
        assert_eq!(obs.tick(200, || field.clone()), None);
        assert_eq!(obs.tick(250, || field.clone()), Some("re".to_string()));
    }

    #[test]
    fn structural_equality_for_composite_values() {
        let mut obs: ChangeObserver<Vec<u32>> =
            ChangeObserver::with_trigger(vec![1, 2], 10, Box::new(OnInput), 0);
        obs.on_input(vec![1, 2], 1);
        assert!(!obs.is_pending());
        obs.on_input(vec![1, 2, 3], 2);
        assert_eq!(obs.tick(12, Vec::new), Some(vec![1, 2, 3]));
    }
}
