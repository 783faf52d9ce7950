// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger strategies: when does the observer compare the field value?

use alloc::boxed::Box;
use core::fmt::Debug;

use serde::Deserialize;

/// Decides when an observed field is compared against its last value.
///
/// The event-driven strategy ([`OnInput`]) compares on every input event the
/// host forwards. The polling strategy ([`Periodic`]) ignores input events and
/// samples the field on a fixed period while the observer is ticked.
pub trait Trigger: Debug {
    /// Returns `true` if input events should be compared as they arrive.
    fn accepts_input(&self) -> bool;

    /// Arms the trigger at `now`. Called on construction and when resuming.
    fn arm(&mut self, now: u64);

    /// Disarms the trigger; no samples are due until the next [`Trigger::arm`].
    fn disarm(&mut self);

    /// Returns `true` if the field should be sampled at `now`, advancing the schedule.
    fn sample_due(&mut self, now: u64) -> bool;

    /// Earliest time at which a sample is due, if any.
    fn next_sample(&self) -> Option<u64>;
}

/// Compare on every forwarded input event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OnInput;

impl Trigger for OnInput {
    fn accepts_input(&self) -> bool {
        true
    }

    fn arm(&mut self, _now: u64) {}

    fn disarm(&mut self) {}

    fn sample_due(&mut self, _now: u64) -> bool {
        false
    }

    fn next_sample(&self) -> Option<u64> {
        None
    }
}

/// Sample the field every `period` milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Periodic {
    period: u64,
    next: Option<u64>,
}

impl Periodic {
    /// Creates a disarmed polling trigger. A zero period is treated as one millisecond.
    #[must_use]
    pub const fn new(period: u64) -> Self {
        Self {
            period: if period == 0 { 1 } else { period },
            next: None,
        }
    }

    /// Returns the sampling period in milliseconds.
    #[must_use]
    pub const fn period(&self) -> u64 {
        self.period
    }
}

impl Trigger for Periodic {
    fn accepts_input(&self) -> bool {
        false
    }

    fn arm(&mut self, now: u64) {
        self.next = Some(now.saturating_add(self.period));
    }

    fn disarm(&mut self) {
        self.next = None;
    }

    fn sample_due(&mut self, now: u64) -> bool {
        match self.next {
            Some(due) if now >= due => {
                // Missed periods collapse into a single sample.
                let missed = (now - due) / self.period;
                self.next = Some(due.saturating_add((missed + 1).saturating_mul(self.period)));
                true
            }
            _ => false,
        }
    }

    fn next_sample(&self) -> Option<u64> {
        self.next
    }
}

/// Observer configuration.
///
/// Deserializes from `{"delay": 400, "periodical": 250}`; missing fields take
/// their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObserverOptions {
    /// Debounce interval in milliseconds.
    pub delay: u64,
    /// Polling period in milliseconds. `None` selects the event-driven trigger.
    pub periodical: Option<u64>,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            delay: 400,
            periodical: None,
        }
    }
}

impl ObserverOptions {
    /// Builds the trigger strategy selected by these options.
    #[must_use]
    pub fn trigger(&self) -> Box<dyn Trigger> {
        match self.periodical {
            Some(period) => Box::new(Periodic::new(period)),
            None => Box::new(OnInput),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_samples_on_schedule() {
        let mut trigger = Periodic::new(100);
        assert!(!trigger.sample_due(1_000), "disarmed trigger must not sample");

        trigger.arm(1_000);
        assert_eq!(trigger.next_sample(), Some(1_100));
        assert!(!trigger.sample_due(1_099));
        assert!(trigger.sample_due(1_100));
        assert_eq!(trigger.next_sample(), Some(1_200));
    }

    #[test]
    fn periodic_collapses_missed_periods() {
        let mut trigger = Periodic::new(100);
        trigger.arm(0);
        // Three periods elapsed: one sample, next aligned to the schedule.
        assert!(trigger.sample_due(350));
        assert_eq!(trigger.next_sample(), Some(400));
        assert!(!trigger.sample_due(399));
    }

    #[test]
    fn options_select_trigger() {
        let event = ObserverOptions::default().trigger();
        assert!(event.accepts_input());

        let polling = ObserverOptions {
            delay: 0,
            periodical: Some(50),
        }
        .trigger();
        assert!(!polling.accepts_input());
    }
}
