// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Input Observer: debounced change detection for text inputs.
//!
//! A [`ChangeObserver`] remembers the last value of a field and reports a
//! change only when the value actually differs and has then stayed put for a
//! configured delay. It is a pure debounce: every new change restarts the
//! delay.
//!
//! Two [`Trigger`] strategies decide when values are compared:
//!
//! - [`OnInput`]: the host forwards every value-changing input event via
//!   [`ChangeObserver::on_input`].
//! - [`Periodic`]: the observer samples the field itself on a fixed period
//!   whenever it is ticked, for hosts that cannot observe input events.
//!
//! The crate never reads a clock. Time is a caller-supplied millisecond
//! timestamp, and the host drives deadlines with [`ChangeObserver::tick`],
//! using [`ChangeObserver::next_deadline`] to know when to wake up.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_input_observer::{ChangeObserver, ObserverOptions};
//!
//! let options = ObserverOptions { delay: 400, periodical: None };
//! let mut observer = ChangeObserver::new(String::new(), &options, 0);
//!
//! // Three keystrokes in quick succession…
//! observer.on_input("a".to_string(), 0);
//! observer.on_input("ab".to_string(), 20);
//! observer.on_input("abc".to_string(), 50);
//!
//! // …fire exactly once, after the input settles.
//! assert_eq!(observer.tick(100, String::new), None);
//! assert_eq!(observer.tick(450, String::new), Some("abc".to_string()));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod observer;
mod trigger;

pub use observer::{ChangeObserver, ObserverState};
pub use trigger::{ObserverOptions, OnInput, Periodic, Trigger};
