// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-value autocompletion over a local token set.
//!
//! A simulated user types into a tag field, navigates the choice list with the
//! keyboard, and confirms two tags. The clock is simulated: the host advances
//! time by calling `tick` at the deadlines the engine reports.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example autocomplete_local`

use tracing_subscriber::EnvFilter;
use understory_autocomplete::{
    Autocompleter, ChoiceList, Event, EventKinds, FixedRowList, Key, LocalSource, MatchOptions,
    Options, TextBuffer, TextField,
};

const COLORS: &[&str] = &[
    "amber", "azure", "beige", "black", "blue", "bronze", "brown", "crimson", "cyan", "gold",
    "gray", "green", "grey", "indigo", "ivory", "lime", "magenta", "maroon", "navy", "olive",
];

fn print_list(list: &FixedRowList) {
    for (i, entry) in list.entries().iter().enumerate() {
        let (before, marked, after) = entry.label.parts();
        let cursor = if list.highlighted() == Some(i) { ">" } else { " " };
        println!("  {cursor} {before}[{marked}]{after}");
    }
}

/// Types `text` one char at a time, 60ms apart, then lets the debounce settle.
fn type_text(
    ac: &mut Autocompleter<TextBuffer, LocalSource, FixedRowList>,
    text: &str,
    now: &mut u64,
) {
    for ch in text.chars() {
        let mut value = ac.field().text().to_owned();
        value.push(ch);
        let caret = value.len();
        ac.input(&value, caret, *now);
        *now += 60;
    }
    while let Some(deadline) = ac.next_deadline() {
        *now = (*now).max(deadline);
        ac.tick(*now);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = Options::from_json(
        r#"{ "multiple": true, "maxChoices": 4, "overflow": true, "overflowMargin": 0, "delay": 250 }"#,
    )
    .expect("demo options are valid");
    let source = LocalSource::new(COLORS.iter().copied(), MatchOptions::default());
    let list = FixedRowList::new(18.0, 160.0);
    let mut ac = Autocompleter::new(TextBuffer::default(), source, list, options, 0)
        .expect("demo autocompleter builds");

    ac.subscribe(EventKinds::SELECTION | EventKinds::EMPTY, |event| match event {
        Event::Selection { text, token } => println!("committed {token:?}; field is now {text:?}"),
        Event::Empty { query } => println!("nothing matches {query:?}"),
        _ => {}
    });

    let mut now = 0;
    ac.focus();

    type_text(&mut ac, "b", &mut now);
    println!("choices for \"b\" (scroll offset {}):", ac.list().scroll_offset());
    print_list(ac.list());

    for _ in 0..5 {
        ac.on_key(Key::Down, false);
    }
    println!(
        "after five Down presses (scroll offset {}):",
        ac.list().scroll_offset()
    );
    print_list(ac.list());
    ac.on_key(Key::Enter, false);

    type_text(&mut ac, "gre", &mut now);
    println!("choices for \"gre\":");
    print_list(ac.list());
    ac.on_key(Key::Down, false);
    ac.on_key(Key::Down, false);
    ac.on_key(Key::Enter, false);

    type_text(&mut ac, "xyz", &mut now);
    ac.blur();

    println!("final field text: {:?}", ac.field().text());
    ac.cleanup();
}
