// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asynchronous fetching with out-of-order replies.
//!
//! The fetcher only queues requests. A simulated backend answers each one
//! after a latency that shrinks with the query length, so the reply for an
//! older, shorter query arrives after the reply for the newer one and is
//! discarded as stale.
//!
//! Run:
//! - `RUST_LOG=understory_autocomplete=debug cargo run -p understory_demos --example autocomplete_async`

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use understory_autocomplete::{
    Autocompleter, Delivery, FetchReply, FetchRequest, FetchTicket, FixedRowList, Options,
    TextBuffer, Token,
};

const CITIES: &[&str] = &[
    "Berlin", "Bern", "Bergen", "Bordeaux", "Boston", "Brasilia", "Bremen", "Brno",
];

fn backend(query: &str) -> Vec<Token> {
    let query = query.to_lowercase();
    CITIES
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&query))
        .map(|c| Token::new(c.to_lowercase()).with_display(*c))
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let queue: Rc<RefCell<Vec<(u64, FetchTicket)>>> = Rc::default();
    let sink = queue.clone();
    let clock = Rc::new(RefCell::new(0_u64));
    let request_clock = clock.clone();
    let fetcher = move |req: &FetchRequest| {
        let latency = 900_u64.saturating_sub(200 * req.query().len() as u64);
        let due = *request_clock.borrow() + latency;
        println!("request {:?} due at {due}ms", req.query());
        sink.borrow_mut().push((due, req.ticket.clone()));
        FetchReply::Pending
    };

    let options = Options {
        delay: 100,
        ..Options::default()
    };
    let mut ac = Autocompleter::new(
        TextBuffer::default(),
        fetcher,
        FixedRowList::new(18.0, 160.0),
        options,
        0,
    )
    .expect("demo autocompleter builds");

    let edits = [(0, "b"), (150, "br")];
    let mut edits = edits.iter().peekable();
    for now in (0..=1200).step_by(50) {
        *clock.borrow_mut() = now;
        while let Some(&&(at, text)) = edits.peek() {
            if at > now {
                break;
            }
            ac.input(text, text.len(), now);
            edits.next();
        }
        ac.tick(now);

        let due: Vec<FetchTicket> = {
            let mut queue = queue.borrow_mut();
            let (ready, waiting): (Vec<_>, Vec<_>) =
                queue.drain(..).partition(|(at, _)| *at <= now);
            *queue = waiting;
            ready.into_iter().map(|(_, ticket)| ticket).collect()
        };
        for ticket in due {
            let query = ticket.query().to_owned();
            match ac.deliver(ticket, backend(&query)) {
                Delivery::Applied => {
                    let labels: Vec<&str> =
                        ac.list().entries().iter().map(|e| e.label.text.as_str()).collect();
                    println!("{now}ms: reply for {query:?} applied: {labels:?}");
                }
                Delivery::Stale => println!("{now}ms: reply for {query:?} was stale"),
            }
        }
    }
    ac.cleanup();
}
