// SPDX-License-Identifier: MIT OR Apache-2.0

//! A parent unit of work that starts three children on their own threads.
//!
//! Every line the children write carries their own `logId` and the parent's id as
//! `parentLogId`, so the output can be regrouped into a tree afterwards.
//!
//! Run with `cargo run --example lineage`.

use ctxlog::context::Context;
use ctxlog::{Attr, HandlerOptions, Level};
use std::thread;
use std::time::Duration;

fn main() {
    ctxlog::set_text_handler(
        std::io::stdout(),
        HandlerOptions {
            level: Some(Level::Debug),
            ..HandlerOptions::default()
        },
    );

    let (ctx, logger) = ctxlog::bind(&Context::background());
    logger.info("parent started", &[]);

    let workers: Vec<_> = (1..=3)
        .map(|n| {
            let ctx = ctx.clone();
            thread::spawn(move || {
                let (_child_ctx, child) = ctxlog::bind_child(&ctx);
                child.info("child started", &[Attr::int("worker", n)]);
                thread::sleep(Duration::from_millis(10 * n as u64));
                child.debug("child working", &[Attr::int("worker", n)]);
                child.info("child finished", &[Attr::int("worker", n)]);
            })
        })
        .collect();

    for worker in workers {
        if worker.join().is_err() {
            logger.error("child panicked", &[]);
        }
    }
    logger.info("parent finished", &[]);
}
