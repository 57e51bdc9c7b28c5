// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-scoped attributes written as JSON.
//!
//! A `requestId` descriptor is registered once on the default provider. Each simulated
//! request stores its id in the context, and every line logged with that context picks it
//! up, including lines from code that only received the context.
//!
//! Run with `cargo run --example request_id`.

use ctxlog::context::Context;
use ctxlog::{Attr, ContextAttr, HandlerOptions, Value};

struct RequestIdKey;
struct UserKey;

fn handle_request(ctx: &Context, path: &str) {
    let (ctx, logger) = ctxlog::bind(ctx);
    logger.info("start request", &[Attr::string("path", path)]);
    load_user(&ctx);
    logger.info("end request", &[Attr::int("code", 200)]);
}

fn load_user(ctx: &Context) {
    // no logger handed down, the context is enough
    ctxlog::info_context(ctx, "loading user", &[]);
    let (_ctx, logger) = ctxlog::bind_child(ctx);
    logger.debug("cache miss", &[]);
    logger.info("user loaded", &[]);
}

fn main() {
    ctxlog::set_json_handler(std::io::stdout(), HandlerOptions::default());
    ctxlog::add_context_attrs([
        ContextAttr::from_context::<RequestIdKey, String>("requestId"),
        // only the user's initial is logged; anonymous requests log nothing
        ContextAttr::from_context::<UserKey, String>("user").with_formatter(|key, value| {
            let Some(Value::String(name)) = value else {
                return None;
            };
            let initial = name.chars().next()?;
            Some(Attr::string(key, format!("{}.", initial)))
        }),
    ]);

    for (n, user) in [(1, Some("ada")), (2, None)] {
        let mut ctx = Context::background().with_value::<RequestIdKey>(format!("req-{n}"));
        if let Some(user) = user {
            ctx = ctx.with_value::<UserKey>(user.to_string());
        }
        handle_request(&ctx, "/profile");
    }
}
