// SPDX-License-Identifier: MIT OR Apache-2.0

use ctxlog::context::{Context, log_id, parent_log_id, with_child_log_context, with_log_context};
use ctxlog::{CountingIdGenerator, InMemoryHandler, Level, LoggerProvider, set_id_generator};
use std::sync::{Arc, Mutex};

static TEST_GUARD: Mutex<()> = Mutex::new(());

fn setup() -> (Arc<InMemoryHandler>, LoggerProvider) {
    set_id_generator(Arc::new(CountingIdGenerator::new()));
    let memory = Arc::new(InMemoryHandler::with_level(Level::Info));
    let provider = LoggerProvider::new(memory.clone());
    (memory, provider)
}

#[test]
fn test_bind_then_bind_child() {
    let _guard = TEST_GUARD.lock().unwrap();
    let (memory, provider) = setup();

    let (ctx, _) = provider.bind(&Context::background());
    assert_eq!(log_id(&ctx).to_string(), "0000000000000000");
    assert!(parent_log_id(&ctx).is_nil());

    let (child, logger) = provider.bind_child(&ctx);
    assert_eq!(log_id(&child).to_string(), "0000000000000001");
    assert_eq!(parent_log_id(&child).to_string(), "0000000000000000");

    logger.info("start", &[]);
    logger.info("end", &[]);
    assert_eq!(
        memory.drain_logs(),
        "level=INFO msg=start logId=0000000000000001 parentLogId=0000000000000000\n\
         level=INFO msg=end logId=0000000000000001 parentLogId=0000000000000000"
    );
}

#[test]
fn test_nested_children() {
    let _guard = TEST_GUARD.lock().unwrap();
    let (memory, provider) = setup();

    let (root, root_logger) = provider.bind(&Context::background());
    let (a, a_logger) = provider.bind_child(&root);
    let (b, b_logger) = provider.bind_child(&a);

    root_logger.info("root", &[]);
    a_logger.info("a", &[]);
    b_logger.info("b", &[]);
    assert_eq!(parent_log_id(&b), log_id(&a));
    assert_eq!(
        memory.drain_lines(),
        vec![
            "level=INFO msg=root logId=0000000000000000",
            "level=INFO msg=a logId=0000000000000001 parentLogId=0000000000000000",
            "level=INFO msg=b logId=0000000000000002 parentLogId=0000000000000001",
        ]
    );
}

#[test]
fn test_child_logger_does_not_lend_its_parent_to_another_unit() {
    let _guard = TEST_GUARD.lock().unwrap();
    let (memory, provider) = setup();

    let (root, _) = provider.bind(&Context::background());
    let (_child, child_logger) = provider.bind_child(&root);
    let unrelated = with_log_context(&Context::background());
    child_logger.info("own", &[]);
    child_logger.info_context(&unrelated, "unrelated", &[]);
    assert_eq!(
        memory.drain_lines(),
        vec![
            "level=INFO msg=own logId=0000000000000001 parentLogId=0000000000000000",
            "level=INFO msg=unrelated logId=0000000000000002",
        ]
    );
}

#[test]
fn test_siblings_share_a_parent() {
    let _guard = TEST_GUARD.lock().unwrap();
    let (memory, provider) = setup();

    let (root, _) = provider.bind(&Context::background());
    let logger = provider.logger();
    for _ in 0..3 {
        let task = with_child_log_context(&root);
        logger.info_context(&task, "task", &[]);
    }
    let lines = memory.drain_lines();
    assert_eq!(lines.len(), 3);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(
            line,
            &format!(
                "level=INFO msg=task logId={:016} parentLogId=0000000000000000",
                i + 1
            )
        );
    }
}

#[test]
fn test_unbound_context_emits_no_ids() {
    let _guard = TEST_GUARD.lock().unwrap();
    let (memory, provider) = setup();
    let logger = provider.logger();
    logger.warn("no ids", &[]);
    logger.warn_context(&Context::background(), "still none", &[]);
    assert_eq!(
        memory.drain_logs(),
        "level=WARN msg=\"no ids\"\nlevel=WARN msg=\"still none\""
    );
}

#[test]
fn test_threads_keep_their_own_ids() {
    let _guard = TEST_GUARD.lock().unwrap();
    let (memory, provider) = setup();
    let (root, _) = provider.bind(&Context::background());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let provider = provider.clone();
            let root = root.clone();
            std::thread::spawn(move || {
                let (task, logger) = provider.bind_child(&root);
                for _ in 0..10 {
                    logger.info("tick", &[]);
                }
                log_id(&task).to_string()
            })
        })
        .collect();
    let ids: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().expect("logging thread panicked"))
        .collect();

    let records = memory.records();
    assert_eq!(records.len(), 40);
    for id in &ids {
        let count = records
            .iter()
            .filter(|r| {
                r.attrs()
                    .iter()
                    .any(|a| a.key == "logId" && a.value.to_string() == *id)
            })
            .count();
        assert_eq!(count, 10, "id {id}");
    }
}
