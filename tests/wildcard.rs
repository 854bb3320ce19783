//! End-to-end coverage of the wildcard emitter contract.

use std::sync::{Arc, Mutex};

use evbus::{EmitterConfig, WildcardEmitter};
use serde_json::{json, Value};

type Log = Arc<Mutex<Vec<(String, Vec<Value>)>>>;

fn recording(log: &Log, tag: &str) -> impl Fn(&[Value]) + Send + Sync + 'static {
    let log = Arc::clone(log);
    let tag = tag.to_string();
    move |args: &[Value]| {
        log.lock().unwrap().push((tag.clone(), args.to_vec()));
    }
}

#[test]
fn hierarchical_dispatch_with_prefix_rewriting() {
    let emitter = WildcardEmitter::default();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    emitter.on("%", recording(&log, "%"));
    emitter.on("foo_%", recording(&log, "foo_%"));
    emitter.on("foo_bar_%", recording(&log, "foo_bar_%"));
    emitter.on("foo_bar_baz", recording(&log, "foo_bar_baz"));

    let invoked = emitter.emit("foo_bar_baz", &[json!("one"), json!({"two": 2})]);
    assert_eq!(invoked, 4);

    let log = log.lock().unwrap();
    let tags: Vec<&str> = log.iter().map(|(tag, _)| tag.as_str()).collect();
    assert_eq!(tags, vec!["%", "foo_%", "foo_bar_%", "foo_bar_baz"]);

    let rewritten = vec![
        json!({"event": "foo_bar_baz"}),
        json!("one"),
        json!({"two": 2}),
    ];
    for (_, args) in log.iter().take(3) {
        assert_eq!(args, &rewritten);
    }
    assert_eq!(log[3].1, vec![json!("one"), json!({"two": 2})]);
}

#[test]
fn unrelated_patterns_do_not_fire() {
    let emitter = WildcardEmitter::default();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    emitter.on("foo_bar_%", recording(&log, "deep"));
    emitter.on("other_%", recording(&log, "other"));

    emitter.emit("foo_bar", &[]);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn no_subscriptions_listener_receives_unmatched_emits() {
    let emitter = WildcardEmitter::default();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    emitter.on("", recording(&log, "fallback"));

    let invoked = emitter.emit("foo_bar_baz", &[json!("one"), json!({"two": 2})]);
    assert_eq!(invoked, 1);

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(
        log[0].1,
        vec![
            json!({"event": "foo_bar_baz"}),
            json!("one"),
            json!({"two": 2})
        ]
    );
}

#[test]
fn nothing_happens_without_a_no_subscriptions_listener() {
    let emitter = WildcardEmitter::default();
    assert_eq!(emitter.emit("unheard", &[json!(1)]), 0);
}

#[test]
fn custom_delimiter_wildcard_and_fallback_name() {
    let config = EmitterConfig::default()
        .with_delimiter(".")
        .with_wildcard("*")
        .with_no_subscriptions_event("dead.letter");
    let emitter = WildcardEmitter::new(config);
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    emitter.on("orders.*", recording(&log, "orders"));
    emitter.on("dead.letter", recording(&log, "dead"));

    emitter.emit("orders.created", &[json!(7)]);
    emitter.emit("users.created", &[json!(8)]);

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].0, "orders");
    assert_eq!(log[0].1, vec![json!({"event": "orders.created"}), json!(7)]);
    assert_eq!(log[1].0, "dead");
    assert_eq!(log[1].1, vec![json!({"event": "users.created"}), json!(8)]);
}

#[test]
fn listener_removal_affects_future_emits() {
    let emitter = WildcardEmitter::default();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let id = emitter.on("ping", recording(&log, "first"));
    emitter.on("ping", recording(&log, "second"));
    assert_eq!(emitter.listener_count("ping"), 2);

    assert!(emitter.off(id));
    emitter.emit("ping", &[]);

    let tags: Vec<String> = log.lock().unwrap().iter().map(|(t, _)| t.clone()).collect();
    assert_eq!(tags, vec!["second"]);
}
