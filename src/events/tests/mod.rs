use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::events::{EventBus, Handler, PROJECT_DATA_CHANGED};

#[test]
fn publish_invokes_every_subscriber_in_order() {
    let bus = EventBus::new();
    let calls = Arc::new(std::sync::Mutex::new(Vec::new()));
    let first_calls = calls.clone();
    let second_calls = calls.clone();
    bus.subscribe(
        PROJECT_DATA_CHANGED,
        Arc::new(move || first_calls.lock().unwrap().push("first")),
    );
    bus.subscribe(
        PROJECT_DATA_CHANGED,
        Arc::new(move || second_calls.lock().unwrap().push("second")),
    );
    bus.publish(PROJECT_DATA_CHANGED);
    assert_eq!(vec!["first", "second"], *calls.lock().unwrap());
}

#[test]
fn publish_without_subscribers_is_a_no_op() {
    let bus = EventBus::new();
    bus.publish(PROJECT_DATA_CHANGED);
}

#[test]
fn subscribing_the_same_handler_twice_invokes_it_once() {
    let bus = EventBus::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let handler: Handler = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let first = bus.subscribe(PROJECT_DATA_CHANGED, handler.clone());
    let second = bus.subscribe(PROJECT_DATA_CHANGED, handler);
    assert_eq!(first, second);
    bus.publish(PROJECT_DATA_CHANGED);
    assert_eq!(1, count.load(Ordering::SeqCst));
}

#[test]
fn a_panicking_subscriber_does_not_stop_the_others() {
    let bus = EventBus::new();
    let count = Arc::new(AtomicUsize::new(0));
    bus.subscribe(PROJECT_DATA_CHANGED, Arc::new(|| panic!("bad handler")));
    let counter = count.clone();
    bus.subscribe(
        PROJECT_DATA_CHANGED,
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    bus.publish(PROJECT_DATA_CHANGED);
    assert_eq!(1, count.load(Ordering::SeqCst));
}

#[test]
fn unsubscribe_stops_delivery() {
    let bus = EventBus::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let token = bus.subscribe(
        PROJECT_DATA_CHANGED,
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    bus.publish(PROJECT_DATA_CHANGED);
    bus.unsubscribe(&token);
    bus.publish(PROJECT_DATA_CHANGED);
    assert_eq!(1, count.load(Ordering::SeqCst));
}

#[test]
fn dropped_weak_subscriber_is_never_invoked() {
    let bus = EventBus::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let handler: Handler = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    bus.subscribe_weak(PROJECT_DATA_CHANGED, &handler);
    bus.publish(PROJECT_DATA_CHANGED);
    assert_eq!(1, count.load(Ordering::SeqCst));
    drop(handler);
    bus.publish(PROJECT_DATA_CHANGED);
    assert_eq!(1, count.load(Ordering::SeqCst));
}

#[test]
fn weak_subscribe_is_idempotent_per_allocation() {
    let bus = EventBus::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let handler: Handler = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let first = bus.subscribe_weak(PROJECT_DATA_CHANGED, &handler);
    let second = bus.subscribe_weak(PROJECT_DATA_CHANGED, &handler);
    assert_eq!(first, second);
    bus.publish(PROJECT_DATA_CHANGED);
    assert_eq!(1, count.load(Ordering::SeqCst));
}
