//! Integration tests for the notification-triggered rebalancing flow.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use ems_agent::mib::{Oid, oid};
use ems_agent::notify::{Notification, NotificationBridge};
use ems_agent::registry::MemoryRegistry;

/// Baseline apartment with its total generation already derived by a
/// registration cycle: solar 20, hydro 120, storage 10, total 150.
fn registered_shared() -> ems_agent::model::SharedApartment {
    let mut apartment = common::baseline_apartment();
    let mut registry = MemoryRegistry::new();
    apartment.register(&mut registry).expect("registration");
    common::shared(apartment)
}

fn solar_oid() -> Oid {
    Oid::new(oid::APT_GENERATION_BY_SOLAR)
}

#[test]
fn summer_scenario_drains_storage_through_the_listener() {
    let apartment = registered_shared();
    let bridge = NotificationBridge::new(Arc::clone(&apartment));

    let (tx, rx) = mpsc::channel::<Notification>();
    let listener = thread::spawn(move || bridge.run(rx));

    // Manager raises solar generation from 20 to 40, then sends the trap
    apartment
        .lock()
        .write_scalar(&solar_oid(), "40")
        .expect("manager write");
    tx.send(Notification::new(solar_oid(), "40")).expect("send");

    drop(tx);
    listener.join().expect("listener must not panic");

    let apartment = apartment.lock();
    assert_eq!(apartment.storage(), Some("0"));
    assert_eq!(apartment.generation_by_hydro(), Some("110"));
    // the stale total is untouched until the next registration cycle
    assert_eq!(apartment.generation(), Some("150"));
}

#[test]
fn consecutive_events_rebalance_against_the_stale_total() {
    let apartment = registered_shared();
    let bridge = NotificationBridge::new(Arc::clone(&apartment));

    let (tx, rx) = mpsc::channel::<Notification>();
    let listener = thread::spawn(move || bridge.run(rx));

    // Summer peak, then an overcast drop
    for solar in ["40", "10"] {
        apartment
            .lock()
            .write_scalar(&solar_oid(), solar)
            .expect("manager write");
        tx.send(Notification::new(solar_oid(), solar)).expect("send");
    }

    drop(tx);
    listener.join().expect("listener must not panic");

    // Second event: solar 10, hydro 110, storage 0 against total 150 is a
    // 30-unit deficit, so storage returns to baseline and hydro covers the
    // rest.
    let apartment = apartment.lock();
    assert_eq!(apartment.storage(), Some("10"));
    assert_eq!(apartment.generation_by_hydro(), Some("130"));
}

#[test]
fn events_for_other_identifiers_leave_state_untouched() {
    let apartment = registered_shared();
    let bridge = NotificationBridge::new(Arc::clone(&apartment));

    let (tx, rx) = mpsc::channel::<Notification>();
    let listener = thread::spawn(move || bridge.run(rx));

    tx.send(Notification::new(Oid::new(oid::APT_CONSUMPTION), "90"))
        .expect("send");
    tx.send(Notification::new(Oid::new(oid::APT_STORAGE), "3"))
        .expect("send");

    drop(tx);
    listener.join().expect("listener must not panic");

    let apartment = apartment.lock();
    assert_eq!(apartment.storage(), Some("10"));
    assert_eq!(apartment.generation_by_hydro(), Some("120"));
}

#[test]
fn concurrent_reader_never_observes_a_torn_rebalance() {
    let apartment = registered_shared();
    let bridge = NotificationBridge::new(Arc::clone(&apartment));
    let stop = Arc::new(AtomicBool::new(false));

    // Rebalancing alternates the apartment between three consistent
    // (storage, hydro) pairs; a reader holding the lock must never see
    // anything else, in particular not a storage write without its paired
    // hydro write.
    let observer = {
        let apartment = Arc::clone(&apartment);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let allowed = [("10", "120"), ("0", "110"), ("10", "130")];
            while !stop.load(Ordering::Relaxed) {
                let guard = apartment.lock();
                let pair = (
                    guard.storage().expect("set").to_string(),
                    guard.generation_by_hydro().expect("set").to_string(),
                );
                drop(guard);
                assert!(
                    allowed
                        .iter()
                        .any(|(s, h)| *s == pair.0 && *h == pair.1),
                    "torn rebalance state observed: {pair:?}"
                );
            }
        })
    };

    for i in 0..200 {
        let solar = if i % 2 == 0 { "40" } else { "10" };
        apartment
            .lock()
            .write_scalar(&solar_oid(), solar)
            .expect("manager write");
        bridge.handle(&Notification::new(solar_oid(), solar));
    }

    stop.store(true, Ordering::Relaxed);
    observer.join().expect("observer must not panic");
}
