use std::cell::RefCell;
use std::rc::Rc;

use super::{Body, DefaultSignalFactory, Signal, SignalFactory};
use crate::Value;

#[test]
fn connect_emit_disconnect() {
    let signal = Signal::<(i32, i32)>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let a = signal.connect({
        let seen = seen.clone();
        move |&(x, y)| seen.borrow_mut().push(("a", x + y))
    });

    let b = signal.connect({
        let seen = seen.clone();
        move |&(x, y)| seen.borrow_mut().push(("b", x * y))
    });

    assert_ne!(a, b);
    assert_eq!(signal.len(), 2);

    signal.emit(&(2, 3));
    assert!(signal.disconnect(a));
    assert!(!signal.disconnect(a));
    signal.emit(&(4, 5));

    assert_eq!(*seen.borrow(), [("a", 5), ("b", 6), ("b", 20)]);
    assert_eq!(signal.len(), 1);
    assert!(!signal.is_empty());
}

#[test]
fn emission_uses_a_snapshot() {
    let signal = Rc::new(Signal::<()>::new());
    let calls = Rc::new(RefCell::new(Vec::new()));

    signal.connect({
        let signal = Rc::downgrade(&signal);
        let calls = calls.clone();

        move |()| {
            calls.borrow_mut().push("first");

            let Some(signal) = signal.upgrade() else {
                return;
            };

            // Connected during emission, so only called on the next one.
            let calls = calls.clone();
            signal.connect(move |()| calls.borrow_mut().push("late"));
        }
    });

    signal.emit(&());
    assert_eq!(*calls.borrow(), ["first"]);

    signal.emit(&());
    assert_eq!(*calls.borrow(), ["first", "first", "late"]);
}

#[test]
fn disconnect_during_emission() {
    let signal = Rc::new(Signal::<()>::new());
    let handler = Rc::new(RefCell::new(None));
    let calls = Rc::new(RefCell::new(0));

    let h = signal.connect({
        let signal = Rc::downgrade(&signal);
        let handler = handler.clone();
        let calls = calls.clone();

        move |()| {
            *calls.borrow_mut() += 1;

            if let (Some(signal), Some(handler)) = (signal.upgrade(), *handler.borrow()) {
                signal.disconnect(handler);
            }
        }
    });

    *handler.borrow_mut() = Some(h);

    signal.emit(&());
    signal.emit(&());
    assert_eq!(*calls.borrow(), 1);
    assert!(signal.is_empty());
}

#[test]
fn factories() {
    let a = DefaultSignalFactory.create("I", "A");
    let b = DefaultSignalFactory.create("I", "A");
    assert!(!Rc::ptr_eq(&a, &b));

    let created = Rc::new(RefCell::new(Vec::new()));

    let factory = {
        let created = created.clone();

        move |interface: &str, member: &str| {
            created.borrow_mut().push(format!("{interface}.{member}"));
            Rc::new(Signal::<Body>::new())
        }
    };

    let signal = factory.create("org.example.I", "Changed");
    signal.emit(&vec![Value::from(1i32)]);
    assert_eq!(*created.borrow(), ["org.example.I.Changed"]);
}
