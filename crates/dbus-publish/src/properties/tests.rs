use std::cell::{Cell, RefCell};
use std::sync::Arc;

use dbus_publish_core::signature::Signature;

use crate::attribute::{PropertyDecl, SignalDecl};
use crate::class::{Class, ClassBuilder};
use crate::error::{Category, ErrorKind};
use crate::object::{Object, ObjectState};
use crate::{Error, Result, Value, Variant};

use super::{PropertiesTracker, get, get_all, set};

fn two_interfaces() -> Result<Arc<Class>> {
    let a = ClassBuilder::new("A")
        .property("A1", PropertyDecl::read::<i32>())
        .property("A2", PropertyDecl::read_write::<String>())
        .declare_interface("I.A")?;

    ClassBuilder::new("B")
        .extends(&a)
        .property("B1", PropertyDecl::read::<i32>())
        .property("Secret", PropertyDecl::write::<String>())
        .signal("Poked", SignalDecl::new())
        .declare_interface("I.B")
}

struct Thing {
    state: ObjectState,
    a1: Cell<i32>,
    a2: RefCell<String>,
    b1: Cell<i32>,
    broken: Cell<bool>,
}

impl Thing {
    fn new(class: &Arc<Class>) -> Result<Self> {
        Ok(Self {
            state: ObjectState::new(class)?,
            a1: Cell::new(1),
            a2: RefCell::new(String::from("two")),
            b1: Cell::new(2),
            broken: Cell::new(false),
        })
    }
}

impl Object for Thing {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn get(&self, name: &str) -> Result<Value> {
        match name {
            "A1" => Ok(Value::from(self.a1.get())),
            "A2" => Ok(Value::from(self.a2.borrow().as_str())),
            "B1" if self.broken.get() => Err(Error::failed("B1 is unavailable")),
            "B1" => Ok(Value::from(self.b1.get())),
            _ => Err(Error::failed(format!("no value for {name}"))),
        }
    }

    fn set(&self, name: &str, value: Value) -> Result<()> {
        match name {
            "A2" => *self.a2.borrow_mut() = String::try_from(value)?,
            "Secret" => {}
            _ => return Err(Error::failed(format!("can't set {name}"))),
        }

        self.report_changed(name)
    }
}

#[test]
fn coalescing_and_freshness() -> Result<()> {
    let thing = Thing::new(&two_interfaces()?)?;

    thing.report_changed("B1")?;
    thing.report_changed("A1")?;
    thing.report_changed("B1")?;
    thing.a1.set(10);
    thing.a1.set(11);
    thing.report_changed("A2")?;

    let batches = thing.flush()?;
    assert_eq!(batches.len(), 2);

    assert_eq!(batches[0].interface(), "I.B");
    assert_eq!(batches[0].names().collect::<Vec<_>>(), ["B1"]);
    assert_eq!(batches[0].changed()["B1"], Variant::from(2i32));

    assert_eq!(batches[1].interface(), "I.A");
    assert_eq!(batches[1].names().collect::<Vec<_>>(), ["A1", "A2"]);
    assert_eq!(batches[1].changed()["A1"], Variant::from(11i32));
    assert_eq!(batches[1].changed()["A2"], Variant::from("two"));

    assert!(thing.flush()?.is_empty());
    Ok(())
}

#[test]
fn unknown_property() -> Result<()> {
    let thing = Thing::new(&two_interfaces()?)?;

    let error = thing.report_changed("Missing").unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnknownProperty(..)));
    assert_eq!(error.category(), Category::Properties);
    assert!(!thing.state().tracker().has_pending());
    Ok(())
}

#[test]
fn ambiguous_property() -> Result<()> {
    let a = ClassBuilder::new("A")
        .property("A1", PropertyDecl::read::<i32>())
        .declare_interface("A")?;

    let b = ClassBuilder::new("B")
        .property("A1", PropertyDecl::read::<String>())
        .declare_interface("B")?;

    let class = ClassBuilder::new("C").extends(&a).extends(&b).declare_class()?;

    let error = PropertiesTracker::new(class.specification().expect("declared")).unwrap_err();
    assert_eq!(error.category(), Category::Specification);
    assert_eq!(error.to_string(), "Property A1 is defined by both A and B");

    let error = ObjectState::new(&class).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::AmbiguousProperty { .. }));
    Ok(())
}

#[test]
fn failed_reads_stay_pending() -> Result<()> {
    let thing = Thing::new(&two_interfaces()?)?;
    let tracker = thing.state().tracker();

    thing.broken.set(true);
    thing.report_changed("A1")?;
    thing.report_changed("B1")?;
    thing.report_changed("A2")?;

    let error = thing.flush().unwrap_err();
    assert_eq!(error.category(), Category::Failed);
    assert_eq!(error.to_string(), "B1 is unavailable");

    assert!(tracker.is_pending("A1"));
    assert!(tracker.is_pending("B1"));
    assert!(tracker.is_pending("A2"));

    thing.broken.set(false);
    thing.report_changed("B1")?;

    let batches = thing.flush()?;
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].interface(), "I.A");
    assert_eq!(batches[0].names().collect::<Vec<_>>(), ["A1", "A2"]);
    assert_eq!(batches[1].interface(), "I.B");
    assert_eq!(batches[1].names().collect::<Vec<_>>(), ["B1"]);
    assert!(!tracker.has_pending());
    Ok(())
}

#[test]
fn values_of_the_wrong_type_fail_the_flush() -> Result<()> {
    let class = ClassBuilder::new("C")
        .property("P", PropertyDecl::read::<u32>())
        .declare_interface("I")?;

    let tracker = PropertiesTracker::new(class.specification().expect("declared"))?;
    tracker.report_changed("P")?;

    let error = tracker.flush(|_| Ok(Value::from("text"))).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::TypeMismatch { .. }));
    assert!(tracker.is_pending("P"));
    Ok(())
}

#[test]
fn properties_interface() -> Result<()> {
    let thing = Thing::new(&two_interfaces()?)?;

    assert_eq!(get(&thing, "I.A", "A1")?, Variant::from(1i32));

    let all = get_all(&thing, "I.A")?;
    assert_eq!(all.keys().map(|k| &**k).collect::<Vec<_>>(), ["A1", "A2"]);

    // Write-only properties are left out.
    let all = get_all(&thing, "I.B")?;
    assert_eq!(all.keys().map(|k| &**k).collect::<Vec<_>>(), ["B1"]);

    assert!(get_all(&thing, "org.freedesktop.DBus.Peer")?.is_empty());

    set(&thing, "I.A", "A2", Variant::from("three"))?;
    assert_eq!(*thing.a2.borrow(), "three");
    assert!(thing.state().tracker().is_pending("A2"));

    let kinds = [
        get(&thing, "I.C", "A1").unwrap_err(),
        get(&thing, "I.B", "A1").unwrap_err(),
        get(&thing, "I.B", "Secret").unwrap_err(),
        get(&thing, "I.B", "Poked").unwrap_err(),
        set(&thing, "I.A", "A1", Variant::from(5i32)).unwrap_err(),
        set(&thing, "I.A", "A2", Variant::from(5i32)).unwrap_err(),
        set(&thing, "I.B", "Poked", Variant::from(5i32)).unwrap_err(),
        get_all(&thing, "I.C").unwrap_err(),
    ];

    assert!(matches!(kinds[0].kind(), ErrorKind::UnknownInterface(..)));
    assert!(matches!(kinds[1].kind(), ErrorKind::UnknownProperty(..)));
    assert!(matches!(kinds[2].kind(), ErrorKind::PropertyNotReadable(..)));
    assert!(matches!(kinds[3].kind(), ErrorKind::UnknownProperty(..)));
    assert!(matches!(kinds[4].kind(), ErrorKind::PropertyNotWritable(..)));
    assert!(matches!(
        kinds[5].kind(),
        ErrorKind::TypeMismatch { expected, actual }
            if *expected == Signature::STRING && *actual == Signature::INT32
    ));
    assert!(matches!(kinds[6].kind(), ErrorKind::SignalNotWritable(..)));
    assert!(matches!(kinds[7].kind(), ErrorKind::UnknownInterface(..)));

    for error in &kinds {
        assert_eq!(error.category(), Category::Properties);
    }

    Ok(())
}

#[test]
fn batch_body() -> Result<()> {
    let thing = Thing::new(&two_interfaces()?)?;
    thing.report_changed("A1")?;

    let batches = thing.flush()?;
    let body = batches[0].body();

    assert_eq!(body.len(), 3);
    assert_eq!(body[0], Value::from("I.A"));

    let Value::Dict(changed) = &body[1] else {
        panic!("expected a dict");
    };

    assert_eq!(changed.get("A1"), Some(&Value::from(Variant::from(1i32))));

    let Value::Array(invalidated) = &body[2] else {
        panic!("expected an array");
    };

    assert!(invalidated.items().is_empty());
    assert_eq!(invalidated.element(), &Signature::STRING);
    Ok(())
}

#[test]
fn interfaces_without_members() -> Result<()> {
    let empty = ClassBuilder::new("Empty").declare_interface("org.example.Empty")?;
    let thing = Thing::new(&empty)?;

    let specification = empty.specification().expect("declared");
    assert!(specification.contains_interface("org.example.Empty"));
    assert!(specification.interfaces().any(|i| i == "org.example.Empty"));
    assert!(get_all(&thing, "org.example.Empty")?.is_empty());
    Ok(())
}
