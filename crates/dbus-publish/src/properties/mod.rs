//! Property change tracking and the `org.freedesktop.DBus.Properties`
//! interface.

#[cfg(test)]
mod tests;

use std::cell::RefCell;

use dbus_publish_core::signature::Signature;
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use crate::error::ErrorKind;
use crate::signal::Body;
use crate::specification::{Member, Property, Specification};
use crate::value::{Array, Dict};
use crate::variant::as_variant;
use crate::{Error, Object, Result, Value, Variant};

/// Coalesces reports of changed properties into per-interface batches.
///
/// Properties are identified by name alone, which requires names to be unique
/// across all interfaces of the object.
///
/// # Examples
///
/// ```
/// use dbus_publish::{ClassBuilder, PropertiesTracker, PropertyDecl, Value};
///
/// let class = ClassBuilder::new("Counter")
///     .property("Count", PropertyDecl::read::<u32>())
///     .declare_interface("org.example.Counter")?;
///
/// let tracker = PropertiesTracker::new(class.specification().expect("declared"))?;
///
/// tracker.report_changed("Count")?;
/// tracker.report_changed("Count")?;
///
/// let batches = tracker.flush(|_| Ok(Value::from(7u32)))?;
/// assert_eq!(batches.len(), 1);
/// assert_eq!(batches[0].interface(), "org.example.Counter");
/// assert_eq!(batches[0].changed().len(), 1);
///
/// assert!(tracker.flush(|_| Ok(Value::from(7u32)))?.is_empty());
/// # Ok::<_, dbus_publish::Error>(())
/// ```
#[derive(Debug)]
pub struct PropertiesTracker {
    properties: IndexMap<Box<str>, Property>,
    pending: RefCell<IndexSet<Box<str>>>,
}

impl PropertiesTracker {
    /// Construct a tracker for the properties of a specification.
    ///
    /// # Errors
    ///
    /// Fails if two interfaces declare a property with the same name.
    pub fn new(specification: &Specification) -> Result<Self> {
        let mut properties = IndexMap::<Box<str>, Property>::new();

        for property in specification.properties() {
            match properties.entry(property.name().into()) {
                Entry::Occupied(e) => {
                    return Err(Error::new(ErrorKind::AmbiguousProperty {
                        name: property.name().into(),
                        first: e.get().interface().into(),
                        second: property.interface().into(),
                    }));
                }
                Entry::Vacant(e) => {
                    e.insert(property.clone());
                }
            }
        }

        Ok(Self {
            properties,
            pending: RefCell::new(IndexSet::new()),
        })
    }

    /// Iterate over the tracked properties.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    /// Look up a property by name.
    pub fn validate(&self, name: &str) -> Result<&Property> {
        match self.properties.get(name) {
            Some(property) => Ok(property),
            None => Err(Error::new(ErrorKind::UnknownProperty(name.into()))),
        }
    }

    /// Report that a property has changed.
    ///
    /// The change is emitted with the next [`flush`](Self::flush), using the
    /// value the property has at that point.
    pub fn report_changed(&self, name: &str) -> Result<()> {
        self.validate(name)?;
        trace!("Property {name} changed");
        self.mark(name);
        Ok(())
    }

    /// Mark a property which is known to exist as changed.
    pub(crate) fn mark(&self, name: &str) {
        self.pending.borrow_mut().insert(name.into());
    }

    /// Test if the property has a pending change.
    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.borrow().contains(name)
    }

    /// Test if there are any pending changes.
    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Collect pending changes into batches, one per interface in the order
    /// the interfaces were first changed.
    ///
    /// `read` is called with each changed property to read its current value.
    ///
    /// # Errors
    ///
    /// If `read` fails, or produces a value of the wrong type, the error is
    /// returned and every property of the flush stays pending, in front of
    /// properties reported since.
    pub fn flush<F>(&self, mut read: F) -> Result<Vec<Batch>>
    where
        F: FnMut(&Property) -> Result<Value>,
    {
        let snapshot = self.pending.take();

        let batches = match self.collect(&snapshot, &mut read) {
            Ok(batches) => batches,
            Err(error) => {
                self.restore(snapshot);
                return Err(error);
            }
        };

        for batch in &batches {
            debug!(
                "Properties of {} changed: {}",
                batch.interface,
                batch.names().collect::<Vec<_>>().join(", ")
            );
        }

        Ok(batches)
    }

    fn collect<F>(&self, snapshot: &IndexSet<Box<str>>, read: &mut F) -> Result<Vec<Batch>>
    where
        F: FnMut(&Property) -> Result<Value>,
    {
        let mut batches = IndexMap::<Box<str>, Batch>::new();

        for name in snapshot {
            let property = self.validate(name)?;
            let variant = as_variant(property.ty(), read(property)?)?;

            batches
                .entry(property.interface().into())
                .or_insert_with(|| Batch::new(property.interface()))
                .changed
                .insert(name.clone(), variant);
        }

        Ok(batches.into_values().collect())
    }

    /// Put a snapshot back in front of the pending set.
    fn restore(&self, mut snapshot: IndexSet<Box<str>>) {
        let mut pending = self.pending.borrow_mut();
        snapshot.extend(pending.drain(..));
        *pending = snapshot;
    }
}

/// The changes to the properties of one interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    interface: Box<str>,
    changed: IndexMap<Box<str>, Variant>,
}

impl Batch {
    fn new(interface: &str) -> Self {
        Self {
            interface: interface.into(),
            changed: IndexMap::new(),
        }
    }

    /// The interface of the changed properties.
    #[inline]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// The changed properties and their current values.
    #[inline]
    pub fn changed(&self) -> &IndexMap<Box<str>, Variant> {
        &self.changed
    }

    /// Iterate over the names of changed properties.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.changed.keys().map(|name| &**name)
    }

    /// Build the arguments of the `PropertiesChanged` signal for this batch.
    pub fn body(&self) -> Body {
        properties_changed_body(&self.interface, &self.changed)
    }
}

/// Build the `(s, a{sv}, as)` arguments of a `PropertiesChanged` signal, with
/// no invalidated properties.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
///
/// use dbus_publish::properties::properties_changed_body;
/// use dbus_publish::{Value, Variant};
///
/// let mut changed = IndexMap::new();
/// changed.insert("A".into(), Variant::from(1i32));
///
/// let body = properties_changed_body("org.example.I", &changed);
/// assert_eq!(body[0], Value::from("org.example.I"));
/// assert_eq!(Value::Struct(body).signature()?, "(sa{sv}as)");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub fn properties_changed_body(interface: &str, changed: &IndexMap<Box<str>, Variant>) -> Body {
    let entries = changed
        .iter()
        .map(|(name, variant)| (Value::from(&**name), Value::from(variant.clone())))
        .collect();

    vec![
        Value::from(interface),
        Value::Dict(Dict {
            key: Signature::STRING,
            value: Signature::VARIANT,
            entries,
        }),
        Value::Array(Array {
            element: Signature::STRING,
            items: Vec::new(),
        }),
    ]
}

/// Look up a member of an object, checking that its interface exists.
fn lookup<'a, O>(object: &'a O, interface: &str, name: &str) -> Result<&'a Member>
where
    O: ?Sized + Object,
{
    let specification = object.state().class().require_specification()?;
    check_interface(specification, interface)?;

    match specification.get_member(interface, name) {
        Ok(member) => Ok(member),
        Err(..) => Err(Error::new(ErrorKind::UnknownProperty(name.into()))),
    }
}

fn check_interface(specification: &Specification, interface: &str) -> Result<()> {
    if !specification.contains_interface(interface) {
        return Err(Error::new(ErrorKind::UnknownInterface(interface.into())));
    }

    Ok(())
}

/// Read a property, the way `org.freedesktop.DBus.Properties.Get` does.
pub fn get<O>(object: &O, interface: &str, name: &str) -> Result<Variant>
where
    O: ?Sized + Object,
{
    let Member::Property(property) = lookup(object, interface, name)? else {
        return Err(Error::new(ErrorKind::UnknownProperty(name.into())));
    };

    if !property.readable() {
        return Err(Error::new(ErrorKind::PropertyNotReadable(name.into())));
    }

    as_variant(property.ty(), object.get(name)?)
}

/// Read every readable property of an interface in declaration order, the
/// way `org.freedesktop.DBus.Properties.GetAll` does.
pub fn get_all<O>(object: &O, interface: &str) -> Result<IndexMap<Box<str>, Variant>>
where
    O: ?Sized + Object,
{
    let specification = object.state().class().require_specification()?;
    check_interface(specification, interface)?;

    let mut values = IndexMap::new();

    for property in specification.properties() {
        if property.interface() != interface || !property.readable() {
            continue;
        }

        let value = object.get(property.name())?;
        values.insert(property.name().into(), as_variant(property.ty(), value)?);
    }

    Ok(values)
}

/// Write a property, the way `org.freedesktop.DBus.Properties.Set` does.
///
/// The object is expected to report the change itself.
pub fn set<O>(object: &O, interface: &str, name: &str, value: Variant) -> Result<()>
where
    O: ?Sized + Object,
{
    let property = match lookup(object, interface, name)? {
        Member::Property(property) => property,
        Member::Signal(..) => {
            return Err(Error::new(ErrorKind::SignalNotWritable(name.into())));
        }
        Member::Method(..) => {
            return Err(Error::new(ErrorKind::UnknownProperty(name.into())));
        }
    };

    if !property.writable() {
        return Err(Error::new(ErrorKind::PropertyNotWritable(name.into())));
    }

    if value.signature() != property.ty() {
        return Err(Error::new(ErrorKind::TypeMismatch {
            expected: property.ty().clone(),
            actual: value.signature().clone(),
        }));
    }

    object.set(name, value.into_value())
}
