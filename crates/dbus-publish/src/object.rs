//! Objects published over D-Bus.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::class::{Class, xml_of};
use crate::error::ErrorKind;
use crate::org_freedesktop_dbus::{PROPERTIES, PROPERTIES_CHANGED};
use crate::properties::{Batch, PropertiesTracker};
use crate::signal::{Body, DefaultSignalFactory, Signal, SignalFactory};
use crate::{Error, Result, Value};

/// The state every published object carries.
///
/// This holds the class of the object, its property tracker and its signals.
/// Signals are created on first use through the configured
/// [`SignalFactory`], and are never shared with other objects.
pub struct ObjectState {
    class: Arc<Class>,
    tracker: PropertiesTracker,
    factory: Rc<dyn SignalFactory>,
    /// Signal slots as `(interface, member)`, in declaration order.
    slots: Vec<(Box<str>, Box<str>)>,
    signals: Vec<OnceCell<Rc<Signal<Body>>>>,
}

impl ObjectState {
    /// Construct the state of an object of the given class.
    ///
    /// # Errors
    ///
    /// Fails if the class wasn't declared, or if two of its interfaces
    /// declare a property with the same name.
    pub fn new(class: &Arc<Class>) -> Result<Self> {
        Self::builder(class).build()
    }

    /// Construct a builder for the state of an object of the given class.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    ///
    /// use dbus_publish::signal::Body;
    /// use dbus_publish::{ClassBuilder, ObjectState, Signal, SignalDecl};
    ///
    /// let class = ClassBuilder::new("Beacon")
    ///     .signal("Blink", SignalDecl::new())
    ///     .declare_interface("org.example.Beacon")?;
    ///
    /// let state = ObjectState::builder(&class)
    ///     .signal_factory(|_: &str, _: &str| Rc::new(Signal::<Body>::new()))
    ///     .build()?;
    ///
    /// let blink = state.signal("org.example.Beacon", "Blink")?;
    /// assert!(Rc::ptr_eq(&blink, &state.signal("org.example.Beacon", "Blink")?));
    /// # Ok::<_, dbus_publish::Error>(())
    /// ```
    pub fn builder(class: &Arc<Class>) -> ObjectStateBuilder {
        ObjectStateBuilder {
            class: class.clone(),
            factory: Rc::new(DefaultSignalFactory),
        }
    }

    /// The class of the object.
    #[inline]
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// The property tracker of the object.
    #[inline]
    pub fn tracker(&self) -> &PropertiesTracker {
        &self.tracker
    }

    /// Get the signal `member` of `interface`.
    pub fn signal(&self, interface: &str, member: &str) -> Result<Rc<Signal<Body>>> {
        let index = self
            .slots
            .iter()
            .position(|(i, m)| **i == *interface && **m == *member);

        let Some(index) = index else {
            return Err(Error::new(ErrorKind::UnknownSignal(
                format!("{interface}.{member}").into(),
            )));
        };

        let signal = self.signals[index].get_or_init(|| self.factory.create(interface, member));
        Ok(signal.clone())
    }
}

impl fmt::Debug for ObjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectState")
            .field("class", &self.class.name())
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

/// Builder of an [`ObjectState`].
pub struct ObjectStateBuilder {
    class: Arc<Class>,
    factory: Rc<dyn SignalFactory>,
}

impl ObjectStateBuilder {
    /// Set the factory used to create the signals of the object.
    pub fn signal_factory<F>(&mut self, factory: F) -> &mut Self
    where
        F: 'static + SignalFactory,
    {
        self.factory = Rc::new(factory);
        self
    }

    /// Build the state.
    pub fn build(&self) -> Result<ObjectState> {
        let specification = self.class.require_specification()?;
        let tracker = PropertiesTracker::new(specification)?;

        let slots = specification
            .signals()
            .map(|s| (s.interface().into(), s.name().into()))
            .collect::<Vec<_>>();

        let signals = slots.iter().map(|_| OnceCell::new()).collect();

        Ok(ObjectState {
            class: self.class.clone(),
            tracker,
            factory: self.factory.clone(),
            slots,
            signals,
        })
    }
}

/// An object published over D-Bus.
///
/// Implementors provide the state of the object and access to its property
/// values. Property names are unique across the interfaces of an object, so
/// properties are addressed by name alone.
pub trait Object {
    /// The state of the object.
    fn state(&self) -> &ObjectState;

    /// Read the current value of a property.
    fn get(&self, name: &str) -> Result<Value>;

    /// Write a property.
    ///
    /// Implementations should report the change, or rely on the
    /// implementation they delegate to doing so.
    fn set(&self, name: &str, value: Value) -> Result<()> {
        let _ = value;
        Err(Error::new(ErrorKind::PropertyNotWritable(name.into())))
    }

    /// The class of the object.
    fn class(&self) -> &Arc<Class> {
        self.state().class()
    }

    /// The introspection data of the object, which is the reply to
    /// `org.freedesktop.DBus.Introspectable.Introspect`.
    fn introspect(&self) -> Result<&str> {
        xml_of(self.state().class())
    }

    /// Get a signal of the object.
    fn signal(&self, interface: &str, member: &str) -> Result<Rc<Signal<Body>>> {
        self.state().signal(interface, member)
    }

    /// Report that a property has changed.
    fn report_changed(&self, name: &str) -> Result<()> {
        self.state().tracker().report_changed(name)
    }

    /// Collect the pending property changes, reading their current values.
    fn flush(&self) -> Result<Vec<Batch>> {
        self.state().tracker().flush(|property| self.get(property.name()))
    }

    /// Flush pending property changes and emit one `PropertiesChanged`
    /// signal per changed interface.
    ///
    /// If reading a property fails nothing is emitted, and every change stays
    /// pending for the next flush.
    fn flush_changes(&self) -> Result<()> {
        let batches = self.flush()?;

        if batches.is_empty() {
            return Ok(());
        }

        let signal = self.signal(PROPERTIES, PROPERTIES_CHANGED)?;

        for batch in batches {
            signal.emit(&batch.body());
        }

        Ok(())
    }
}

/// Call `f` with the object, then emit the property changes it caused.
///
/// This is how methods which change properties are wrapped. If `f` fails
/// nothing is flushed.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
///
/// use dbus_publish::{
///     ClassBuilder, Function, Object, ObjectState, PropertyDecl, Result, Value,
///     emits_properties_changed,
/// };
///
/// struct Lamp {
///     state: ObjectState,
///     level: Cell<u8>,
/// }
///
/// impl Lamp {
///     fn dim(&self, level: u8) -> Result<()> {
///         self.level.set(level);
///         self.report_changed("Level")
///     }
/// }
///
/// impl Object for Lamp {
///     fn state(&self) -> &ObjectState {
///         &self.state
///     }
///
///     fn get(&self, _: &str) -> Result<Value> {
///         Ok(Value::from(self.level.get()))
///     }
/// }
///
/// let class = ClassBuilder::new("Lamp")
///     .property("Level", PropertyDecl::read::<u8>())
///     .method("Dim", Function::new().arg::<u8>("level"))
///     .declare_interface("org.example.Lamp")?;
///
/// let lamp = Lamp { state: ObjectState::new(&class)?, level: Cell::new(0) };
///
/// let changed = lamp.signal("org.freedesktop.DBus.Properties", "PropertiesChanged")?;
/// changed.connect(|body| println!("{body:?}"));
///
/// emits_properties_changed(&lamp, |lamp| lamp.dim(10))?;
/// assert!(!lamp.state().tracker().has_pending());
/// # Ok::<_, dbus_publish::Error>(())
/// ```
pub fn emits_properties_changed<O, F, T>(object: &O, f: F) -> Result<T>
where
    O: ?Sized + Object,
    F: FnOnce(&O) -> Result<T>,
{
    let output = f(object)?;
    object.flush_changes()?;
    Ok(output)
}
