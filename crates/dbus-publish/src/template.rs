//! Objects which delegate to a separate implementation.
//!
//! A template is the D-Bus facing side of an object. The implementation holds
//! the actual state and announces changes through its own [`Signal`]s, which
//! the template forwards to its property tracker.

use std::rc::Rc;
use std::sync::Arc;

use tracing::error;

use crate::class::Class;
use crate::object::{Object, ObjectState};
use crate::signal::{Signal, SignalHandler};
use crate::Result;

/// The state of a template, binding an [`ObjectState`] to an implementation.
#[derive(Debug)]
pub struct Template<I> {
    state: ObjectState,
    implementation: Rc<I>,
}

impl<I> Template<I> {
    /// Construct a template of the given class around an implementation.
    pub fn new(class: &Arc<Class>, implementation: Rc<I>) -> Result<Self> {
        Ok(Self::with_state(ObjectState::new(class)?, implementation))
    }

    /// Construct a template with a preconfigured state.
    pub fn with_state(state: ObjectState, implementation: Rc<I>) -> Self {
        Self {
            state,
            implementation,
        }
    }

    /// The object state.
    #[inline]
    pub fn state(&self) -> &ObjectState {
        &self.state
    }

    /// The implementation.
    #[inline]
    pub fn implementation(&self) -> &Rc<I> {
        &self.implementation
    }
}

/// An object built around a [`Template`].
///
/// Templates are published with [`publish`], which calls
/// [`connect_signals`](InterfaceTemplate::connect_signals) once the template
/// is shared. Callbacks only hold weak references to the template, and do
/// nothing once the published object is dropped.
pub trait InterfaceTemplate: Object + Sized + 'static {
    /// The type of the implementation.
    type Implementation;

    /// The template.
    fn template(&self) -> &Template<Self::Implementation>;

    /// The implementation.
    fn implementation(&self) -> &Self::Implementation {
        self.template().implementation()
    }

    /// Connect the signals of the implementation.
    ///
    /// This is where [`watch_property`](Self::watch_property) and
    /// [`connect_flush`](Self::connect_flush) are called. Does nothing by
    /// default.
    fn connect_signals(this: &Rc<Self>) -> Result<()> {
        let _ = this;
        Ok(())
    }

    /// Report the property `name` as changed whenever `signal` is emitted.
    ///
    /// # Errors
    ///
    /// Fails if the object has no property named `name`.
    fn watch_property<A>(this: &Rc<Self>, name: &str, signal: &Signal<A>) -> Result<SignalHandler>
    where
        A: 'static,
    {
        this.state().tracker().validate(name)?;

        let this = Rc::downgrade(this);
        let name = Box::<str>::from(name);

        Ok(signal.connect(move |_| {
            if let Some(this) = this.upgrade() {
                this.state().tracker().mark(&name);
            }
        }))
    }

    /// Flush property changes whenever `signal` is emitted.
    ///
    /// Nothing can receive errors raised while flushing, so they are logged.
    fn connect_flush<A>(this: &Rc<Self>, signal: &Signal<A>) -> SignalHandler
    where
        A: 'static,
    {
        let this = Rc::downgrade(this);

        signal.connect(move |_| {
            let Some(this) = this.upgrade() else {
                return;
            };

            if let Err(e) = this.flush_changes() {
                error!("Failed to flush properties of {}: {e}", this.class().name());
            }
        })
    }
}

/// Share a template and connect it to its implementation.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use dbus_publish::{
///     ClassBuilder, InterfaceTemplate, Object, ObjectState, PropertyDecl, Result, Signal,
///     Template, Value, publish,
/// };
///
/// #[derive(Default)]
/// struct Sensor {
///     reading: Cell<i32>,
///     reading_changed: Signal,
///     updated: Signal,
/// }
///
/// struct SensorInterface(Template<Sensor>);
///
/// impl Object for SensorInterface {
///     fn state(&self) -> &ObjectState {
///         self.0.state()
///     }
///
///     fn get(&self, _: &str) -> Result<Value> {
///         Ok(Value::from(self.implementation().reading.get()))
///     }
/// }
///
/// impl InterfaceTemplate for SensorInterface {
///     type Implementation = Sensor;
///
///     fn template(&self) -> &Template<Sensor> {
///         &self.0
///     }
///
///     fn connect_signals(this: &Rc<Self>) -> Result<()> {
///         let sensor = this.implementation();
///         Self::watch_property(this, "Reading", &sensor.reading_changed)?;
///         Self::connect_flush(this, &sensor.updated);
///         Ok(())
///     }
/// }
///
/// let class = ClassBuilder::new("SensorInterface")
///     .property("Reading", PropertyDecl::read::<i32>())
///     .declare_interface("org.example.Sensor")?;
///
/// let sensor = Rc::new(Sensor::default());
/// let object = publish(SensorInterface(Template::new(&class, sensor.clone())?))?;
///
/// sensor.reading.set(21);
/// sensor.reading_changed.emit(&());
/// assert!(object.state().tracker().is_pending("Reading"));
///
/// sensor.updated.emit(&());
/// assert!(!object.state().tracker().has_pending());
/// # Ok::<_, dbus_publish::Error>(())
/// ```
pub fn publish<T>(template: T) -> Result<Rc<T>>
where
    T: InterfaceTemplate,
{
    let this = Rc::new(template);
    T::connect_signals(&this)?;
    Ok(this)
}
