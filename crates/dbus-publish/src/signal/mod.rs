//! Signals connecting the implementation of an object to its observers.
//!
//! A [`Signal`] is a plain single-threaded observer list. Objects own one
//! signal per declared D-Bus signal, created through a [`SignalFactory`], and
//! implementations use them to announce changes to templates.

#[cfg(test)]
mod tests;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::Value;

/// The arguments of an emitted D-Bus signal.
pub type Body = Vec<Value>;

/// A handle to a connected callback, used to disconnect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalHandler(u64);

type Callback<A> = Rc<dyn Fn(&A)>;

/// A signal carrying arguments of type `A`.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use dbus_publish::Signal;
///
/// let signal = Signal::<u32>::new();
/// let total = Rc::new(Cell::new(0));
///
/// let handler = signal.connect({
///     let total = total.clone();
///     move |value| total.set(total.get() + *value)
/// });
///
/// signal.emit(&1);
/// signal.emit(&2);
/// assert!(signal.disconnect(handler));
/// signal.emit(&3);
///
/// assert_eq!(total.get(), 3);
/// ```
pub struct Signal<A = ()> {
    next: Cell<u64>,
    callbacks: RefCell<Vec<(SignalHandler, Callback<A>)>>,
}

impl<A> Signal<A> {
    /// Construct a signal with no callbacks.
    pub fn new() -> Self {
        Self {
            next: Cell::new(0),
            callbacks: RefCell::new(Vec::new()),
        }
    }

    /// Connect a callback.
    pub fn connect<F>(&self, callback: F) -> SignalHandler
    where
        F: 'static + Fn(&A),
    {
        let handler = SignalHandler(self.next.get());
        self.next.set(handler.0 + 1);
        self.callbacks
            .borrow_mut()
            .push((handler, Rc::new(callback)));
        handler
    }

    /// Disconnect a callback, returning `false` if it wasn't connected.
    pub fn disconnect(&self, handler: SignalHandler) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let len = callbacks.len();
        callbacks.retain(|(h, _)| *h != handler);
        callbacks.len() != len
    }

    /// Call every connected callback with `args`.
    ///
    /// Callbacks may connect and disconnect callbacks on this signal. Only the
    /// callbacks connected when the emission started are called.
    pub fn emit(&self, args: &A) {
        let callbacks = self
            .callbacks
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect::<Vec<_>>();

        for callback in callbacks {
            callback(args);
        }
    }

    /// The number of connected callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    /// Test if no callbacks are connected.
    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }
}

impl<A> Default for Signal<A> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("callbacks", &self.len())
            .finish()
    }
}

/// Creates the signals of an object.
///
/// Every object gets its own signals, created the first time they are used.
/// Closures taking the interface and the name of the signal implement this
/// trait.
pub trait SignalFactory {
    /// Create the signal `member` of `interface`.
    fn create(&self, interface: &str, member: &str) -> Rc<Signal<Body>>;
}

impl<F> SignalFactory for F
where
    F: Fn(&str, &str) -> Rc<Signal<Body>>,
{
    #[inline]
    fn create(&self, interface: &str, member: &str) -> Rc<Signal<Body>> {
        self(interface, member)
    }
}

/// The factory used unless another is configured, which creates plain
/// [`Signal`]s.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct DefaultSignalFactory;

impl SignalFactory for DefaultSignalFactory {
    #[inline]
    fn create(&self, _: &str, _: &str) -> Rc<Signal<Body>> {
        Rc::new(Signal::new())
    }
}
