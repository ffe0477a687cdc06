//! Declarations of the attributes of a class.

use crate::function::Function;
use crate::ty::Type;

/// The declaration of a signal.
///
/// A signal without a definition carries no payload. Otherwise the parameters
/// of the definition give the types of its arguments.
#[derive(Debug, Clone, Default)]
pub struct SignalDecl {
    definition: Option<Function>,
}

impl SignalDecl {
    /// Declare a signal without a payload.
    pub const fn new() -> Self {
        Self { definition: None }
    }

    /// Declare a signal whose arguments are the parameters of `definition`.
    pub fn with_definition(definition: Function) -> Self {
        Self {
            definition: Some(definition),
        }
    }

    /// The definition of the signal, if any.
    #[inline]
    pub fn definition(&self) -> Option<&Function> {
        self.definition.as_ref()
    }
}

/// The declaration of a property through its accessors.
///
/// # Examples
///
/// ```
/// use dbus_publish::{Function, PropertyDecl};
///
/// let read_only = PropertyDecl::read::<u32>();
/// assert!(read_only.getter().is_some());
/// assert!(read_only.setter().is_none());
///
/// let custom = PropertyDecl::new().with_setter(Function::new().arg::<String>("value"));
/// assert!(custom.getter().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyDecl {
    getter: Option<Function>,
    setter: Option<Function>,
}

impl PropertyDecl {
    /// A property with no accessors.
    ///
    /// Exporting it fails unless an accessor is added.
    pub const fn new() -> Self {
        Self {
            getter: None,
            setter: None,
        }
    }

    /// A readable property of type `T`.
    pub fn read<T>() -> Self
    where
        T: ?Sized + Type,
    {
        Self::new().with_getter(getter::<T>())
    }

    /// A writable property of type `T`.
    pub fn write<T>() -> Self
    where
        T: ?Sized + Type,
    {
        Self::new().with_setter(setter::<T>())
    }

    /// A readable and writable property of type `T`.
    pub fn read_write<T>() -> Self
    where
        T: ?Sized + Type,
    {
        Self::new()
            .with_getter(getter::<T>())
            .with_setter(setter::<T>())
    }

    /// Set the getter.
    pub fn with_getter(mut self, getter: Function) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Set the setter.
    pub fn with_setter(mut self, setter: Function) -> Self {
        self.setter = Some(setter);
        self
    }

    /// The getter, if the property is readable.
    #[inline]
    pub fn getter(&self) -> Option<&Function> {
        self.getter.as_ref()
    }

    /// The setter, if the property is writable.
    #[inline]
    pub fn setter(&self) -> Option<&Function> {
        self.setter.as_ref()
    }
}

fn getter<T>() -> Function
where
    T: ?Sized + Type,
{
    Function::new().returns::<T>()
}

fn setter<T>() -> Function
where
    T: ?Sized + Type,
{
    Function::new().arg::<T>("value")
}

/// An attribute of a class.
#[derive(Debug, Clone)]
pub enum Attribute {
    /// A method.
    Method(Function),
    /// A signal.
    Signal(SignalDecl),
    /// A property.
    Property(PropertyDecl),
    /// Anything else, which can't be exported.
    Other(Box<str>),
}

impl Attribute {
    /// Declare a method.
    #[inline]
    pub fn method(function: Function) -> Self {
        Self::Method(function)
    }

    /// Declare a signal.
    #[inline]
    pub fn signal(signal: SignalDecl) -> Self {
        Self::Signal(signal)
    }

    /// Declare a property.
    #[inline]
    pub fn property(property: PropertyDecl) -> Self {
        Self::Property(property)
    }

    /// Declare an attribute which is neither, described by `description`.
    #[inline]
    pub fn other(description: &str) -> Self {
        Self::Other(description.into())
    }
}
