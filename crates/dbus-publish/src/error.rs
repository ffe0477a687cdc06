use std::error;
use std::fmt;

use dbus_publish_core::signature::{Signature, SignatureError};

use crate::ObjectPathError;
use crate::function::ParamKind;

/// Result alias using an [`Error`] as the error type by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Category {
    /// A class could not be declared, raised while generating its
    /// introspection data or when constructing its property tracker.
    Specification,
    /// Introspection data could not be read, or a member could not be found in
    /// it.
    Introspection,
    /// A property or signal was accessed in a way its declaration doesn't
    /// permit.
    Properties,
    /// Introspection data was requested for a class which was never declared.
    NoSpecification,
    /// A failure reported by an object implementation.
    Failed,
}

/// An error raised by this crate.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    #[inline]
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Self { kind }
    }

    /// Construct an error which signals that an object implementation failed,
    /// such as a property getter which currently can't produce a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_publish::{Category, Error};
    ///
    /// let error = Error::failed("device is gone");
    /// assert_eq!(error.category(), Category::Failed);
    /// assert_eq!(error.to_string(), "device is gone");
    /// ```
    pub fn failed(message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Failed(message.to_string().into()))
    }

    #[cfg(test)]
    pub(crate) fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The category of the error.
    pub fn category(&self) -> Category {
        match &self.kind {
            ErrorKind::UnexportableMember { .. }
            | ErrorKind::BadParameterKind { .. }
            | ErrorKind::UntypedParameter { .. }
            | ErrorKind::PropertyNotAccessible(..)
            | ErrorKind::UndefinedPropertyType(..)
            | ErrorKind::SignalWithReturn(..)
            | ErrorKind::AmbiguousProperty { .. }
            | ErrorKind::UnsupportedType { .. }
            | ErrorKind::UnsupportedArguments { .. }
            | ErrorKind::InconsistentHierarchy(..) => Category::Specification,
            ErrorKind::Xml(..)
            | ErrorKind::BadArguments { .. }
            | ErrorKind::UnknownMember { .. }
            | ErrorKind::UnknownSignal(..) => Category::Introspection,
            ErrorKind::UnknownProperty(..)
            | ErrorKind::UnknownInterface(..)
            | ErrorKind::SignalNotWritable(..)
            | ErrorKind::PropertyNotReadable(..)
            | ErrorKind::PropertyNotWritable(..)
            | ErrorKind::TypeMismatch { .. }
            | ErrorKind::ObjectPath(..) => Category::Properties,
            ErrorKind::NoSpecificationAttached(..) => Category::NoSpecification,
            ErrorKind::Failed(..) => Category::Failed,
        }
    }
}

impl From<dbus_publish_xml::Error> for Error {
    #[inline]
    fn from(error: dbus_publish_xml::Error) -> Self {
        Self::new(ErrorKind::Xml(error))
    }
}

impl From<ObjectPathError> for Error {
    #[inline]
    fn from(error: ObjectPathError) -> Self {
        Self::new(ErrorKind::ObjectPath(error))
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnexportableMember { class, member } => {
                write!(f, "Member {class}.{member} can't be exported over D-Bus")
            }
            ErrorKind::BadParameterKind {
                function,
                parameter,
                kind,
            } => {
                write!(
                    f,
                    "Parameter `{parameter}` of {function} is {kind}, only positional-or-keyword parameters are supported"
                )
            }
            ErrorKind::UntypedParameter {
                function,
                parameter,
            } => {
                write!(f, "Parameter `{parameter}` of {function} has no type")
            }
            ErrorKind::PropertyNotAccessible(name) => {
                write!(f, "Property {name} has neither a getter nor a setter")
            }
            ErrorKind::UndefinedPropertyType(name) => {
                write!(f, "Type of property {name} is undefined")
            }
            ErrorKind::SignalWithReturn(name) => {
                write!(f, "Signal {name} can't have a return value")
            }
            ErrorKind::AmbiguousProperty {
                name,
                first,
                second,
            } => {
                write!(
                    f,
                    "Property {name} is defined by both {first} and {second}"
                )
            }
            ErrorKind::UnsupportedType { ty, .. } => {
                write!(f, "Type `{ty}` has no D-Bus signature")
            }
            ErrorKind::InconsistentHierarchy(class) => {
                write!(f, "Bases of {class} have no consistent resolution order")
            }
            ErrorKind::Xml(error) => write!(f, "Introspection data error: {error}"),
            ErrorKind::UnsupportedArguments { member, .. } => {
                write!(f, "Arguments of {member} are too large for a D-Bus signature")
            }
            ErrorKind::BadArguments { member, .. } => {
                write!(f, "Arguments of {member} don't form a valid signature")
            }
            ErrorKind::UnknownMember { interface, member } => {
                write!(f, "Unknown member {interface}.{member}")
            }
            ErrorKind::UnknownSignal(name) => write!(f, "Unknown signal {name}"),
            ErrorKind::UnknownProperty(name) => write!(f, "Unknown property {name}"),
            ErrorKind::UnknownInterface(name) => write!(f, "Unknown interface {name}"),
            ErrorKind::SignalNotWritable(name) => {
                write!(f, "Signal {name} can't be assigned to")
            }
            ErrorKind::PropertyNotReadable(name) => {
                write!(f, "Property {name} is not readable")
            }
            ErrorKind::PropertyNotWritable(name) => {
                write!(f, "Property {name} is not writable")
            }
            ErrorKind::TypeMismatch { expected, actual } => {
                write!(f, "Expected a value of type `{expected}`, found `{actual}`")
            }
            ErrorKind::ObjectPath(..) => write!(f, "ObjectPath error"),
            ErrorKind::NoSpecificationAttached(class) => {
                write!(f, "No introspection data is attached to {class}")
            }
            ErrorKind::Failed(message) => f.write_str(message),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Xml(error) => Some(error),
            ErrorKind::UnsupportedType { error, .. } => Some(error),
            ErrorKind::BadArguments { error, .. } => Some(error),
            ErrorKind::UnsupportedArguments { error, .. } => Some(error),
            ErrorKind::ObjectPath(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) enum ErrorKind {
    UnexportableMember {
        class: Box<str>,
        member: Box<str>,
    },
    BadParameterKind {
        function: Box<str>,
        parameter: Box<str>,
        kind: ParamKind,
    },
    UntypedParameter {
        function: Box<str>,
        parameter: Box<str>,
    },
    PropertyNotAccessible(Box<str>),
    UndefinedPropertyType(Box<str>),
    SignalWithReturn(Box<str>),
    AmbiguousProperty {
        name: Box<str>,
        first: Box<str>,
        second: Box<str>,
    },
    UnsupportedType {
        ty: Box<str>,
        error: SignatureError,
    },
    UnsupportedArguments {
        member: Box<str>,
        error: SignatureError,
    },
    InconsistentHierarchy(Box<str>),
    Xml(dbus_publish_xml::Error),
    BadArguments {
        member: Box<str>,
        error: SignatureError,
    },
    UnknownMember {
        interface: Box<str>,
        member: Box<str>,
    },
    UnknownSignal(Box<str>),
    UnknownProperty(Box<str>),
    UnknownInterface(Box<str>),
    SignalNotWritable(Box<str>),
    PropertyNotReadable(Box<str>),
    PropertyNotWritable(Box<str>),
    TypeMismatch {
        expected: Signature,
        actual: Signature,
    },
    ObjectPath(ObjectPathError),
    NoSpecificationAttached(Box<str>),
    Failed(Box<str>),
}
