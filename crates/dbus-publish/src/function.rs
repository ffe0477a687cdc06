//! Signatures of exported functions.
//!
//! A [`Function`] describes the parameters and the return value of a method,
//! a signal definition or a property accessor. The receiver is implicit and
//! never listed.

use std::any::type_name;
use std::fmt;

use dbus_publish_core::signature::{Signature, SignatureError};
use dbus_publish_xml::Direction;

use crate::error::ErrorKind;
use crate::ty::{self, Type};
use crate::{Error, Result};

/// How a parameter may be passed.
///
/// D-Bus arguments are positional, so only
/// [`ParamKind::PositionalOrKeyword`] parameters can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// A parameter that can only be passed by position.
    PositionalOnly,
    /// A plain parameter.
    PositionalOrKeyword,
    /// A parameter collecting any number of positional arguments.
    VarPositional,
    /// A parameter that can only be passed by name.
    KeywordOnly,
    /// A parameter collecting any number of named arguments.
    VarKeyword,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::PositionalOnly => write!(f, "positional-only"),
            ParamKind::PositionalOrKeyword => write!(f, "positional-or-keyword"),
            ParamKind::VarPositional => write!(f, "var-positional"),
            ParamKind::KeywordOnly => write!(f, "keyword-only"),
            ParamKind::VarKeyword => write!(f, "var-keyword"),
        }
    }
}

/// A type annotation whose signature failed to map is kept around and only
/// reported when the function is exported.
#[derive(Debug, Clone)]
enum Annotation {
    Type(Signature),
    Unsupported { name: Box<str>, error: SignatureError },
}

impl Annotation {
    fn of<T>() -> Self
    where
        T: ?Sized + Type,
    {
        match ty::build::<T>() {
            Ok(signature) => Annotation::Type(signature),
            Err(error) => Annotation::Unsupported {
                name: type_name::<T>().into(),
                error,
            },
        }
    }

    fn signature(&self) -> Result<&Signature> {
        match self {
            Annotation::Type(signature) => Ok(signature),
            Annotation::Unsupported { name, error } => {
                Err(Error::new(ErrorKind::UnsupportedType {
                    ty: name.clone(),
                    error: error.clone(),
                }))
            }
        }
    }
}

/// A single declared parameter.
#[derive(Debug, Clone)]
pub struct Param {
    name: Box<str>,
    kind: ParamKind,
    ty: Option<Annotation>,
}

impl Param {
    /// The name of the parameter.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of the parameter.
    #[inline]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Test if the parameter has a type.
    #[inline]
    pub fn is_typed(&self) -> bool {
        self.ty.is_some()
    }
}

/// The declared return value of a [`Function`].
#[derive(Debug, Clone)]
enum Returns {
    /// Nothing was declared.
    Unannotated,
    /// Declared as returning the unit type.
    Unit,
    Type(Annotation),
}

/// A single exported argument, as produced by [`Function::arguments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// The name of the argument.
    pub name: Box<str>,
    /// The type of the argument.
    pub ty: Signature,
    /// Whether the argument is passed in or returned.
    pub direction: Direction,
}

/// The name of the argument produced by a return value.
const RETURN: &str = "return";

/// The signature of an exported function.
///
/// # Examples
///
/// ```
/// use dbus_publish::{Direction, Function};
///
/// let function = Function::new()
///     .arg::<String>("name")
///     .arg::<u32>("flags")
///     .returns::<bool>();
///
/// let arguments = function.arguments("Hello")?;
/// assert_eq!(arguments.len(), 3);
/// assert_eq!(&*arguments[2].name, "return");
/// assert_eq!(arguments[2].direction, Direction::Out);
/// # Ok::<_, dbus_publish::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Function {
    params: Vec<Param>,
    returns: Returns,
}

impl Function {
    /// Construct a function with no parameters and no declared return.
    pub const fn new() -> Self {
        Self {
            params: Vec::new(),
            returns: Returns::Unannotated,
        }
    }

    /// Add a typed positional parameter.
    pub fn arg<T>(self, name: &str) -> Self
    where
        T: ?Sized + Type,
    {
        self.param::<T>(name, ParamKind::PositionalOrKeyword)
    }

    /// Add a positional parameter with a signature written out by hand.
    ///
    /// An invalid signature is reported once the function is exported.
    pub fn arg_with_signature(mut self, name: &str, signature: &str) -> Self {
        let ty = match Signature::new(signature) {
            Ok(signature) => Annotation::Type(signature),
            Err(error) => Annotation::Unsupported {
                name: signature.into(),
                error,
            },
        };

        self.params.push(Param {
            name: name.into(),
            kind: ParamKind::PositionalOrKeyword,
            ty: Some(ty),
        });

        self
    }

    /// Add a typed parameter of the given kind.
    pub fn param<T>(mut self, name: &str, kind: ParamKind) -> Self
    where
        T: ?Sized + Type,
    {
        self.params.push(Param {
            name: name.into(),
            kind,
            ty: Some(Annotation::of::<T>()),
        });

        self
    }

    /// Add a parameter without a type.
    pub fn untyped(mut self, name: &str, kind: ParamKind) -> Self {
        self.params.push(Param {
            name: name.into(),
            kind,
            ty: None,
        });

        self
    }

    /// Declare the return type.
    ///
    /// Declaring `()` is the same as returning nothing.
    pub fn returns<T>(mut self) -> Self
    where
        T: ?Sized + Type,
    {
        self.returns = match Annotation::of::<T>() {
            Annotation::Type(signature) if signature.is_empty() => Returns::Unit,
            annotation => Returns::Type(annotation),
        };

        self
    }

    /// Declare the return type with a signature written out by hand.
    pub fn returns_signature(mut self, signature: &str) -> Self {
        self.returns = match Signature::new(signature) {
            Ok(signature) if signature.is_empty() => Returns::Unit,
            Ok(signature) => Returns::Type(Annotation::Type(signature)),
            Err(error) => Returns::Type(Annotation::Unsupported {
                name: signature.into(),
                error,
            }),
        };

        self
    }

    /// The declared parameters.
    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Test if the function declares a return value.
    pub fn has_return(&self) -> bool {
        matches!(self.returns, Returns::Type(..))
    }

    /// Walk the parameters and the return value of the function.
    ///
    /// Every parameter produces an argument with [`Direction::In`]. A declared
    /// return value adds a final argument named `return` with
    /// [`Direction::Out`].
    ///
    /// Fails if a parameter isn't positional-or-keyword, or if it is untyped.
    /// `function` names the function in errors.
    pub fn arguments(&self, function: &str) -> Result<Vec<Argument>> {
        let mut arguments = Vec::with_capacity(self.params.len() + 1);

        for param in &self.params {
            if param.kind != ParamKind::PositionalOrKeyword {
                return Err(Error::new(ErrorKind::BadParameterKind {
                    function: function.into(),
                    parameter: param.name.clone(),
                    kind: param.kind,
                }));
            }

            let Some(ty) = &param.ty else {
                return Err(Error::new(ErrorKind::UntypedParameter {
                    function: function.into(),
                    parameter: param.name.clone(),
                }));
            };

            arguments.push(Argument {
                name: param.name.clone(),
                ty: ty.signature()?.clone(),
                direction: Direction::In,
            });
        }

        if let Returns::Type(ty) = &self.returns {
            arguments.push(Argument {
                name: RETURN.into(),
                ty: ty.signature()?.clone(),
                direction: Direction::Out,
            });
        }

        Ok(arguments)
    }
}

impl Default for Function {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
