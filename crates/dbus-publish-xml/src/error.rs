use std::error;
use std::fmt;

use dbus_publish_core::signature::SignatureError;

/// Result alias defaulting to the error type of this alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error raised by this crate.
///
/// The error carries the path to the element which caused it, like
/// `node/interface/method`.
#[derive(Debug)]
pub struct Error {
    path: Box<str>,
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new<P, K>(path: P, kind: K) -> Self
    where
        Box<str>: From<P>,
        ErrorKind: From<K>,
    {
        Self {
            path: path.into(),
            kind: kind.into(),
        }
    }

    /// The path to the element which caused the error.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Test if the error is caused by malformed XML, as opposed to a well
    /// formed document with missing or invalid attributes.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::XmlParser(..)
                | ErrorKind::Escape(..)
                | ErrorKind::MismatchingEnd { .. }
                | ErrorKind::UnsupportedElementEnd
                | ErrorKind::UnclosedElement(..)
                | ErrorKind::UnsupportedText
                | ErrorKind::MultipleRoots
                | ErrorKind::MissingRoot
        )
    }

    /// If the error is caused by a missing attribute, get the name of the
    /// attribute.
    pub fn missing_attribute(&self) -> Option<&'static str> {
        match self.kind {
            ErrorKind::MissingAttribute(attribute) => Some(attribute),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            self.kind.fmt(f)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::XmlParser(error) => Some(error),
            ErrorKind::Signature(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    XmlParser(xmlparser::Error),
    Signature(SignatureError),
    Escape(Box<str>),
    Write(Box<str>),
    NotUtf8,
    UnsupportedElementEnd,
    UnclosedElement(Box<str>),
    UnsupportedText,
    MultipleRoots,
    MissingRoot,
    MismatchingEnd {
        expected: Box<str>,
        actual: Box<str>,
    },
    MissingAttribute(&'static str),
    UnsupportedArgumentDirection(Box<str>),
    UnsupportedAccess(Box<str>),
}

impl From<xmlparser::Error> for ErrorKind {
    #[inline]
    fn from(error: xmlparser::Error) -> Self {
        ErrorKind::XmlParser(error)
    }
}

impl From<SignatureError> for ErrorKind {
    #[inline]
    fn from(error: SignatureError) -> Self {
        ErrorKind::Signature(error)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::XmlParser(error) => error.fmt(f),
            ErrorKind::Signature(error) => error.fmt(f),
            ErrorKind::Escape(error) => write!(f, "Bad escape sequence: {error}"),
            ErrorKind::Write(error) => write!(f, "Failed to write XML: {error}"),
            ErrorKind::NotUtf8 => write!(f, "Written XML is not UTF-8"),
            ErrorKind::UnsupportedElementEnd => write!(f, "Unsupported element end"),
            ErrorKind::UnclosedElement(name) => write!(f, "Element `{name}` is never closed"),
            ErrorKind::UnsupportedText => write!(f, "Unsupported text"),
            ErrorKind::MultipleRoots => write!(f, "Document has more than one root element"),
            ErrorKind::MissingRoot => write!(f, "Document has no root element"),
            ErrorKind::MismatchingEnd { expected, actual } => {
                write!(f, "Mismatching end: expected {expected}, found {actual}")
            }
            ErrorKind::MissingAttribute(attribute) => {
                write!(f, "Missing attribute `{attribute}`")
            }
            ErrorKind::UnsupportedArgumentDirection(value) => {
                write!(f, "Unsupported argument direction `{value}`")
            }
            ErrorKind::UnsupportedAccess(value) => {
                write!(f, "Unsupported property access `{value}`")
            }
        }
    }
}
