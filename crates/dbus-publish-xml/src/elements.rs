use std::fmt;

use dbus_publish_core::proto::Access;
use dbus_publish_core::signature::Signature;
use indexmap::IndexMap;

use crate::error::ErrorKind;
use crate::{Error, Result};

/// Tag of the root element.
pub const NODE: &str = "node";
/// Tag of an interface element.
pub const INTERFACE: &str = "interface";
/// Tag of a method element.
pub const METHOD: &str = "method";
/// Tag of a signal element.
pub const SIGNAL: &str = "signal";
/// Tag of a property element.
pub const PROPERTY: &str = "property";
/// Tag of an argument element.
pub const ARG: &str = "arg";

/// The direction of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Input argument.
    In,
    /// Output argument.
    Out,
}

impl Direction {
    /// The value of the `direction` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// Parse the value of a `direction` attribute.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// A nested element.
    Element(Element),
    /// A comment.
    Comment(Box<str>),
    /// Non-whitespace text, trimmed.
    Text(Box<str>),
}

/// A single element in an introspection document.
///
/// Names are qualified, so an element written as `<doc:doc>` is named
/// `doc:doc` and is never mistaken for one of the D-Bus elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) name: Box<str>,
    pub(crate) attributes: Vec<(Box<str>, Box<str>)>,
    pub(crate) children: Vec<Child>,
}

impl Element {
    /// The qualified name of the element.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.name
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (&**k, &**v))
    }

    /// Every child of the element, including comments and text.
    #[inline]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Iterate over the child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Child::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Iterate over the comments directly inside of this element.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|child| match child {
            Child::Comment(text) => Some(&**text),
            _ => None,
        })
    }

    /// Test if this is the root `node` element.
    #[inline]
    pub fn is_node(&self) -> bool {
        *self.name == *NODE
    }

    /// Test if this is an `interface` element.
    #[inline]
    pub fn is_interface(&self) -> bool {
        *self.name == *INTERFACE
    }

    /// Test if this is a `method` element.
    #[inline]
    pub fn is_method(&self) -> bool {
        *self.name == *METHOD
    }

    /// Test if this is a `signal` element.
    #[inline]
    pub fn is_signal(&self) -> bool {
        *self.name == *SIGNAL
    }

    /// Test if this is a `property` element.
    #[inline]
    pub fn is_property(&self) -> bool {
        *self.name == *PROPERTY
    }

    /// Test if this is an `arg` element.
    #[inline]
    pub fn is_parameter(&self) -> bool {
        *self.name == *ARG
    }

    /// Test if this is a member of an interface, that is a method, a signal or
    /// a property.
    #[inline]
    pub fn is_member(&self) -> bool {
        self.is_method() || self.is_signal() || self.is_property()
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| **k == *name)
            .map(|(_, v)| &**v)
    }

    /// Get an attribute which is required to be present.
    pub fn required(&self, attribute: &'static str) -> Result<&str> {
        match self.attribute(attribute) {
            Some(value) => Ok(value),
            None => Err(Error::new(
                self.tag(),
                ErrorKind::MissingAttribute(attribute),
            )),
        }
    }

    /// The `name` attribute.
    #[inline]
    pub fn name(&self) -> Result<&str> {
        self.required("name")
    }

    /// The `name` attribute, or an empty string if it is absent.
    ///
    /// This is only appropriate for lookups by name, where a nameless element
    /// simply never matches.
    #[inline]
    pub fn name_or_empty(&self) -> &str {
        self.attribute("name").unwrap_or_default()
    }

    /// The `type` attribute, validated as a signature.
    pub fn ty(&self) -> Result<Signature> {
        let value = self.required("type")?;
        Signature::new(value).map_err(|error| Error::new(self.tag(), error))
    }

    /// The `access` attribute of a property.
    pub fn access(&self) -> Result<Access> {
        let value = self.required("access")?;

        match Access::parse(value) {
            Some(access) => Ok(access),
            None => Err(Error::new(
                self.tag(),
                ErrorKind::UnsupportedAccess(value.into()),
            )),
        }
    }

    /// The `direction` attribute of an argument.
    pub fn direction(&self) -> Result<Direction> {
        let value = self.required("direction")?;

        match Direction::parse(value) {
            Some(direction) => Ok(direction),
            None => Err(Error::new(
                self.tag(),
                ErrorKind::UnsupportedArgumentDirection(value.into()),
            )),
        }
    }

    /// Look up a member of this interface by name.
    pub fn member(&self, name: &str) -> Option<&Element> {
        self.elements()
            .find(|e| e.is_member() && e.name_or_empty() == name)
    }

    /// Collect the interfaces of a node by name.
    ///
    /// If two interfaces share a name, the later one overrides the earlier one
    /// while keeping the position of the first.
    pub fn interfaces(&self) -> Result<IndexMap<&str, &Element>> {
        let mut interfaces = IndexMap::new();

        for element in self.elements().filter(|e| e.is_interface()) {
            interfaces.insert(element.name()?, element);
        }

        Ok(interfaces)
    }
}
