//! Reader and writer for D-Bus introspection documents.
//!
//! The document is modelled as a plain element tree. Reading only checks that
//! the document is well formed, while the accessors on [`Element`] check for
//! the attributes which the D-Bus elements require.
//!
//! # Examples
//!
//! ```
//! use dbus_publish_xml::{Direction, Element};
//! use dbus_publish_core::signature::Signature;
//!
//! let mut method = Element::method("Hello");
//! method.push(Element::parameter("name", &Signature::STRING, Some(Direction::In)));
//!
//! let mut interface = Element::interface("org.example.Greeter");
//! interface.push(method);
//!
//! let mut node = Element::node();
//! node.push(interface);
//!
//! let xml = dbus_publish_xml::serialize(&node)?;
//! let parsed = dbus_publish_xml::parse(&xml)?;
//! assert_eq!(parsed, node);
//! # Ok::<_, dbus_publish_xml::Error>(())
//! ```


pub use dbus_publish_core::proto::Access;

pub use self::error::{Error, Result};
mod error;

pub use self::elements::{ARG, Child, Direction, Element, INTERFACE, METHOD, NODE, PROPERTY, SIGNAL};
mod elements;

pub use self::parser::parse;
mod parser;

pub use self::writer::{XmlOptions, normalize, serialize, serialize_with};
mod writer;
