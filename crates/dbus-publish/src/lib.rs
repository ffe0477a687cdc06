//! Publish objects over D-Bus by declaring their interfaces.
//!
//! A [`Class`] lists the methods, signals and properties an object exports.
//! Declaring an interface on it generates the introspection data once, which
//! every object of the class shares. Objects implement [`Object`] and use
//! their [`PropertiesTracker`] to coalesce property changes into
//! `PropertiesChanged` signals, one per changed interface.
//!
//! Objects which delegate to a separate implementation are built as
//! [`Template`]s.
//!
//! This crate doesn't talk to a bus. Connecting objects to a connection is up
//! to the caller.
//!
//! # Examples
//!
//! ```
//! use std::cell::Cell;
//!
//! use dbus_publish::{
//!     ClassBuilder, Function, Object, ObjectState, PropertyDecl, Result, Value, Variant,
//! };
//!
//! struct Counter {
//!     state: ObjectState,
//!     count: Cell<u32>,
//! }
//!
//! impl Object for Counter {
//!     fn state(&self) -> &ObjectState {
//!         &self.state
//!     }
//!
//!     fn get(&self, _: &str) -> Result<Value> {
//!         Ok(Value::from(self.count.get()))
//!     }
//! }
//!
//! let class = ClassBuilder::new("Counter")
//!     .property("Count", PropertyDecl::read::<u32>())
//!     .method("Increment", Function::new())
//!     .declare_interface("org.example.Counter")?;
//!
//! let counter = Counter {
//!     state: ObjectState::new(&class)?,
//!     count: Cell::new(0),
//! };
//!
//! counter.count.set(1);
//! counter.report_changed("Count")?;
//!
//! let batches = counter.flush()?;
//! assert_eq!(batches[0].interface(), "org.example.Counter");
//! assert_eq!(batches[0].changed()["Count"], Variant::from(1u32));
//! # Ok::<_, dbus_publish::Error>(())
//! ```

#[doc(inline)]
pub use dbus_publish_core::signature::{Signature, SignatureError};

pub use dbus_publish_xml::{Access, Direction, XmlOptions};

#[doc(inline)]
pub use self::error::{Category, Error, Result};
mod error;

#[doc(inline)]
pub use self::object_path::{ObjectPath, ObjectPathError};
mod object_path;

pub mod ty;

#[doc(inline)]
pub use self::value::{Array, Dict, Value};
mod value;

#[doc(inline)]
pub use self::variant::{Variant, as_variant};
mod variant;

#[doc(inline)]
pub use self::function::{Argument, Function, Param, ParamKind};
mod function;

#[doc(inline)]
pub use self::attribute::{Attribute, PropertyDecl, SignalDecl};
mod attribute;

pub mod org_freedesktop_dbus;

pub mod specification;

#[doc(inline)]
pub use self::specification::Specification;

#[doc(inline)]
pub use self::class::{Class, ClassBuilder, xml_of};
mod class;

#[doc(inline)]
pub use self::signal::{Signal, SignalFactory, SignalHandler};
pub mod signal;

#[doc(inline)]
pub use self::properties::{Batch, PropertiesTracker};
pub mod properties;

#[doc(inline)]
pub use self::object::{Object, ObjectState, ObjectStateBuilder, emits_properties_changed};
mod object;

#[doc(inline)]
pub use self::template::{InterfaceTemplate, Template, publish};
mod template;
