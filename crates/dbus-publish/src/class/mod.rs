//! Classes, which declare the D-Bus interfaces of the objects built from
//! them.
//!
//! A [`Class`] is put together with a [`ClassBuilder`] which lists its bases
//! and attributes. Declaring an interface generates the introspection data of
//! the class once, which is then shared by every object of the class.

#[cfg(test)]
mod tests;

mod introspection;

use std::fmt;
use std::sync::Arc;

use dbus_publish_xml::{Element, XmlOptions};
use indexmap::IndexMap;

use crate::attribute::{Attribute, PropertyDecl, SignalDecl};
use crate::error::ErrorKind;
use crate::function::Function;
use crate::specification::Specification;
use crate::{Error, Result};

/// The introspection data attached to a declared class.
pub(crate) struct Declaration {
    pub(crate) node: Element,
    pub(crate) xml: Box<str>,
    pub(crate) specification: Specification,
}

/// A class.
pub struct Class {
    name: Box<str>,
    bases: Vec<Arc<Class>>,
    /// The method resolution order without the class itself.
    ancestors: Vec<Arc<Class>>,
    attributes: IndexMap<Box<str>, Attribute>,
    interface: Option<Box<str>>,
    declaration: Option<Declaration>,
}

impl Class {
    /// The name of the class.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The direct bases of the class.
    #[inline]
    pub fn bases(&self) -> &[Arc<Class>] {
        &self.bases
    }

    /// Iterate over the method resolution order, starting with this class and
    /// ending with its most basic ancestor.
    pub fn mro(&self) -> impl Iterator<Item = &Class> {
        std::iter::once(self).chain(self.ancestors.iter().map(|c| &**c))
    }

    /// The interface this class declared itself, if any.
    #[inline]
    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }

    /// The attributes declared directly on this class.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(name, a)| (&**name, a))
    }

    /// Look up an attribute along the method resolution order.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.mro().find_map(|c| c.attributes.get(name))
    }

    /// Test if `other` is this class or one of its ancestors.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.mro().any(|c| std::ptr::eq(c, other))
    }

    fn declaration(&self) -> Option<&Declaration> {
        self.mro().find_map(|c| c.declaration.as_ref())
    }

    /// The introspection data of the class, inherited from the nearest
    /// declared ancestor if the class wasn't declared itself.
    pub fn xml(&self) -> Option<&str> {
        Some(&self.declaration()?.xml)
    }

    /// The specification of the class, inherited the same way as
    /// [`Class::xml`].
    pub fn specification(&self) -> Option<&Specification> {
        Some(&self.declaration()?.specification)
    }

    pub(crate) fn require_specification(&self) -> Result<&Specification> {
        match self.specification() {
            Some(specification) => Ok(specification),
            None => Err(no_specification(self)),
        }
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("interface", &self.interface)
            .field("declared", &self.declaration.is_some())
            .finish_non_exhaustive()
    }
}

fn no_specification(class: &Class) -> Error {
    Error::new(ErrorKind::NoSpecificationAttached(class.name.clone()))
}

/// Get the introspection data attached to a class.
///
/// # Errors
///
/// Fails if neither the class nor any of its ancestors were declared.
///
/// # Examples
///
/// ```
/// use dbus_publish::{ClassBuilder, xml_of};
///
/// let plain = ClassBuilder::new("Plain").finish()?;
/// assert!(xml_of(&plain).is_err());
///
/// let declared = ClassBuilder::new("Declared").declare_interface("org.example.Declared")?;
/// assert!(xml_of(&declared)?.contains(r#"<interface name="org.example.Declared"/>"#));
/// # Ok::<_, dbus_publish::Error>(())
/// ```
pub fn xml_of(class: &Class) -> Result<&str> {
    match class.xml() {
        Some(xml) => Ok(xml),
        None => Err(no_specification(class)),
    }
}

/// Builder of a [`Class`].
///
/// # Examples
///
/// ```
/// use dbus_publish::{Attribute, ClassBuilder, Function, PropertyDecl, SignalDecl};
///
/// let class = ClassBuilder::new("Greeter")
///     .method("Hello", Function::new().arg::<String>("name").returns::<String>())
///     .signal("Greeted", SignalDecl::with_definition(Function::new().arg::<String>("name")))
///     .property("Greetings", PropertyDecl::read::<u32>())
///     .attribute("greet_later", Attribute::other("a private helper"))
///     .declare_interface("org.example.Greeter")?;
///
/// let specification = class.specification().expect("declared");
/// assert!(specification.contains("org.example.Greeter", "Hello"));
/// assert!(!specification.contains("org.example.Greeter", "greet_later"));
/// # Ok::<_, dbus_publish::Error>(())
/// ```
pub struct ClassBuilder {
    name: Box<str>,
    bases: Vec<Arc<Class>>,
    attributes: IndexMap<Box<str>, Attribute>,
    options: XmlOptions,
}

impl ClassBuilder {
    /// Construct a builder for a class named `name`, which is used in error
    /// messages and in the generated introspection data.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            attributes: IndexMap::new(),
            options: XmlOptions::new(),
        }
    }

    /// Add a base class.
    pub fn extends(&mut self, base: &Arc<Class>) -> &mut Self {
        self.bases.push(base.clone());
        self
    }

    /// Declare a method.
    pub fn method(&mut self, name: &str, function: Function) -> &mut Self {
        self.attribute(name, Attribute::Method(function))
    }

    /// Declare a signal.
    pub fn signal(&mut self, name: &str, signal: SignalDecl) -> &mut Self {
        self.attribute(name, Attribute::Signal(signal))
    }

    /// Declare a property.
    pub fn property(&mut self, name: &str, property: PropertyDecl) -> &mut Self {
        self.attribute(name, Attribute::Property(property))
    }

    /// Declare an attribute.
    ///
    /// Declaring the same name twice replaces the earlier declaration.
    pub fn attribute(&mut self, name: &str, attribute: Attribute) -> &mut Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Set how the introspection data is formatted.
    pub fn xml_options(&mut self, options: XmlOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Finish the class without attaching introspection data to it.
    pub fn finish(&self) -> Result<Arc<Class>> {
        Ok(Arc::new(self.build(None)?))
    }

    /// Finish the class, declaring that it implements the interface `name`
    /// through its exportable attributes.
    ///
    /// # Errors
    ///
    /// Fails if an exportable attribute can't be expressed over D-Bus.
    pub fn declare_interface(&self, name: &str) -> Result<Arc<Class>> {
        self.declare(Some(name))
    }

    /// Finish the class, attaching introspection data which combines the
    /// interfaces of its bases without declaring a new one.
    pub fn declare_class(&self) -> Result<Arc<Class>> {
        self.declare(None)
    }

    fn declare(&self, interface: Option<&str>) -> Result<Arc<Class>> {
        let mut class = self.build(interface)?;
        class.declaration = Some(introspection::generate(&class, &self.options)?);
        Ok(Arc::new(class))
    }

    fn build(&self, interface: Option<&str>) -> Result<Class> {
        Ok(Class {
            name: self.name.clone(),
            bases: self.bases.clone(),
            ancestors: linearize(&self.name, &self.bases)?,
            attributes: self.attributes.clone(),
            interface: interface.map(Box::from),
            declaration: None,
        })
    }
}

/// Compute the C3 linearization of a class with the given bases, excluding
/// the class itself.
fn linearize(name: &str, bases: &[Arc<Class>]) -> Result<Vec<Arc<Class>>> {
    let mut sequences = bases
        .iter()
        .map(|base| {
            let mut sequence = Vec::with_capacity(base.ancestors.len() + 1);
            sequence.push(base.clone());
            sequence.extend(base.ancestors.iter().cloned());
            sequence
        })
        .collect::<Vec<_>>();

    sequences.push(bases.to_vec());

    let mut output = Vec::new();

    loop {
        sequences.retain(|s| !s.is_empty());

        if sequences.is_empty() {
            return Ok(output);
        }

        // The first head which doesn't appear in the tail of any sequence.
        let head = sequences
            .iter()
            .map(|s| &s[0])
            .find(|head| {
                !sequences
                    .iter()
                    .any(|s| s[1..].iter().any(|c| Arc::ptr_eq(c, head)))
            })
            .cloned();

        let Some(head) = head else {
            return Err(Error::new(ErrorKind::InconsistentHierarchy(name.into())));
        };

        for sequence in &mut sequences {
            if Arc::ptr_eq(&sequence[0], &head) {
                sequence.remove(0);
            }
        }

        output.push(head);
    }
}
