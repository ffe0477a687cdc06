//! The structured model of the interfaces an object implements.

#[cfg(test)]
mod tests;

use dbus_publish_core::signature::{Signature, SignatureBuilder, SignatureError};
use dbus_publish_xml::{Access, Direction, Element};
use indexmap::{Equivalent, IndexMap, IndexSet};

use crate::error::ErrorKind;
use crate::org_freedesktop_dbus;
use crate::{Error, Result};

/// A method record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    name: Box<str>,
    interface: Box<str>,
    in_type: Option<Signature>,
    out_type: Option<Signature>,
}

impl Method {
    /// Construct a new method record.
    pub fn new(
        interface: &str,
        name: &str,
        in_type: Option<Signature>,
        out_type: Option<Signature>,
    ) -> Self {
        Self {
            name: name.into(),
            interface: interface.into(),
            in_type,
            out_type,
        }
    }

    /// The name of the method.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The interface the method belongs to.
    #[inline]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// The struct type of the input arguments, if there are any.
    #[inline]
    pub fn in_type(&self) -> Option<&Signature> {
        self.in_type.as_ref()
    }

    /// The struct type of the output arguments, if there are any.
    #[inline]
    pub fn out_type(&self) -> Option<&Signature> {
        self.out_type.as_ref()
    }
}

/// A signal record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    name: Box<str>,
    interface: Box<str>,
    ty: Option<Signature>,
}

impl Signal {
    /// Construct a new signal record.
    pub fn new(interface: &str, name: &str, ty: Option<Signature>) -> Self {
        Self {
            name: name.into(),
            interface: interface.into(),
            ty,
        }
    }

    /// The name of the signal.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The interface the signal belongs to.
    #[inline]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// The struct type of the payload, if there is one.
    #[inline]
    pub fn ty(&self) -> Option<&Signature> {
        self.ty.as_ref()
    }
}

/// A property record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: Box<str>,
    interface: Box<str>,
    access: Access,
    ty: Signature,
}

impl Property {
    /// Construct a new property record.
    pub fn new(interface: &str, name: &str, access: Access, ty: Signature) -> Self {
        Self {
            name: name.into(),
            interface: interface.into(),
            access,
            ty,
        }
    }

    /// The name of the property.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The interface the property belongs to.
    #[inline]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// How the property can be accessed.
    #[inline]
    pub fn access(&self) -> Access {
        self.access
    }

    /// Test if the property can be read.
    #[inline]
    pub fn readable(&self) -> bool {
        self.access.is_readable()
    }

    /// Test if the property can be written.
    #[inline]
    pub fn writable(&self) -> bool {
        self.access.is_writable()
    }

    /// The type of the property.
    #[inline]
    pub fn ty(&self) -> &Signature {
        &self.ty
    }
}

/// A member of an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// A method.
    Method(Method),
    /// A signal.
    Signal(Signal),
    /// A property.
    Property(Property),
}

impl Member {
    /// The name of the member.
    pub fn name(&self) -> &str {
        match self {
            Member::Method(m) => m.name(),
            Member::Signal(s) => s.name(),
            Member::Property(p) => p.name(),
        }
    }

    /// The interface of the member.
    pub fn interface(&self) -> &str {
        match self {
            Member::Method(m) => m.interface(),
            Member::Signal(s) => s.interface(),
            Member::Property(p) => p.interface(),
        }
    }
}

/// The interfaces and members of an object, in the order they were added.
///
/// # Examples
///
/// ```
/// use dbus_publish::specification::{Member, Specification};
///
/// let specification = Specification::from_xml(r#"
/// <node>
///   <interface name="org.example.Chat">
///     <method name="Send">
///       <arg name="text" type="s" direction="in"/>
///       <arg name="id" type="u" direction="out"/>
///     </method>
///     <property name="Topic" type="s" access="readwrite"/>
///   </interface>
/// </node>
/// "#)?;
///
/// let Member::Method(send) = specification.get_member("org.example.Chat", "Send")? else {
///     panic!("not a method");
/// };
///
/// assert_eq!(send.in_type().map(|s| s.as_str()), Some("(s)"));
/// assert_eq!(send.out_type().map(|s| s.as_str()), Some("(u)"));
/// assert_eq!(specification.interfaces().count(), 4);
/// # Ok::<_, dbus_publish::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specification {
    interfaces: IndexSet<Box<str>>,
    members: IndexMap<(Box<str>, Box<str>), Member>,
}

impl Specification {
    /// Construct an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a specification out of an introspection document.
    ///
    /// The standard interfaces are always added first. Elements other than
    /// the D-Bus members, like annotations and documentation, are ignored.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let node = dbus_publish_xml::parse(xml)?;
        Self::from_node(&node)
    }

    /// Build a specification out of a parsed `node` element.
    pub fn from_node(node: &Element) -> Result<Self> {
        let mut this = Self::new();

        for interface in org_freedesktop_dbus::interfaces() {
            this.add_interface(&interface)?;
        }

        for (_, interface) in node.interfaces()? {
            this.add_interface(interface)?;
        }

        Ok(this)
    }

    fn add_interface(&mut self, interface: &Element) -> Result<()> {
        let interface_name = interface.name()?;
        self.interfaces.insert(interface_name.into());

        for element in interface.elements() {
            let member = if element.is_method() {
                Member::Method(parse_method(interface_name, element)?)
            } else if element.is_signal() {
                Member::Signal(parse_signal(interface_name, element)?)
            } else if element.is_property() {
                Member::Property(Property::new(
                    interface_name,
                    element.name()?,
                    element.access()?,
                    element.ty()?,
                ))
            } else {
                continue;
            };

            self.add_member(member);
        }

        Ok(())
    }

    /// Iterate over the distinct interface names in the order first seen.
    ///
    /// This includes interfaces without any members.
    pub fn interfaces(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(|name| &**name)
    }

    /// Test if the interface `name` is part of the specification.
    pub fn contains_interface(&self, name: &str) -> bool {
        self.interfaces.contains(name)
    }

    /// Iterate over all members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Iterate over all properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.members.values().filter_map(|m| match m {
            Member::Property(p) => Some(p),
            _ => None,
        })
    }

    /// Iterate over all signals in insertion order.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.members.values().filter_map(|m| match m {
            Member::Signal(s) => Some(s),
            _ => None,
        })
    }

    /// Add a member, replacing any existing member with the same interface
    /// and name while keeping its position.
    pub fn add_member(&mut self, member: Member) {
        if !self.interfaces.contains(member.interface()) {
            self.interfaces.insert(member.interface().into());
        }

        let key = (member.interface().into(), member.name().into());
        self.members.insert(key, member);
    }

    /// Look up a member.
    pub fn get_member(&self, interface: &str, member: &str) -> Result<&Member> {
        let found = self.members.get(&KeyRef(interface, member));

        match found {
            Some(member) => Ok(member),
            None => Err(Error::new(ErrorKind::UnknownMember {
                interface: interface.into(),
                member: member.into(),
            })),
        }
    }

    /// Test if a member exists.
    pub fn contains(&self, interface: &str, member: &str) -> bool {
        self.get_member(interface, member).is_ok()
    }
}

/// Borrowed form of a `(interface, member)` key.
#[derive(Hash)]
struct KeyRef<'a>(&'a str, &'a str);

impl Equivalent<(Box<str>, Box<str>)> for KeyRef<'_> {
    #[inline]
    fn equivalent(&self, (interface, member): &(Box<str>, Box<str>)) -> bool {
        **interface == *self.0 && **member == *self.1
    }
}

fn parse_method(interface: &str, element: &Element) -> Result<Method> {
    let name = element.name()?;
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    for arg in element.elements().filter(|e| e.is_parameter()) {
        let ty = arg.ty()?;

        // Method arguments are inputs unless stated otherwise.
        let direction = match arg.attribute("direction") {
            Some(..) => arg.direction()?,
            None => Direction::In,
        };

        match direction {
            Direction::In => inputs.push(ty),
            Direction::Out => outputs.push(ty),
        }
    }

    Ok(Method::new(
        interface,
        name,
        struct_of(name, &inputs)?,
        struct_of(name, &outputs)?,
    ))
}

fn parse_signal(interface: &str, element: &Element) -> Result<Signal> {
    let name = element.name()?;

    let types = element
        .elements()
        .filter(|e| e.is_parameter())
        .map(Element::ty)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Signal::new(interface, name, struct_of(name, &types)?))
}

/// Combine argument types into a struct, where no arguments at all is
/// represented as no type.
pub(crate) fn struct_of(member: &str, types: &[Signature]) -> Result<Option<Signature>> {
    match combine(types) {
        Ok(signature) => Ok(signature),
        Err(error) => Err(Error::new(ErrorKind::BadArguments {
            member: member.into(),
            error,
        })),
    }
}

pub(crate) fn combine(types: &[Signature]) -> Result<Option<Signature>, SignatureError> {
    if types.is_empty() {
        return Ok(None);
    }

    let mut builder = SignatureBuilder::new();
    builder.open_struct()?;

    for ty in types {
        builder.extend_from_signature(ty)?;
    }

    builder.close_struct()?;
    Ok(Some(builder.finish()?))
}
