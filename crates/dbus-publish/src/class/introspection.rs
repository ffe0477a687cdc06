use std::collections::BTreeMap;

use dbus_publish_core::signature::Signature;
use dbus_publish_xml::{Access, Direction, Element, XmlOptions};
use indexmap::IndexMap;
use tracing::debug;

use crate::attribute::{Attribute, PropertyDecl, SignalDecl};
use crate::error::ErrorKind;
use crate::function::{Argument, Function};
use crate::specification::{Specification, combine};
use crate::{Error, Result, org_freedesktop_dbus};

use super::{Class, Declaration};

/// Generate the introspection data of a class.
pub(super) fn generate(class: &Class, options: &XmlOptions) -> Result<Declaration> {
    let mut interfaces = inherited_interfaces(class)?;

    if let Some(name) = class.interface() {
        let interface = generate_interface(class, name, &interfaces)?;
        interfaces.insert(name.into(), interface);
    }

    for interface in org_freedesktop_dbus::interfaces() {
        interfaces.insert(interface.name()?.into(), interface);
    }

    interfaces.sort_unstable_keys();

    let mut node = Element::node();
    node.push_comment(&format!("Specifies {}", class.name()));

    for (_, interface) in interfaces {
        node.push(interface);
    }

    let xml = dbus_publish_xml::serialize_with(&node, options)?;
    let specification = Specification::from_node(&node)?;

    debug!(
        "Declared {}: {}",
        class.name(),
        specification.interfaces().collect::<Vec<_>>().join(", ")
    );

    Ok(Declaration {
        node,
        xml: xml.into(),
        specification,
    })
}

/// Collect the interfaces declared by ancestors, from the most basic one to
/// the most derived, so that later declarations win.
fn inherited_interfaces(class: &Class) -> Result<IndexMap<Box<str>, Element>> {
    let mut interfaces = IndexMap::new();

    for ancestor in class.ancestors.iter().rev() {
        let Some(declaration) = &ancestor.declaration else {
            continue;
        };

        for (name, interface) in declaration.node.interfaces()? {
            interfaces.insert(name.into(), interface.clone());
        }
    }

    Ok(interfaces)
}

fn generate_interface(
    class: &Class,
    name: &str,
    inherited: &IndexMap<Box<str>, Element>,
) -> Result<Element> {
    let mut interface = Element::interface(name);

    for (member, attribute) in members(class) {
        if !is_exportable(member) {
            continue;
        }

        // Inherited members win.
        if inherited.values().any(|i| i.member(member).is_some()) {
            continue;
        }

        let element = match attribute {
            Attribute::Method(function) => generate_method(member, function)?,
            Attribute::Signal(signal) => generate_signal(member, signal)?,
            Attribute::Property(property) => generate_property(member, property)?,
            Attribute::Other(..) => {
                return Err(Error::new(ErrorKind::UnexportableMember {
                    class: class.name().into(),
                    member: member.into(),
                }));
            }
        };

        interface.push(element);
    }

    Ok(interface)
}

/// All attributes visible on the class sorted by name, where the most derived
/// declaration of each name is used.
fn members(class: &Class) -> BTreeMap<&str, &Attribute> {
    let mut members = BTreeMap::new();

    for c in class.mro() {
        for (name, attribute) in c.attributes() {
            members.entry(name).or_insert(attribute);
        }
    }

    members
}

/// Test if a name can be exported, which requires it to match
/// `^[A-Z][A-Za-z0-9]*$`.
pub(super) fn is_exportable(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

fn generate_method(name: &str, function: &Function) -> Result<Element> {
    let mut method = Element::method(name);
    let arguments = function.arguments(name)?;
    check_arguments(name, &arguments)?;

    for argument in arguments {
        method.push(Element::parameter(
            &argument.name,
            &argument.ty,
            Some(argument.direction),
        ));
    }

    Ok(method)
}

fn generate_signal(name: &str, signal: &SignalDecl) -> Result<Element> {
    let mut element = Element::signal(name);

    let Some(definition) = signal.definition() else {
        return Ok(element);
    };

    let arguments = definition.arguments(name)?;

    if arguments.iter().any(|a| a.direction == Direction::Out) {
        return Err(Error::new(ErrorKind::SignalWithReturn(name.into())));
    }

    check_arguments(name, &arguments)?;

    for argument in arguments {
        element.push(Element::parameter(
            &argument.name,
            &argument.ty,
            Some(Direction::Out),
        ));
    }

    Ok(element)
}

/// Each direction of arguments must combine into a single struct signature.
fn check_arguments(name: &str, arguments: &[Argument]) -> Result<()> {
    for direction in [Direction::In, Direction::Out] {
        let types = arguments
            .iter()
            .filter(|a| a.direction == direction)
            .map(|a| a.ty.clone())
            .collect::<Vec<_>>();

        if let Err(error) = combine(&types) {
            return Err(Error::new(ErrorKind::UnsupportedArguments {
                member: name.into(),
                error,
            }));
        }
    }

    Ok(())
}

fn generate_property(name: &str, property: &PropertyDecl) -> Result<Element> {
    let getter = property.getter();
    let setter = property.setter();

    let access = Access::from_accessors(getter.is_some(), setter.is_some());

    let ty = match (getter, setter) {
        (Some(getter), _) => accessor_type(name, getter, Direction::Out)?,
        (None, Some(setter)) => accessor_type(name, setter, Direction::In)?,
        (None, None) => {
            return Err(Error::new(ErrorKind::PropertyNotAccessible(name.into())));
        }
    };

    Ok(Element::property(name, &ty, access))
}

/// A getter contributes only its return value, and a setter only its single
/// parameter.
fn accessor_type(name: &str, accessor: &Function, direction: Direction) -> Result<Signature> {
    let mut arguments = accessor.arguments(name)?.into_iter();

    match (arguments.next(), arguments.next()) {
        (Some(argument), None) if argument.direction == direction => Ok(argument.ty),
        _ => Err(Error::new(ErrorKind::UndefinedPropertyType(name.into()))),
    }
}
