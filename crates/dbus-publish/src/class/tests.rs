use std::sync::Arc;

use dbus_publish_xml::XmlOptions;

use crate::attribute::{Attribute, PropertyDecl, SignalDecl};
use crate::error::{Category, ErrorKind};
use crate::function::{Function, ParamKind};
use crate::specification::Member;
use crate::Result;

use super::introspection::is_exportable;
use super::{Class, ClassBuilder, xml_of};

fn interface_names(class: &Class) -> Result<Vec<String>> {
    let node = dbus_publish_xml::parse(xml_of(class)?)?;
    Ok(node.interfaces()?.keys().map(|name| name.to_string()).collect())
}

fn members_of(class: &Class, interface: &str) -> Vec<String> {
    let specification = class.specification().expect("declared");

    specification
        .members()
        .filter(|m| m.interface() == interface)
        .map(|m| m.name().to_owned())
        .collect()
}

#[test]
fn exportable_names() {
    assert!(is_exportable("Hello"));
    assert!(is_exportable("A1"));
    assert!(is_exportable("X"));
    assert!(!is_exportable("hello"));
    assert!(!is_exportable("_Hello"));
    assert!(!is_exportable("Hello_World"));
    assert!(!is_exportable("Héllo"));
    assert!(!is_exportable(""));
}

#[test]
fn generate_simple_interface() -> Result<()> {
    let class = ClassBuilder::new("Calculator")
        .method(
            "Add",
            Function::new().arg::<i32>("a").arg::<i32>("b").returns::<i32>(),
        )
        .signal(
            "Changed",
            SignalDecl::with_definition(Function::new().arg::<i64>("total")),
        )
        .property("Total", PropertyDecl::read::<i64>())
        .method("reset", Function::new().untyped("everything", ParamKind::VarKeyword))
        .attribute("cache", Attribute::other("a plain field"))
        .declare_interface("org.example.Calculator")?;

    let xml = xml_of(&class)?;

    assert!(xml.starts_with("<node>\n  <!-- Specifies Calculator -->\n"));
    assert!(xml.contains(
        r#"  <interface name="org.example.Calculator">
    <method name="Add">
      <arg name="a" type="i" direction="in"/>
      <arg name="b" type="i" direction="in"/>
      <arg name="return" type="i" direction="out"/>
    </method>
    <signal name="Changed">
      <arg name="total" type="x" direction="out"/>
    </signal>
    <property name="Total" type="x" access="read"/>
  </interface>"#
    ));

    assert_eq!(
        interface_names(&class)?,
        [
            "org.example.Calculator",
            "org.freedesktop.DBus.Introspectable",
            "org.freedesktop.DBus.Peer",
            "org.freedesktop.DBus.Properties",
        ]
    );

    let specification = class.specification().expect("declared");

    let Member::Method(add) = specification.get_member("org.example.Calculator", "Add")? else {
        panic!("expected a method");
    };

    assert_eq!(add.in_type().map(|s| s.as_str()), Some("(ii)"));
    assert_eq!(add.out_type().map(|s| s.as_str()), Some("(i)"));
    Ok(())
}

#[test]
fn round_trip() -> Result<()> {
    let class = ClassBuilder::new("Settings")
        .property("Values", PropertyDecl::read_write::<Vec<(String, u32)>>())
        .method("Reload", Function::new().returns::<()>())
        .signal("Reloaded", SignalDecl::new())
        .declare_interface("org.example.Settings")?;

    let xml = xml_of(&class)?;
    let reparsed = dbus_publish_xml::serialize(&dbus_publish_xml::parse(xml)?)?;
    assert_eq!(dbus_publish_xml::normalize(xml)?, dbus_publish_xml::normalize(&reparsed)?);

    let specification = crate::Specification::from_xml(xml)?;
    assert_eq!(&specification, class.specification().expect("declared"));

    let Member::Method(reload) = specification.get_member("org.example.Settings", "Reload")? else {
        panic!("expected a method");
    };

    assert_eq!(reload.out_type(), None);
    Ok(())
}

#[test]
fn inherited_members_win() -> Result<()> {
    let a = ClassBuilder::new("A")
        .method("M", Function::new().arg::<i32>("x"))
        .declare_interface("I.A")?;

    let b = ClassBuilder::new("B")
        .extends(&a)
        .method("M", Function::new().arg::<String>("y"))
        .method("N", Function::new())
        .declare_interface("I.B")?;

    assert_eq!(members_of(&b, "I.A"), ["M"]);
    assert_eq!(members_of(&b, "I.B"), ["N"]);

    let xml = xml_of(&b)?;
    assert_eq!(xml.matches(r#"<method name="M">"#).count(), 1);
    assert!(xml.contains(r#"<arg name="x" type="i" direction="in"/>"#));
    Ok(())
}

#[test]
fn inherited_attributes_are_exported() -> Result<()> {
    // Attributes of undeclared bases are collected by the derived class.
    let mixin = ClassBuilder::new("Mixin")
        .property("Level", PropertyDecl::read::<u8>())
        .finish()?;

    let class = ClassBuilder::new("Leveled")
        .extends(&mixin)
        .declare_interface("org.example.Leveled")?;

    assert_eq!(members_of(&class, "org.example.Leveled"), ["Level"]);
    assert!(xml_of(&mixin).is_err());
    Ok(())
}

#[test]
fn declare_class_combines_bases() -> Result<()> {
    let a = ClassBuilder::new("A")
        .property("A1", PropertyDecl::read::<i32>())
        .declare_interface("I.A")?;

    let b = ClassBuilder::new("B")
        .property("B1", PropertyDecl::read::<i32>())
        .declare_interface("I.B")?;

    let c = ClassBuilder::new("C")
        .extends(&a)
        .extends(&b)
        .method("Ignored", Function::new())
        .declare_class()?;

    assert_eq!(
        interface_names(&c)?,
        [
            "I.A",
            "I.B",
            "org.freedesktop.DBus.Introspectable",
            "org.freedesktop.DBus.Peer",
            "org.freedesktop.DBus.Properties",
        ]
    );

    assert!(xml_of(&c)?.contains("<!-- Specifies C -->"));
    assert_eq!(c.interface(), None);

    let names = c.mro().map(Class::name).collect::<Vec<_>>();
    assert_eq!(names, ["C", "A", "B"]);
    Ok(())
}

#[test]
fn undeclared_subclass_inherits_xml() -> Result<()> {
    let a = ClassBuilder::new("A").declare_interface("I.A")?;
    let b = ClassBuilder::new("B").extends(&a).finish()?;

    assert_eq!(xml_of(&b)?, xml_of(&a)?);
    assert!(b.is_subclass_of(&a));
    assert!(!a.is_subclass_of(&b));

    let error = xml_of(&*ClassBuilder::new("Plain").finish()?).unwrap_err();
    assert_eq!(error.category(), Category::NoSpecification);
    assert_eq!(error.to_string(), "No introspection data is attached to Plain");
    Ok(())
}

#[test]
fn method_resolution_order() -> Result<()> {
    let o = ClassBuilder::new("O").finish()?;
    let a = ClassBuilder::new("A").extends(&o).finish()?;
    let b = ClassBuilder::new("B").extends(&o).finish()?;
    let c = ClassBuilder::new("C").extends(&a).extends(&b).finish()?;

    let names = c.mro().map(Class::name).collect::<Vec<_>>();
    assert_eq!(names, ["C", "A", "B", "O"]);

    let x = ClassBuilder::new("X").extends(&a).extends(&b).finish()?;
    let y = ClassBuilder::new("Y").extends(&b).extends(&a).finish()?;

    let error = ClassBuilder::new("Z").extends(&x).extends(&y).finish().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::InconsistentHierarchy(..)));
    assert_eq!(error.category(), Category::Specification);
    Ok(())
}

#[test]
fn xml_options() -> Result<()> {
    let class = ClassBuilder::new("Compact")
        .xml_options(XmlOptions::new().indent(0).doctype(true))
        .declare_interface("org.example.Compact")?;

    let xml = xml_of(&class)?;
    assert!(xml.starts_with("<!DOCTYPE node"));
    assert!(!xml.contains('\n'));
    assert!(xml.contains(r#"<node><!-- Specifies Compact --><interface name="org.example.Compact"/>"#));
    Ok(())
}

#[test]
fn specification_errors() {
    let error = ClassBuilder::new("C")
        .attribute("Field", Attribute::other("an integer"))
        .declare_interface("I")
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::UnexportableMember { .. }));
    assert_eq!(error.to_string(), "Member C.Field can't be exported over D-Bus");

    let error = ClassBuilder::new("C")
        .method("M", Function::new().param::<i32>("x", ParamKind::KeywordOnly))
        .declare_interface("I")
        .unwrap_err();

    assert!(matches!(
        error.kind(),
        ErrorKind::BadParameterKind {
            kind: ParamKind::KeywordOnly,
            ..
        }
    ));

    let error = ClassBuilder::new("C")
        .method("M", Function::new().untyped("x", ParamKind::PositionalOrKeyword))
        .declare_interface("I")
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::UntypedParameter { .. }));

    let error = ClassBuilder::new("C")
        .property("P", PropertyDecl::new())
        .declare_interface("I")
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::PropertyNotAccessible(..)));

    let error = ClassBuilder::new("C")
        .property("P", PropertyDecl::new().with_getter(Function::new()))
        .declare_interface("I")
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::UndefinedPropertyType(..)));

    let error = ClassBuilder::new("C")
        .signal(
            "S",
            SignalDecl::with_definition(Function::new().arg::<i32>("x").returns::<bool>()),
        )
        .declare_interface("I")
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::SignalWithReturn(..)));

    let error = ClassBuilder::new("C")
        .method("M", Function::new().arg_with_signature("x", "a{vs}"))
        .declare_interface("I")
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::UnsupportedType { .. }));
}

#[test]
fn private_and_unit_members_are_fine() -> Result<()> {
    let class = ClassBuilder::new("C")
        .attribute("helper", Attribute::other("a private helper"))
        .method("do_work", Function::new().untyped("args", ParamKind::VarPositional))
        .method("Unit", Function::new().returns::<()>())
        .method("Bare", Function::new())
        .property("Setter", PropertyDecl::write::<String>())
        .declare_interface("I")?;

    let xml = xml_of(&class)?;
    assert!(xml.contains(r#"<method name="Unit"/>"#));
    assert!(xml.contains(r#"<method name="Bare"/>"#));
    assert!(xml.contains(r#"<property name="Setter" type="s" access="write"/>"#));
    assert!(!xml.contains("helper"));
    assert!(!xml.contains("do_work"));
    Ok(())
}

#[test]
fn class_names_with_dashes_round_trip() -> Result<()> {
    for name in ["Weird--Name", r#"X--><interface name="evil"/><!--"#] {
        let class = ClassBuilder::new(name)
            .property("A", PropertyDecl::read::<i32>())
            .declare_interface("org.example.P")?;

        let specification = crate::Specification::from_xml(xml_of(&class)?)?;
        assert!(specification.contains("org.example.P", "A"));
        assert!(!specification.interfaces().any(|i| i == "evil"));
        assert_eq!(interface_names(&class)?.len(), 4);
    }

    Ok(())
}

#[test]
fn oversized_arguments_fail_the_declaration() {
    let long = "i".repeat(200);

    let error = ClassBuilder::new("C")
        .method("M", Function::new().arg_with_signature("a", &long).arg_with_signature("b", &long))
        .declare_interface("I")
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::UnsupportedArguments { .. }));
    assert_eq!(error.category(), Category::Specification);

    let error = ClassBuilder::new("C")
        .signal(
            "S",
            SignalDecl::with_definition(Function::new().arg_with_signature("a", &long).arg_with_signature("b", &long)),
        )
        .declare_interface("I")
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::UnsupportedArguments { .. }));
    assert_eq!(error.category(), Category::Specification);
}
