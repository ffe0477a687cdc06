use dbus_publish_core::signature::Signature;
use dbus_publish_xml::Access;

use crate::Result;
use crate::error::{Category, ErrorKind};
use crate::org_freedesktop_dbus::{INTROSPECTABLE, PEER, PROPERTIES};

use super::{Member, Method, Property, Specification};

const XML: &str = r#"
<!DOCTYPE node PUBLIC "-//freedesktop//DTD D-BUS Object Introspection 1.0//EN"
 "http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd">
<node xmlns:doc="http://www.freedesktop.org/dbus/1.0/doc.dtd">
  <!-- Written by hand. -->
  <interface name="org.example.B">
    <property name="Size" type="t" access="read">
      <annotation name="org.freedesktop.DBus.Property.EmitsChangedSignal" value="true"/>
    </property>
    <signal name="Resized">
      <arg name="old" type="t"/>
      <arg name="new" type="t"/>
    </signal>
  </interface>
  <interface name="org.example.A">
    <method name="Frobnicate">
      <doc:doc><doc:summary>Frobnicates.</doc:summary></doc:doc>
      <arg name="level" type="i"/>
      <arg name="options" type="a{sv}" direction="in"/>
    </method>
    <method name="Nothing"/>
    <signal name="Reset"/>
  </interface>
</node>
"#;

#[test]
fn parse_foreign_document() -> Result<()> {
    let spec = Specification::from_xml(XML)?;

    let interfaces = spec.interfaces().collect::<Vec<_>>();
    assert_eq!(
        interfaces,
        [INTROSPECTABLE, PEER, PROPERTIES, "org.example.B", "org.example.A"]
    );

    let Member::Method(frobnicate) = spec.get_member("org.example.A", "Frobnicate")? else {
        panic!("expected a method");
    };

    assert_eq!(frobnicate.in_type(), Some(&Signature::new("(ia{sv})").unwrap()));
    assert_eq!(frobnicate.out_type(), None);

    let Member::Method(nothing) = spec.get_member("org.example.A", "Nothing")? else {
        panic!("expected a method");
    };

    assert_eq!(nothing.in_type(), None);
    assert_eq!(nothing.out_type(), None);

    let Member::Signal(resized) = spec.get_member("org.example.B", "Resized")? else {
        panic!("expected a signal");
    };

    assert_eq!(resized.ty(), Some(&Signature::new("(tt)").unwrap()));

    let Member::Signal(reset) = spec.get_member("org.example.A", "Reset")? else {
        panic!("expected a signal");
    };

    assert_eq!(reset.ty(), None);

    let properties = spec.properties().collect::<Vec<_>>();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name(), "Size");
    assert!(properties[0].readable());
    assert!(!properties[0].writable());
    Ok(())
}

#[test]
fn standard_interfaces() -> Result<()> {
    let spec = Specification::from_xml("<node/>")?;

    let Member::Method(get) = spec.get_member(PROPERTIES, "Get")? else {
        panic!("expected a method");
    };

    assert_eq!(get.in_type().map(Signature::as_str), Some("(ss)"));
    assert_eq!(get.out_type().map(Signature::as_str), Some("(v)"));

    let Member::Signal(changed) = spec.get_member(PROPERTIES, "PropertiesChanged")? else {
        panic!("expected a signal");
    };

    assert_eq!(changed.ty().map(Signature::as_str), Some("(sa{sv}as)"));
    assert!(spec.contains(PEER, "Ping"));
    assert!(spec.contains(INTROSPECTABLE, "Introspect"));
    assert_eq!(spec.properties().count(), 0);
    Ok(())
}

#[test]
fn unknown_member() {
    let spec = Specification::new();
    let error = spec.get_member("org.example.A", "Missing").unwrap_err();
    assert_eq!(error.category(), Category::Introspection);
    assert!(matches!(error.kind(), ErrorKind::UnknownMember { .. }));
}

#[test]
fn add_member_replaces_in_place() {
    let mut spec = Specification::new();
    spec.add_member(Member::Method(Method::new("a.B", "First", None, None)));
    spec.add_member(Member::Property(Property::new(
        "a.B",
        "Second",
        Access::READ,
        Signature::INT32,
    )));
    spec.add_member(Member::Method(Method::new(
        "a.B",
        "First",
        Some(Signature::new("(s)").unwrap()),
        None,
    )));

    let names = spec.members().map(Member::name).collect::<Vec<_>>();
    assert_eq!(names, ["First", "Second"]);

    let Some(Member::Method(first)) = spec.members().next() else {
        panic!("expected a method");
    };

    assert_eq!(first.in_type().map(Signature::as_str), Some("(s)"));
}

#[test]
fn malformed_documents() {
    for xml in [
        "<node>",
        "<node><interface/></node>",
        r#"<node><interface name="a.B"><property name="P" type="i"/></interface></node>"#,
        r#"<node><interface name="a.B"><property name="P" type="i" access="sometimes"/></interface></node>"#,
        r#"<node><interface name="a.B"><method name="M"><arg type="a{"/></method></interface></node>"#,
    ] {
        let error = Specification::from_xml(xml).unwrap_err();
        assert_eq!(error.category(), Category::Introspection, "{xml}");
    }
}
