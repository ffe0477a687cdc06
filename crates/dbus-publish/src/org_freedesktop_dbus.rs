//! The standard interfaces every published object implements.

use dbus_publish_core::signature::Signature;
use dbus_publish_xml::{Direction, Element};

/// The `org.freedesktop.DBus.Introspectable` interface.
pub const INTROSPECTABLE: &str = "org.freedesktop.DBus.Introspectable";
/// The `org.freedesktop.DBus.Peer` interface.
pub const PEER: &str = "org.freedesktop.DBus.Peer";
/// The `org.freedesktop.DBus.Properties` interface.
pub const PROPERTIES: &str = "org.freedesktop.DBus.Properties";

/// The `Introspect` method.
pub const INTROSPECT: &str = "Introspect";
/// The `Ping` method.
pub const PING: &str = "Ping";
/// The `GetMachineId` method.
pub const GET_MACHINE_ID: &str = "GetMachineId";
/// The `Get` method.
pub const GET: &str = "Get";
/// The `GetAll` method.
pub const GET_ALL: &str = "GetAll";
/// The `Set` method.
pub const SET: &str = "Set";
/// The `PropertiesChanged` signal.
pub const PROPERTIES_CHANGED: &str = "PropertiesChanged";

/// Construct the introspection elements of the standard interfaces.
pub fn interfaces() -> [Element; 3] {
    [introspectable(), peer(), properties()]
}

fn arg(name: &str, ty: &Signature, direction: Direction) -> Element {
    Element::parameter(name, ty, Some(direction))
}

fn introspectable() -> Element {
    let mut introspect = Element::method(INTROSPECT);
    introspect.push(arg("xml_data", &Signature::STRING, Direction::Out));

    let mut interface = Element::interface(INTROSPECTABLE);
    interface.push(introspect);
    interface
}

fn peer() -> Element {
    let mut get_machine_id = Element::method(GET_MACHINE_ID);
    get_machine_id.push(arg("machine_uuid", &Signature::STRING, Direction::Out));

    let mut interface = Element::interface(PEER);
    interface.push(Element::method(PING));
    interface.push(get_machine_id);
    interface
}

fn properties() -> Element {
    let mut get = Element::method(GET);
    get.push(arg("interface_name", &Signature::STRING, Direction::In));
    get.push(arg("property_name", &Signature::STRING, Direction::In));
    get.push(arg("value", &Signature::VARIANT, Direction::Out));

    let mut get_all = Element::method(GET_ALL);
    get_all.push(arg("interface_name", &Signature::STRING, Direction::In));
    get_all.push(arg("properties", &Signature::VARDICT, Direction::Out));

    let mut set = Element::method(SET);
    set.push(arg("interface_name", &Signature::STRING, Direction::In));
    set.push(arg("property_name", &Signature::STRING, Direction::In));
    set.push(arg("value", &Signature::VARIANT, Direction::In));

    let mut changed = Element::signal(PROPERTIES_CHANGED);
    changed.push(arg("interface_name", &Signature::STRING, Direction::Out));
    changed.push(arg("changed_properties", &Signature::VARDICT, Direction::Out));
    changed.push(arg("invalidated_properties", &Signature::STRING_ARRAY, Direction::Out));

    let mut interface = Element::interface(PROPERTIES);
    interface.push(get);
    interface.push(get_all);
    interface.push(set);
    interface.push(changed);
    interface
}
