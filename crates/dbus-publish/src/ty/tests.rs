use std::collections::BTreeMap;

use dbus_publish_core::signature::Signature;

use crate::error::{Category, ErrorKind};
use crate::{ObjectPath, Result, Variant};

use super::{build, signature_of};

#[test]
fn basic_types() -> Result<()> {
    assert_eq!(signature_of::<u8>()?, Signature::BYTE);
    assert_eq!(signature_of::<bool>()?, Signature::BOOLEAN);
    assert_eq!(signature_of::<&str>()?, Signature::STRING);
    assert_eq!(signature_of::<ObjectPath>()?, Signature::OBJECT_PATH);
    assert_eq!(signature_of::<Signature>()?, Signature::SIGNATURE);
    assert_eq!(signature_of::<Variant>()?, Signature::VARIANT);
    assert_eq!(signature_of::<f64>()?, Signature::DOUBLE);
    Ok(())
}

#[test]
fn containers() -> Result<()> {
    assert_eq!(signature_of::<[u8]>()?, "ay");
    assert_eq!(signature_of::<Vec<Vec<i64>>>()?, "aax");
    assert_eq!(signature_of::<BTreeMap<u32, (String, Variant)>>()?, "a{u(sv)}");
    assert_eq!(signature_of::<(i32,)>()?, "(i)");
    Ok(())
}

#[test]
fn unsupported_types() {
    // Only basic types are permitted as keys.
    let error = signature_of::<BTreeMap<Variant, i32>>().unwrap_err();
    assert_eq!(error.category(), Category::Specification);
    assert!(matches!(error.kind(), ErrorKind::UnsupportedType { .. }));

    let error = signature_of::<BTreeMap<(i32, i32), i32>>().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnsupportedType { .. }));

    // An array needs an element type.
    assert!(signature_of::<Vec<()>>().is_err());

    assert!(build::<(String, Vec<Variant>)>().is_ok());
}
