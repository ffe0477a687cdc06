use super::{ObjectPath, ObjectPathError};

#[test]
fn object_paths() -> Result<(), ObjectPathError> {
    assert!(ObjectPath::new("/")?.elements().next().is_none());

    let path = ObjectPath::new("/org/freedesktop/DBus")?;
    assert_eq!(
        path.elements().collect::<Vec<_>>(),
        ["org", "freedesktop", "DBus"]
    );

    for bad in ["", "org", "//", "/org//DBus", "/org/", "/org/free-desktop", "/ä"] {
        assert_eq!(ObjectPath::new(bad), Err(ObjectPathError), "{bad:?}");
    }

    Ok(())
}
