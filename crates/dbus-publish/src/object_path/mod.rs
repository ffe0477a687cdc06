use std::fmt;

pub use self::object_path_error::ObjectPathError;
mod object_path_error;

#[cfg(test)]
mod tests;

/// A validated D-Bus object path, like `/org/example/Object`.
///
/// # Examples
///
/// ```
/// use dbus_publish::ObjectPath;
///
/// assert!(ObjectPath::new("/").is_ok());
/// assert!(ObjectPath::new("/org/example/Object_1").is_ok());
/// assert!(ObjectPath::new("/org/example/").is_err());
/// assert!(ObjectPath::new("org").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectPath(Box<str>);

impl ObjectPath {
    /// Construct a new object path with validation.
    pub fn new(path: &str) -> Result<Self, ObjectPathError> {
        validate(path)?;
        Ok(Self(path.into()))
    }

    /// Get the object path as a string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the elements of the path.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|element| !element.is_empty())
    }
}

impl fmt::Debug for ObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectPath").field(&self.as_str()).finish()
    }
}

impl fmt::Display for ObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectPath {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn validate(path: &str) -> Result<(), ObjectPathError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(ObjectPathError);
    };

    if rest.is_empty() {
        return Ok(());
    }

    for element in rest.split('/') {
        if element.is_empty() {
            return Err(ObjectPathError);
        }

        if !element
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            return Err(ObjectPathError);
        }
    }

    Ok(())
}
