use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::{SignatureError, validate};

/// A D-Bus signature.
///
/// # Examples
///
/// ```
/// use dbus_publish_core::signature::Signature;
///
/// assert!(Signature::new("a{sv}").is_ok());
/// assert!(Signature::new("a{vs}").is_err());
/// assert_eq!(Signature::INT32.as_str(), "i");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature(Cow<'static, str>);

impl Signature {
    /// The empty signature.
    pub const EMPTY: Signature = Signature::from_static("");
    /// Unsigned 8-bit integer.
    pub const BYTE: Signature = Signature::from_static("y");
    /// Boolean value.
    pub const BOOLEAN: Signature = Signature::from_static("b");
    /// Signed (two's complement) 16-bit integer.
    pub const INT16: Signature = Signature::from_static("n");
    /// Unsigned 16-bit integer.
    pub const UINT16: Signature = Signature::from_static("q");
    /// Signed (two's complement) 32-bit integer.
    pub const INT32: Signature = Signature::from_static("i");
    /// Unsigned 32-bit integer.
    pub const UINT32: Signature = Signature::from_static("u");
    /// Signed (two's complement) 64-bit integer.
    pub const INT64: Signature = Signature::from_static("x");
    /// Unsigned 64-bit integer.
    pub const UINT64: Signature = Signature::from_static("t");
    /// IEEE 754 double-precision floating point.
    pub const DOUBLE: Signature = Signature::from_static("d");
    /// A string.
    pub const STRING: Signature = Signature::from_static("s");
    /// An object path.
    pub const OBJECT_PATH: Signature = Signature::from_static("o");
    /// A signature.
    pub const SIGNATURE: Signature = Signature::from_static("g");
    /// A variant.
    pub const VARIANT: Signature = Signature::from_static("v");
    /// Unsigned 32-bit integer representing an index into an out-of-band array
    /// of file descriptors.
    pub const UNIX_FD: Signature = Signature::from_static("h");
    /// A dictionary of strings to variants, like the properties of an
    /// interface.
    pub const VARDICT: Signature = Signature::from_static("a{sv}");
    /// An array of strings.
    pub const STRING_ARRAY: Signature = Signature::from_static("as");

    /// Only used for the constants above, which are known to be valid.
    const fn from_static(signature: &'static str) -> Self {
        Self(Cow::Borrowed(signature))
    }

    /// Try to construct a new signature with validation.
    pub fn new(signature: &str) -> Result<Self, SignatureError> {
        validate(signature.as_bytes())?;
        Ok(Self(Cow::Owned(signature.to_owned())))
    }

    /// Construct a signature out of an owned string with validation.
    pub fn from_string(signature: String) -> Result<Self, SignatureError> {
        validate(signature.as_bytes())?;
        Ok(Self(Cow::Owned(signature)))
    }

    /// Construct a signature from a string which has already been validated.
    #[inline]
    pub(super) fn from_validated(signature: String) -> Self {
        Self(Cow::Owned(signature))
    }

    /// Test if the signature is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The length of the signature in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Test if this signature is a single struct, like `(is)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_publish_core::signature::Signature;
    ///
    /// assert!(Signature::new("(is)")?.is_struct());
    /// assert!(!Signature::new("(i)(s)")?.is_struct());
    /// assert!(!Signature::new("is")?.is_struct());
    /// # Ok::<_, dbus_publish_core::signature::SignatureError>(())
    /// ```
    pub fn is_struct(&self) -> bool {
        let bytes = self.0.as_bytes();

        if bytes.first() != Some(&b'(') {
            return false;
        }

        let mut depth = 0usize;

        for (n, b) in bytes.iter().enumerate() {
            match b {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;

                    if depth == 0 {
                        return n + 1 == bytes.len();
                    }
                }
                _ => {}
            }
        }

        false
    }

    /// Get the signature as a string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the signature as bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Signature {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Signature {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Signature {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Signature {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        *self.0 == *other
    }
}

impl PartialEq<&str> for Signature {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        *self.0 == **other
    }
}
