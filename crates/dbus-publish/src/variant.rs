use dbus_publish_core::signature::Signature;

use crate::error::ErrorKind;
use crate::value::{self, Value};
use crate::{Error, Result};

/// A value paired with its D-Bus signature.
///
/// # Examples
///
/// ```
/// use dbus_publish::{Signature, Value, Variant};
///
/// let variant = Variant::new(Signature::INT32, Value::from(10i32))?;
/// assert_eq!(variant.signature(), &Signature::INT32);
///
/// assert!(Variant::new(Signature::STRING, Value::from(10i32)).is_err());
/// # Ok::<_, dbus_publish::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    signature: Signature,
    value: Value,
}

impl Variant {
    /// Construct a variant, checking that the value has the given signature.
    pub fn new(signature: Signature, value: Value) -> Result<Self> {
        value::check(&signature, &value)?;
        Ok(Self { signature, value })
    }

    /// Construct a variant from a value, using the signature of the value.
    pub fn from_value(value: Value) -> Result<Self> {
        let signature = value.signature().map_err(|error| {
            Error::new(ErrorKind::UnsupportedType {
                ty: "Value".into(),
                error,
            })
        })?;

        Ok(Self { signature, value })
    }

    /// The signature of the contained value.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The contained value.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take the contained value.
    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }
}

macro_rules! impl_from {
    ($($ty:ty => $signature:ident),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self {
                        signature: Signature::$signature,
                        value: Value::from(value),
                    }
                }
            }
        )*
    }
}

impl_from! {
    u8 => BYTE,
    bool => BOOLEAN,
    i16 => INT16,
    u16 => UINT16,
    i32 => INT32,
    u32 => UINT32,
    i64 => INT64,
    u64 => UINT64,
    f64 => DOUBLE,
    &str => STRING,
    String => STRING,
}

/// Wrap a value together with its declared signature.
///
/// This is what the properties machinery uses to build the values of
/// `PropertiesChanged` and `Get` replies.
#[inline]
pub fn as_variant(signature: &Signature, value: Value) -> Result<Variant> {
    Variant::new(signature.clone(), value)
}
