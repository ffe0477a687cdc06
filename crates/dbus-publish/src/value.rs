//! Dynamically typed D-Bus values.

use dbus_publish_core::proto::Code;
use dbus_publish_core::signature::{Signature, SignatureBuilder, SignatureError};

use crate::error::ErrorKind;
use crate::ty::{self, Type};
use crate::{Error, ObjectPath, Result, Variant};

/// A D-Bus value which carries enough information to name its own signature.
///
/// # Examples
///
/// ```
/// use dbus_publish::{Value, Variant};
///
/// let value = Value::array([1i32, 2, 3])?;
/// assert_eq!(value.signature()?, "ai");
///
/// let value = Value::from((String::from("level"), Variant::from(42u8)));
/// assert_eq!(value.signature()?, "(sv)");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// An unsigned 8-bit integer.
    Byte(u8),
    /// A boolean.
    Bool(bool),
    /// A signed 16-bit integer.
    Int16(i16),
    /// An unsigned 16-bit integer.
    Uint16(u16),
    /// A signed 32-bit integer.
    Int32(i32),
    /// An unsigned 32-bit integer.
    Uint32(u32),
    /// A signed 64-bit integer.
    Int64(i64),
    /// An unsigned 64-bit integer.
    Uint64(u64),
    /// An IEEE 754 double.
    Double(f64),
    /// A string.
    String(Box<str>),
    /// An object path.
    ObjectPath(ObjectPath),
    /// A signature.
    Signature(Signature),
    /// An index into the out-of-band file descriptors of a message.
    UnixFd(u32),
    /// An array of values sharing one element type.
    Array(Array),
    /// A dictionary, which is an array of dict entries.
    Dict(Dict),
    /// A struct.
    Struct(Vec<Value>),
    /// A variant.
    Variant(Box<Variant>),
}

impl Value {
    /// Construct an array value out of typed items.
    pub fn array<T>(items: impl IntoIterator<Item = T>) -> Result<Self>
    where
        T: Type + Into<Value>,
    {
        let element = ty::signature_of::<T>()?;
        let items = items.into_iter().map(Into::into).collect();
        Ok(Value::Array(Array { element, items }))
    }

    /// Compute the signature of the value.
    pub fn signature(&self) -> Result<Signature, SignatureError> {
        let mut builder = SignatureBuilder::new();
        self.write_signature(&mut builder)?;
        builder.finish()
    }

    fn write_signature(&self, builder: &mut SignatureBuilder) -> Result<(), SignatureError> {
        match self {
            Value::Byte(..) => builder.push(Code::BYTE),
            Value::Bool(..) => builder.push(Code::BOOLEAN),
            Value::Int16(..) => builder.push(Code::INT16),
            Value::Uint16(..) => builder.push(Code::UINT16),
            Value::Int32(..) => builder.push(Code::INT32),
            Value::Uint32(..) => builder.push(Code::UINT32),
            Value::Int64(..) => builder.push(Code::INT64),
            Value::Uint64(..) => builder.push(Code::UINT64),
            Value::Double(..) => builder.push(Code::DOUBLE),
            Value::String(..) => builder.push(Code::STRING),
            Value::ObjectPath(..) => builder.push(Code::OBJECT_PATH),
            Value::Signature(..) => builder.push(Code::SIGNATURE),
            Value::UnixFd(..) => builder.push(Code::UNIX_FD),
            Value::Array(array) => {
                builder.open_array()?;
                builder.extend_from_signature(&array.element)?;
                builder.close_array()
            }
            Value::Dict(dict) => {
                builder.open_array()?;
                builder.open_dict()?;
                builder.extend_from_signature(&dict.key)?;
                builder.extend_from_signature(&dict.value)?;
                builder.close_dict()?;
                builder.close_array()
            }
            Value::Struct(fields) => {
                builder.open_struct()?;

                for field in fields {
                    field.write_signature(builder)?;
                }

                builder.close_struct()
            }
            Value::Variant(..) => builder.push(Code::VARIANT),
        }
    }

    /// Signature used when reporting a mismatch, which is empty if the value
    /// itself is malformed.
    pub(crate) fn signature_or_empty(&self) -> Signature {
        self.signature().unwrap_or(Signature::EMPTY)
    }
}

/// An array value.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub(crate) element: Signature,
    pub(crate) items: Vec<Value>,
}

impl Array {
    /// Construct an array, checking that every item has the element type.
    pub fn new(element: Signature, items: Vec<Value>) -> Result<Self> {
        for item in &items {
            check(&element, item)?;
        }

        Ok(Self { element, items })
    }

    /// The element type of the array.
    #[inline]
    pub fn element(&self) -> &Signature {
        &self.element
    }

    /// The items in the array.
    #[inline]
    pub fn items(&self) -> &[Value] {
        &self.items
    }
}

/// A dictionary value, which is an `a{kv}` array.
#[derive(Debug, Clone, PartialEq)]
pub struct Dict {
    pub(crate) key: Signature,
    pub(crate) value: Signature,
    pub(crate) entries: Vec<(Value, Value)>,
}

impl Dict {
    /// Construct a dictionary, checking the type of every entry.
    pub fn new(key: Signature, value: Signature, entries: Vec<(Value, Value)>) -> Result<Self> {
        for (k, v) in &entries {
            check(&key, k)?;
            check(&value, v)?;
        }

        Ok(Self {
            key,
            value,
            entries,
        })
    }

    /// The key type of the dictionary.
    #[inline]
    pub fn key(&self) -> &Signature {
        &self.key
    }

    /// The value type of the dictionary.
    #[inline]
    pub fn value(&self) -> &Signature {
        &self.value
    }

    /// The entries of the dictionary.
    #[inline]
    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    /// Look up the value for a string key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find_map(|(k, v)| match k {
            Value::String(k) if **k == *key => Some(v),
            _ => None,
        })
    }
}

pub(crate) fn check(expected: &Signature, value: &Value) -> Result<()> {
    let actual = value.signature_or_empty();

    if actual != *expected {
        return Err(Error::new(ErrorKind::TypeMismatch {
            expected: expected.clone(),
            actual,
        }));
    }

    Ok(())
}

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident, $signature:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = Error;

                #[inline]
                fn try_from(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(value) => Ok(value),
                        value => Err(mismatch(Signature::$signature, &value)),
                    }
                }
            }
        )*
    }
}

impl_primitive! {
    u8 => Byte, BYTE,
    bool => Bool, BOOLEAN,
    i16 => Int16, INT16,
    u16 => Uint16, UINT16,
    i32 => Int32, INT32,
    u32 => Uint32, UINT32,
    i64 => Int64, INT64,
    u64 => Uint64, UINT64,
    f64 => Double, DOUBLE,
    ObjectPath => ObjectPath, OBJECT_PATH,
    Signature => Signature, SIGNATURE,
}

fn mismatch(expected: Signature, value: &Value) -> Error {
    Error::new(ErrorKind::TypeMismatch {
        expected,
        actual: value.signature_or_empty(),
    })
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    #[inline]
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(value) => Ok(value.into()),
            value => Err(mismatch(Signature::STRING, &value)),
        }
    }
}

impl From<Variant> for Value {
    #[inline]
    fn from(value: Variant) -> Self {
        Value::Variant(Box::new(value))
    }
}

impl TryFrom<Value> for Variant {
    type Error = Error;

    #[inline]
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Variant(value) => Ok(*value),
            value => Err(mismatch(Signature::VARIANT, &value)),
        }
    }
}

impl From<Array> for Value {
    #[inline]
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Dict> for Value {
    #[inline]
    fn from(value: Dict) -> Self {
        Value::Dict(value)
    }
}

macro_rules! impl_tuple {
    ($($ty:ident $var:ident),*) => {
        impl<$($ty,)*> From<($($ty,)*)> for Value
        where
            $($ty: Into<Value>,)*
        {
            #[inline]
            fn from(($($var,)*): ($($ty,)*)) -> Self {
                Value::Struct(vec![$($var.into()),*])
            }
        }
    }
}

impl_tuple!(A a);
impl_tuple!(A a, B b);
impl_tuple!(A a, B b, C c);
impl_tuple!(A a, B b, C c, D d);
