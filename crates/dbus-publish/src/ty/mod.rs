//! Mapping from Rust types to D-Bus signatures.
//!
//! The [`Type`] trait is how declarations name the D-Bus type of an argument,
//! a return value or a property.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//!
//! use dbus_publish::{Variant, ty};
//!
//! assert_eq!(ty::signature_of::<i32>()?, "i");
//! assert_eq!(ty::signature_of::<Vec<String>>()?, "as");
//! assert_eq!(ty::signature_of::<HashMap<String, Variant>>()?, "a{sv}");
//! assert_eq!(ty::signature_of::<(u8, bool, Vec<(i32, i32)>)>()?, "(yba(ii))");
//! assert!(ty::signature_of::<()>()?.is_empty());
//! # Ok::<_, dbus_publish::Error>(())
//! ```

#[cfg(test)]
mod tests;

use std::any::type_name;
use std::collections::{BTreeMap, HashMap};

use dbus_publish_core::proto::Code;
use dbus_publish_core::signature::{Signature, SignatureBuilder, SignatureError};
use indexmap::IndexMap;

use crate::error::ErrorKind;
use crate::{Error, ObjectPath, Result, Variant};

/// A Rust type which has a D-Bus signature.
pub trait Type {
    /// Write the signature of this type.
    fn write_signature(builder: &mut SignatureBuilder) -> Result<(), SignatureError>;
}

/// Get the D-Bus signature of `T`.
///
/// The unit type maps to the empty signature, which declarations treat as
/// having no value at all.
pub fn signature_of<T>() -> Result<Signature>
where
    T: ?Sized + Type,
{
    build::<T>().map_err(|error| {
        Error::new(ErrorKind::UnsupportedType {
            ty: type_name::<T>().into(),
            error,
        })
    })
}

pub(crate) fn build<T>() -> Result<Signature, SignatureError>
where
    T: ?Sized + Type,
{
    let mut builder = SignatureBuilder::new();
    T::write_signature(&mut builder)?;
    builder.finish()
}

macro_rules! impl_basic {
    ($($ty:ty => $code:ident),* $(,)?) => {
        $(
            impl Type for $ty {
                #[inline]
                fn write_signature(builder: &mut SignatureBuilder) -> Result<(), SignatureError> {
                    builder.push(Code::$code)
                }
            }
        )*
    }
}

impl_basic! {
    u8 => BYTE,
    bool => BOOLEAN,
    i16 => INT16,
    u16 => UINT16,
    i32 => INT32,
    u32 => UINT32,
    i64 => INT64,
    u64 => UINT64,
    f64 => DOUBLE,
    str => STRING,
    String => STRING,
    ObjectPath => OBJECT_PATH,
    Signature => SIGNATURE,
    Variant => VARIANT,
}

impl Type for () {
    #[inline]
    fn write_signature(_: &mut SignatureBuilder) -> Result<(), SignatureError> {
        Ok(())
    }
}

impl<T> Type for &T
where
    T: ?Sized + Type,
{
    #[inline]
    fn write_signature(builder: &mut SignatureBuilder) -> Result<(), SignatureError> {
        T::write_signature(builder)
    }
}

impl<T> Type for [T]
where
    T: Type,
{
    fn write_signature(builder: &mut SignatureBuilder) -> Result<(), SignatureError> {
        builder.open_array()?;
        T::write_signature(builder)?;
        builder.close_array()
    }
}

impl<T> Type for Vec<T>
where
    T: Type,
{
    #[inline]
    fn write_signature(builder: &mut SignatureBuilder) -> Result<(), SignatureError> {
        <[T]>::write_signature(builder)
    }
}

fn write_dict<K, V>(builder: &mut SignatureBuilder) -> Result<(), SignatureError>
where
    K: Type,
    V: Type,
{
    builder.open_array()?;
    builder.open_dict()?;
    K::write_signature(builder)?;
    V::write_signature(builder)?;
    builder.close_dict()?;
    builder.close_array()
}

macro_rules! impl_dict {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<K, V, S> Type for $ty<K, V, S>
            where
                K: Type,
                V: Type,
            {
                #[inline]
                fn write_signature(builder: &mut SignatureBuilder) -> Result<(), SignatureError> {
                    write_dict::<K, V>(builder)
                }
            }
        )*
    }
}

impl_dict!(HashMap, IndexMap);

impl<K, V> Type for BTreeMap<K, V>
where
    K: Type,
    V: Type,
{
    #[inline]
    fn write_signature(builder: &mut SignatureBuilder) -> Result<(), SignatureError> {
        write_dict::<K, V>(builder)
    }
}

macro_rules! impl_tuple {
    ($($ty:ident),*) => {
        impl<$($ty,)*> Type for ($($ty,)*)
        where
            $($ty: Type,)*
        {
            fn write_signature(builder: &mut SignatureBuilder) -> Result<(), SignatureError> {
                builder.open_struct()?;
                $($ty::write_signature(builder)?;)*
                builder.close_struct()
            }
        }
    }
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);
impl_tuple!(A, B, C, D, E);
impl_tuple!(A, B, C, D, E, F);
impl_tuple!(A, B, C, D, E, F, G);
impl_tuple!(A, B, C, D, E, F, G, H);
