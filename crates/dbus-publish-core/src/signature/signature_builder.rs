use crate::proto::Code;

use super::{
    MAX_CONTAINER_DEPTH, MAX_DEPTH, MAX_SIGNATURE, Signature, SignatureError, SignatureErrorKind,
    validate,
};

/// A D-Bus signature builder.
///
/// This ensures that the constructed signature doesn't violate maximum
/// requirements imposed by the D-Bus specification while it is being built,
/// and that the finished signature is valid.
///
/// # Examples
///
/// ```
/// use dbus_publish_core::proto::Code;
/// use dbus_publish_core::signature::{Signature, SignatureBuilder};
///
/// let mut builder = SignatureBuilder::new();
/// builder.open_struct()?;
/// builder.push(Code::INT32)?;
/// builder.extend_from_signature(&Signature::new("a{sv}")?)?;
/// builder.close_struct()?;
///
/// assert_eq!(builder.finish()?, "(ia{sv})");
/// # Ok::<_, dbus_publish_core::signature::SignatureError>(())
/// ```
#[derive(Default, Clone)]
pub struct SignatureBuilder {
    data: String,
    arrays: usize,
    structs: usize,
    dicts: usize,
}

impl SignatureBuilder {
    /// Construct a new empty signature builder.
    pub const fn new() -> Self {
        Self {
            data: String::new(),
            arrays: 0,
            structs: 0,
            dicts: 0,
        }
    }

    /// Open an array in the signature.
    ///
    /// Arrays are closed implicitly once their element type is complete, so
    /// [`close_array`] only maintains the depth bookkeeping.
    ///
    /// [`close_array`]: Self::close_array
    pub fn open_array(&mut self) -> Result<(), SignatureError> {
        if self.arrays == MAX_CONTAINER_DEPTH || self.depth() == MAX_DEPTH {
            return Err(SignatureError::new(
                SignatureErrorKind::ExceededMaximumArrayRecursion,
            ));
        }

        self.push_byte(b'a')?;
        self.arrays += 1;
        Ok(())
    }

    /// Close an array in the signature.
    pub fn close_array(&mut self) -> Result<(), SignatureError> {
        if self.arrays == 0 {
            return Err(SignatureError::new(SignatureErrorKind::ContainerNotOpen));
        }

        self.arrays -= 1;
        Ok(())
    }

    /// Open a struct in the signature.
    pub fn open_struct(&mut self) -> Result<(), SignatureError> {
        if self.structs == MAX_CONTAINER_DEPTH || self.depth() == MAX_DEPTH {
            return Err(SignatureError::new(
                SignatureErrorKind::ExceededMaximumStructRecursion,
            ));
        }

        self.push_byte(b'(')?;
        self.structs += 1;
        Ok(())
    }

    /// Close a struct in the signature.
    pub fn close_struct(&mut self) -> Result<(), SignatureError> {
        if self.structs == 0 {
            return Err(SignatureError::new(SignatureErrorKind::ContainerNotOpen));
        }

        self.push_byte(b')')?;
        self.structs -= 1;
        Ok(())
    }

    /// Open a dict entry in the signature.
    pub fn open_dict(&mut self) -> Result<(), SignatureError> {
        if self.depth() == MAX_DEPTH {
            return Err(SignatureError::new(
                SignatureErrorKind::ExceededMaximumDictRecursion,
            ));
        }

        self.push_byte(b'{')?;
        self.dicts += 1;
        Ok(())
    }

    /// Close a dict entry in the signature.
    pub fn close_dict(&mut self) -> Result<(), SignatureError> {
        if self.dicts == 0 {
            return Err(SignatureError::new(SignatureErrorKind::ContainerNotOpen));
        }

        self.push_byte(b'}')?;
        self.dicts -= 1;
        Ok(())
    }

    /// Push a single non-container type code.
    pub fn push(&mut self, code: Code) -> Result<(), SignatureError> {
        if !code.is_basic() && code != Code::VARIANT {
            return Err(SignatureError::new(SignatureErrorKind::UnknownTypeCode(
                code,
            )));
        }

        self.push_byte(code.get())
    }

    /// Extend this signature with another.
    pub fn extend_from_signature(&mut self, other: &Signature) -> Result<(), SignatureError> {
        if self.data.len() + other.len() >= MAX_SIGNATURE {
            return Err(SignatureError::too_long());
        }

        self.data.push_str(other.as_str());
        Ok(())
    }

    /// Clear the current signature.
    pub fn clear(&mut self) {
        self.data.clear();
        self.arrays = 0;
        self.structs = 0;
        self.dicts = 0;
    }

    /// Test if nothing has been written to the builder.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The signature built so far, which might not yet be valid.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Validate and finish the signature.
    pub fn finish(self) -> Result<Signature, SignatureError> {
        validate(self.data.as_bytes())?;
        Ok(Signature::from_validated(self.data))
    }

    #[inline]
    fn depth(&self) -> usize {
        self.arrays + self.structs + self.dicts
    }

    fn push_byte(&mut self, byte: u8) -> Result<(), SignatureError> {
        if self.data.len() + 1 >= MAX_SIGNATURE {
            return Err(SignatureError::too_long());
        }

        self.data.push(char::from(byte));
        Ok(())
    }
}
