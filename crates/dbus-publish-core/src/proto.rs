//! Protocol level codes shared between the XML model and the declaration layer.

use core::fmt;

raw_enum! {
    /// A single type code inside of a D-Bus signature.
    #[repr(u8)]
    pub enum Code {
        /// Unsigned 8-bit integer.
        BYTE = b'y',
        /// Boolean value, 0 is false and 1 is true.
        BOOLEAN = b'b',
        /// Signed (two's complement) 16-bit integer.
        INT16 = b'n',
        /// Unsigned 16-bit integer.
        UINT16 = b'q',
        /// Signed (two's complement) 32-bit integer.
        INT32 = b'i',
        /// Unsigned 32-bit integer.
        UINT32 = b'u',
        /// Signed (two's complement) 64-bit integer.
        INT64 = b'x',
        /// Unsigned 64-bit integer.
        UINT64 = b't',
        /// IEEE 754 double.
        DOUBLE = b'd',
        /// UTF-8 string.
        STRING = b's',
        /// Name of an object instance.
        OBJECT_PATH = b'o',
        /// A type signature.
        SIGNATURE = b'g',
        /// Variant type, the type of the value is part of the value itself.
        VARIANT = b'v',
        /// Index into an out-of-band array of file descriptors.
        UNIX_FD = b'h',
        /// Array.
        ARRAY = b'a',
        /// Struct start.
        OPEN_PAREN = b'(',
        /// Struct end.
        CLOSE_PAREN = b')',
        /// Dict entry start.
        OPEN_BRACE = b'{',
        /// Dict entry end.
        CLOSE_BRACE = b'}',
    }
}

impl Code {
    /// Test if the code denotes a basic type, which is the only kind of type
    /// permitted as a dict key.
    pub const fn is_basic(self) -> bool {
        matches!(
            self,
            Code::BYTE
                | Code::BOOLEAN
                | Code::INT16
                | Code::UINT16
                | Code::INT32
                | Code::UINT32
                | Code::INT64
                | Code::UINT64
                | Code::DOUBLE
                | Code::STRING
                | Code::OBJECT_PATH
                | Code::SIGNATURE
                | Code::UNIX_FD
        )
    }
}

raw_set! {
    /// How a property may be accessed over the bus.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_publish_core::proto::Access;
    ///
    /// let access = Access::READ | Access::WRITE;
    /// assert_eq!(access, Access::READ_WRITE);
    /// assert_eq!(access.as_str(), Some("readwrite"));
    /// assert_eq!(Access::parse("write"), Some(Access::WRITE));
    /// ```
    #[repr(u8)]
    pub enum Access {
        /// The property can be read.
        READ = 1,
        /// The property can be written.
        WRITE = 2,
    }
}

impl Access {
    /// The property can be both read and written.
    pub const READ_WRITE: Self = Self(Self::READ.0 | Self::WRITE.0);

    /// Test if the property is readable.
    #[inline]
    pub const fn is_readable(self) -> bool {
        self.contains(Self::READ)
    }

    /// Test if the property is writable.
    #[inline]
    pub const fn is_writable(self) -> bool {
        self.contains(Self::WRITE)
    }

    /// Construct access flags out of the presence of a getter and a setter.
    pub const fn from_accessors(readable: bool, writable: bool) -> Self {
        match (readable, writable) {
            (true, true) => Self::READ_WRITE,
            (true, false) => Self::READ,
            (false, true) => Self::WRITE,
            (false, false) => Self::EMPTY,
        }
    }

    /// Parse the value of an `access` attribute.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "read" => Some(Self::READ),
            "write" => Some(Self::WRITE),
            "readwrite" => Some(Self::READ_WRITE),
            _ => None,
        }
    }

    /// The value of the `access` attribute for this set, if it is non-empty.
    pub const fn as_str(self) -> Option<&'static str> {
        match self.0 {
            1 => Some("read"),
            2 => Some("write"),
            3 => Some("readwrite"),
            _ => None,
        }
    }
}

impl fmt::Display for Access {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("none"))
    }
}
