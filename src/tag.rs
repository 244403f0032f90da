//! Four-byte event identifiers.
//!
//! A [`Tag`] is four raw bytes packed into a `u32`, least-significant byte first.
//! It has no string semantics: two tags are equal exactly when their raw values are.
//! Mnemonics such as `"UART"` are the usual way to build one, but any four bytes work.

use core::fmt::{self, Write};

use thiserror::Error;

/// Returned when a runtime byte string cannot be packed into a [`Tag`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("tag must be exactly 4 bytes, got {len}")]
    Length { len: usize },
}

/// Packed four-byte event identifier.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag(u32);

impl Tag {
    /// All-zero tag, used for slots that have never been written.
    pub const EMPTY: Tag = Tag(0);

    /// Pack a four-byte mnemonic.
    ///
    /// Meant for constants: in a `const` context a mnemonic of the wrong
    /// length fails the build.
    ///
    /// # Panics
    /// Panics if `mnemonic` is not exactly 4 bytes long.
    pub const fn new(mnemonic: &str) -> Self {
        let b = mnemonic.as_bytes();
        assert!(b.len() == 4, "tag mnemonic must be exactly 4 bytes");
        Self::from_bytes([b[0], b[1], b[2], b[3]])
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Tag(u32::from_le_bytes(bytes))
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Tag(raw)
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Tag::from_bytes(bytes)
    }
}

impl From<Tag> for u32 {
    fn from(tag: Tag) -> Self {
        tag.to_raw()
    }
}

impl TryFrom<&[u8]> for Tag {
    type Error = TagError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; 4] = bytes
            .try_into()
            .map_err(|_| TagError::Length { len: bytes.len() })?;
        Ok(Tag::from_bytes(bytes))
    }
}

impl TryFrom<&str> for Tag {
    type Error = TagError;

    fn try_from(mnemonic: &str) -> Result<Self, Self::Error> {
        Tag::try_from(mnemonic.as_bytes())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            f.write_str("Tag(\"")?;
            for b in bytes {
                f.write_char(char::from(b))?;
            }
            f.write_str("\")")
        } else {
            write!(f, "Tag({:#010x})", self.0)
        }
    }
}
