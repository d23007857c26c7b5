//! Byte-sequence leaves.
//!
//! The remote store has no native byte type, so binary leaves travel as
//! standard (padded) base64 text. A patch addressing a binary slot carries
//! the bare base64 text; inside a structured document the same text appears
//! as a JSON string.

use crate::error::{CodecError, CodecResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Decode base64 text into bytes.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`CodecError::InvalidBase64`] if the text is not valid base64.
pub fn decode_base64(text: &str) -> CodecResult<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| CodecError::invalid_base64(e.to_string()))
}

/// Encode bytes as standard base64 text.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// An owned byte sequence stored in the cache.
///
/// Distinct from `Vec<u8>`, which the cache treats as a sequence of
/// numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Binary(Vec<u8>);

impl Binary {
    /// Creates a binary value from owned bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parses base64 text into a binary value.
    pub fn from_base64(text: &str) -> CodecResult<Self> {
        decode_base64(text).map(Self)
    }

    /// Returns the base64 text form.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.0)
    }

    /// Returns the bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the value, returning the bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Binary {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Serialize for Binary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

struct Base64Visitor;

impl<'de> Visitor<'de> for Base64Visitor {
    type Value = Binary;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a base64 string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Binary, E> {
        Binary::from_base64(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Binary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(Base64Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decodes_bare_base64() {
        assert_eq!(decode_base64("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_base64("  AQID\n").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_base64("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_base64("not base64!").unwrap_err();
        assert!(matches!(err, CodecError::InvalidBase64 { .. }));
    }

    #[test]
    fn binary_is_a_json_string() {
        let value = Binary::new(vec![1, 2, 3]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"AQID\"");

        let back: Binary = serde_json::from_str("\"AQID\"").unwrap();
        assert_eq!(back.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn binary_rejects_non_strings() {
        assert!(serde_json::from_str::<Binary>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<Binary>("\"%%%\"").is_err());
    }

    proptest! {
        #[test]
        fn base64_text_preserves_bytes(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            let text = encode_base64(&bytes);
            prop_assert_eq!(decode_base64(&text).unwrap(), bytes);
        }
    }
}
