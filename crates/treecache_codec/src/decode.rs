//! Typed decode helpers layered over a [`PayloadCodec`].

use crate::error::{CodecError, CodecResult};
use crate::{Document, PayloadCodec};
use serde::de::DeserializeOwned;

/// The literal payload that signals deletion.
pub const NULL_SENTINEL: &str = "null";

/// Returns true if the payload signals deletion of the addressed node.
///
/// Empty, whitespace-only and the literal `null` payloads delete.
/// Surrounding whitespace is ignored.
pub fn is_deletion(payload: &str) -> bool {
    let trimmed = payload.trim();
    trimmed.is_empty() || trimmed == NULL_SENTINEL
}

/// Returns a short name for the shape of a document.
pub fn document_kind(document: &Document) -> &'static str {
    match document {
        Document::Null => "null",
        Document::Bool(_) => "boolean",
        Document::Number(_) => "number",
        Document::String(_) => "string",
        Document::Array(_) => "array",
        Document::Object(_) => "object",
    }
}

/// Converts a parsed document into `T`, reconstructing it wholesale.
pub fn from_document<T: DeserializeOwned>(document: Document) -> CodecResult<T> {
    serde_json::from_value(document).map_err(CodecError::from)
}

/// Decodes payload text into a fresh `T` (replace semantics).
pub fn decode_replace<T, C>(codec: &C, text: &str) -> CodecResult<T>
where
    T: DeserializeOwned,
    C: PayloadCodec + ?Sized,
{
    from_document(codec.parse(text)?)
}

/// Decodes payload text as an ordered keyed collection.
///
/// # Errors
///
/// Returns [`CodecError::ShapeMismatch`] if the payload is not an object.
pub fn decode_keyed_collection<C>(codec: &C, text: &str) -> CodecResult<Vec<(String, Document)>>
where
    C: PayloadCodec + ?Sized,
{
    keyed_entries(codec.parse(text)?)
}

/// Splits an object document into its ordered entries.
pub fn keyed_entries(document: Document) -> CodecResult<Vec<(String, Document)>> {
    match document {
        Document::Object(map) => Ok(map.into_iter().collect()),
        other => Err(CodecError::shape_mismatch("object", document_kind(&other))),
    }
}

/// Decodes payload text as an ordered keyed collection of `T`.
///
/// A `null` entry decodes to `None`, marking the key for removal. All
/// entries are decoded before any is returned.
pub fn decode_entries<T, C>(codec: &C, text: &str) -> CodecResult<Vec<(String, Option<T>)>>
where
    T: DeserializeOwned,
    C: PayloadCodec + ?Sized,
{
    decode_keyed_collection(codec, text)?
        .into_iter()
        .map(|(key, document)| match document {
            Document::Null => Ok((key, None)),
            document => from_document(document).map(|value| (key, Some(value))),
        })
        .collect()
}
