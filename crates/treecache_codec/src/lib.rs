//! # treecache codec
//!
//! Payload decoding for the treecache merge engine.
//!
//! Patches arrive as raw text. This crate turns that text into a
//! [`Document`], the format-neutral tree the engine decodes typed values
//! from, and provides the typed helpers the engine depends on:
//!
//! - [`decode_replace`]: full structural decode into a fresh value
//! - [`decode_keyed_collection`] / [`decode_entries`]: ordered keyed
//!   collections for batch upserts
//! - [`decode_base64`] and [`Binary`]: byte-sequence leaves
//!
//! In-place merge decoding needs the target's field table and lives with
//! the engine in `treecache_core`.
//!
//! ## Usage
//!
//! ```
//! use treecache_codec::{decode_replace, JsonCodec, PayloadCodec};
//!
//! let codec = JsonCodec::new();
//! let doc = codec.parse(r#"{"Height": 5.2}"#).unwrap();
//! assert_eq!(doc["Height"], 5.2);
//!
//! let heights: Vec<f64> = decode_replace(&codec, "[1.5, 2.5]").unwrap();
//! assert_eq!(heights, vec![1.5, 2.5]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod binary;
mod decode;
mod error;
mod json;

pub use binary::{decode_base64, encode_base64, Binary};
pub use decode::{
    decode_entries, decode_keyed_collection, decode_replace, document_kind, from_document,
    is_deletion, keyed_entries, NULL_SENTINEL,
};
pub use error::{CodecError, CodecResult};
pub use json::JsonCodec;

/// Format-neutral document tree produced by a [`PayloadCodec`].
pub type Document = serde_json::Value;

/// A pluggable payload format.
///
/// Implementations only parse and render text; typed decoding is done on
/// the resulting [`Document`] so the trait stays object-safe.
pub trait PayloadCodec {
    /// Short name of the format, used in error messages.
    fn format(&self) -> &'static str;

    /// Parses payload text into a document.
    fn parse(&self, text: &str) -> CodecResult<Document>;

    /// Renders a document back into payload text.
    fn render(&self, document: &Document) -> CodecResult<String>;
}

impl<C: PayloadCodec + ?Sized> PayloadCodec for &C {
    fn format(&self) -> &'static str {
        (**self).format()
    }

    fn parse(&self, text: &str) -> CodecResult<Document> {
        (**self).parse(text)
    }

    fn render(&self, document: &Document) -> CodecResult<String> {
        (**self).render(document)
    }
}

impl<C: PayloadCodec + ?Sized> PayloadCodec for Box<C> {
    fn format(&self) -> &'static str {
        (**self).format()
    }

    fn parse(&self, text: &str) -> CodecResult<Document> {
        (**self).parse(text)
    }

    fn render(&self, document: &Document) -> CodecResult<String> {
        (**self).render(document)
    }
}
