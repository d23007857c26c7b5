//! JSON payload codec.

use crate::error::{CodecError, CodecResult};
use crate::{Document, PayloadCodec};

/// Codec for JSON payloads.
///
/// Object key order is preserved, so keyed collections decode in the
/// order the upstream feed wrote them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl JsonCodec {
    /// Creates a JSON codec.
    pub const fn new() -> Self {
        Self
    }
}

impl PayloadCodec for JsonCodec {
    fn format(&self) -> &'static str {
        "json"
    }

    fn parse(&self, text: &str) -> CodecResult<Document> {
        serde_json::from_str(text).map_err(|e| CodecError::invalid_syntax(self.format(), e.to_string()))
    }

    fn render(&self, document: &Document) -> CodecResult<String> {
        serde_json::to_string(document).map_err(CodecError::from)
    }
}
