//! Applying payloads to bound slots.
//!
//! | Slot kind | Payload handling |
//! |---|---|
//! | any | empty, blank or `null` deletes the slot |
//! | text | assigned verbatim |
//! | binary | base64-decoded |
//! | primitive | decoded and merged, which replaces every typed scalar |
//! | sequence | decoded and replaced |
//! | struct | decoded and merged into the current value |
//! | map | decoded as a keyed collection and upserted |

use crate::binder::Location;
use crate::error::{CacheError, CacheResult};
use crate::path::PatchPath;
use crate::schema::{Node, NodeKind};
use tracing::trace;
use treecache_codec::{decode_base64, decode_keyed_collection, is_deletion, CodecResult, PayloadCodec};

/// Decodes payloads against slot shapes using a [`PayloadCodec`].
#[derive(Debug, Clone, Copy)]
pub struct MergeEngine<'c, C: ?Sized> {
    codec: &'c C,
}

impl<'c, C: PayloadCodec + ?Sized> MergeEngine<'c, C> {
    /// Creates an engine decoding with `codec`.
    pub fn new(codec: &'c C) -> Self {
        Self { codec }
    }

    /// Writes a non-deleting payload into `slot` according to its kind.
    pub fn assign(&self, slot: &mut dyn Node, payload: &str) -> CodecResult<()> {
        let kind = slot.kind();
        trace!(%kind, "assigning payload");
        match kind {
            NodeKind::Text => slot.assign_text(payload),
            NodeKind::Binary => slot.assign_bytes(decode_base64(payload)?),
            NodeKind::Primitive => match self.codec.parse(payload) {
                Ok(document) => slot.merge(document),
                Err(e) => slot.assign_unparsed(payload, e),
            },
            NodeKind::Sequence => slot.replace(self.codec.parse(payload)?),
            NodeKind::Struct => self.merge_into(payload, slot),
            NodeKind::Map => slot.upsert(decode_keyed_collection(self.codec, payload)?),
        }
    }

    /// Decodes `payload` into the existing value of `slot`, keeping the
    /// fields the payload does not mention.
    pub fn merge_into(&self, payload: &str, slot: &mut dyn Node) -> CodecResult<()> {
        merge_into(self.codec, payload, slot)
    }

    /// Applies `payload` to the slot addressed by the nested segments of
    /// `path` inside `entity`.
    ///
    /// An empty nested path addresses `entity` itself. A deleting payload
    /// there is left to the entity's owner and does nothing here.
    pub fn apply(&self, entity: &mut dyn Node, path: &PatchPath, payload: &str) -> CacheResult<()> {
        let deleting = is_deletion(payload);
        if path.nested().is_empty() {
            if deleting {
                return Ok(());
            }
            return self
                .assign(entity, payload)
                .map_err(|e| CacheError::payload_decode(path, e));
        }

        let Some(location) = Location::bind(entity, path.nested())
            .map_err(|e| CacheError::path_resolution(path, e))?
        else {
            return Ok(());
        };
        if deleting {
            return location
                .delete()
                .map_err(|e| CacheError::path_resolution(path, e));
        }
        let slot = location
            .get()
            .map_err(|e| CacheError::path_resolution(path, e))?;
        self.assign(slot, payload)
            .map_err(|e| CacheError::payload_decode(path, e))
    }
}

/// Decodes `text` with `codec` and merges it into `node`.
///
/// Records and schemaless objects keep the members `text` does not name;
/// every other shape is replaced.
pub fn merge_into<C>(codec: &C, text: &str, node: &mut dyn Node) -> CodecResult<()>
where
    C: PayloadCodec + ?Sized,
{
    node.merge(codec.parse(text)?)
}
