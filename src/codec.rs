//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Codec`] if you need a different text format. The missing
//! sentinel is always `None`; a codec only has to round-trip it.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts a stored value to/from bytes for persistence.
pub trait Codec: Send + Sync {
    /// Encode a value (or the missing sentinel) to bytes.
    fn encode<T: Serialize>(&self, value: Option<&T>) -> Result<Vec<u8>>;

    /// Decode bytes back into a value. Never called with empty input: adapters
    /// treat an empty or absent record as `None` before getting here.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Option<T>>;
}

/// JSON codec with optional pretty-printing.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with two-space indentation. Diff-friendly, and what
    /// the file adapters use unless told otherwise.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// `true` if this codec indents its output.
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: Option<&T>) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&value)
        } else {
            serde_json::to_vec(&value)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Option<T>> {
        serde_json::from_slice(bytes).map_err(Error::from)
    }
}
