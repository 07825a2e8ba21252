use thiserror::Error;

use crate::snapshot::WorldSnapshot;

/// Error types for serialization operations
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary serialization error: {0}")]
    Binary(#[from] bincode::Error),
}

/// Turns a snapshot into one frame of bytes.
pub trait Serializer: Send + Sync {
    fn serialize(&self, snapshot: &WorldSnapshot) -> Result<Vec<u8>, SerializationError>;
}

pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, snapshot: &WorldSnapshot) -> Result<Vec<u8>, SerializationError> {
        Ok(serde_json::to_vec(snapshot)?)
    }
}

/// bincode frame, base64-encoded so it fits on one line.
pub struct BinarySerializer;

impl Serializer for BinarySerializer {
    fn serialize(&self, snapshot: &WorldSnapshot) -> Result<Vec<u8>, SerializationError> {
        let buffer = bincode::serialize(snapshot)?;
        Ok(base64::encode(buffer).into_bytes())
    }
}

impl BinarySerializer {
    /// Reverses [`BinarySerializer::serialize`]; used by consumers and tests.
    pub fn decode(frame: &[u8]) -> Result<WorldSnapshot, SerializationError> {
        let buffer = base64::decode(frame).map_err(|e| {
            SerializationError::Binary(Box::new(bincode::ErrorKind::Custom(e.to_string())))
        })?;
        Ok(bincode::deserialize(&buffer)?)
    }
}

/// Produces empty frames.
pub struct NullSerializer;

impl Serializer for NullSerializer {
    fn serialize(&self, _snapshot: &WorldSnapshot) -> Result<Vec<u8>, SerializationError> {
        Ok(Vec::new())
    }
}
