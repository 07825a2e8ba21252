//! World state export: snapshot capture, framing and delivery.

mod sender;
mod serializer;
mod snapshot;

use forage_config::{SenderKind, SerializerKind, TransportSettings};
use forage_simulation::World;
use log::debug;

pub use self::sender::{FileSender, NullSender, Sender, StdioSender, TransportError};
pub use self::serializer::{
    BinarySerializer, JsonSerializer, NullSerializer, SerializationError, Serializer,
};
pub use self::snapshot::{CabbageRecord, GoatRecord, WorldSnapshot};

/// Controller for handling serialization and transport of simulation data
pub struct TransportController {
    serializer: Box<dyn Serializer>,
    sender: Box<dyn Sender>,
    output_frequency: u32,
    frames_seen: u64,
    frames_sent: u64,
}

impl TransportController {
    /// `output_frequency` of N sends every N-th published frame; 0 is treated as 1.
    pub fn new(serializer: Box<dyn Serializer>, sender: Box<dyn Sender>, output_frequency: u32) -> Self {
        Self {
            serializer,
            sender,
            output_frequency: output_frequency.max(1),
            frames_seen: 0,
            frames_sent: 0,
        }
    }

    /// Controller that never sends anything.
    pub fn disabled() -> Self {
        Self::new(Box::new(NullSerializer), Box::new(NullSender), 1)
    }

    pub fn from_settings(settings: &TransportSettings) -> Result<Self, TransportError> {
        if !settings.is_enabled() {
            return Ok(Self::disabled());
        }

        let serializer: Box<dyn Serializer> = match settings.serializer {
            SerializerKind::Json => Box::new(JsonSerializer),
            SerializerKind::Binary => Box::new(BinarySerializer),
            SerializerKind::Null => Box::new(NullSerializer),
        };

        let sender: Box<dyn Sender> = match settings.sender {
            SenderKind::Stdio => Box::new(StdioSender::new()),
            SenderKind::File => {
                let path = settings.output_path.as_deref().ok_or_else(|| {
                    TransportError::Configuration("file sender needs an output path".to_string())
                })?;
                Box::new(FileSender::new(path)?)
            }
            SenderKind::Null => Box::new(NullSender),
        };

        Ok(Self::new(serializer, sender, settings.output_frequency))
    }

    /// Captures and sends the world if this frame is due. Returns whether it was sent.
    pub fn publish(&mut self, world: &World) -> Result<bool, TransportError> {
        self.frames_seen += 1;
        if self.frames_seen % u64::from(self.output_frequency) != 0 {
            return Ok(false);
        }

        let snapshot = WorldSnapshot::capture(world);
        let data = self.serializer.serialize(&snapshot)?;
        self.sender.send(&data)?;
        self.frames_sent += 1;
        debug!("sent frame for tick {} ({} bytes)", snapshot.tick, data.len());
        Ok(true)
    }

    pub fn flush(&mut self) -> Result<(), TransportError> {
        self.sender.flush()
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}
