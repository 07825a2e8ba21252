//! Destinations for serialized frames. Every frame is written followed by a newline.

use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::serializer::SerializationError;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub trait Sender: Send {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Flushes any internal buffers. No-op for unbuffered senders.
    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Writes frames to standard output.
pub struct StdioSender {
    stdout: io::Stdout,
}

impl StdioSender {
    pub fn new() -> Self {
        StdioSender { stdout: io::stdout() }
    }
}

impl Default for StdioSender {
    fn default() -> Self {
        Self::new()
    }
}

impl Sender for StdioSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut out = self.stdout.lock();
        out.write_all(data)?;
        out.write_all(b"\n")?;
        out.flush()?; // Ensure it's written immediately
        Ok(())
    }
}

/// Buffered writer to a file, truncated on creation.
pub struct FileSender {
    writer: BufWriter<File>,
}

impl FileSender {
    pub fn new(path: &Path) -> Result<Self, TransportError> {
        let file = File::create(path)?;
        info!("Writing world snapshots to {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Sender for FileSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(data)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Discards everything.
pub struct NullSender;

impl Sender for NullSender {
    fn send(&mut self, _data: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_sender_writes_one_line_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.log");

        let mut sender = FileSender::new(&path).unwrap();
        sender.send(b"first").unwrap();
        sender.send(b"second").unwrap();
        sender.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn file_sender_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frames.log");
        assert!(matches!(FileSender::new(&path), Err(TransportError::Io(_))));
    }

    #[test]
    fn null_sender_accepts_anything() {
        let mut sender = NullSender;
        assert!(sender.send(b"ignored").is_ok());
        assert!(sender.flush().is_ok());
    }
}
