// Duplex byte-stream abstraction over serial-like transports
// The protocol engine is generic over this so it can be driven
// against a scripted device in tests.

use super::comm::{Result, SerialPort};

/// Largest chunk a single read will return
const READ_CHUNK_BUF: usize = 512;

/// A duplex byte stream. Writes accept whole byte sequences; reads yield
/// chunks of transport-determined size. The transport is owned by the
/// caller, and nothing in this crate closes it.
pub trait Transport: Send {
    /// Write a byte sequence to the device
    async fn write_bytes(&mut self, buf: &[u8]) -> Result<()>;

    /// Read one chunk from the device. Returns `None` at end-of-stream.
    /// Chunk boundaries carry no protocol meaning; callers reassemble.
    async fn read_chunk(&mut self) -> Result<Option<Vec<u8>>>;
}

impl Transport for SerialPort {
    async fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.write_all(buf).await
    }

    async fn read_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = [0u8; READ_CHUNK_BUF];
        match self.read(&mut buf).await? {
            0 => Ok(None),
            n => Ok(Some(buf[..n].to_vec())),
        }
    }
}
