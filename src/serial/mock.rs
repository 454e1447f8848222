// Mock transports for testing without hardware

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::comm::Result;
use super::transport::Transport;
use crate::proto::wire;

/// Passive mock port: tests queue response chunks and inspect writes.
/// Clones share the same buffers, so a test can keep a handle for
/// inspection while a session drives the other.
#[derive(Clone, Default)]
pub struct MockSerialPort {
    read_chunks: Arc<Mutex<VecDeque<Vec<u8>>>>,
    written: Arc<Mutex<Vec<u8>>>,
}

impl MockSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one chunk to be returned by a future read
    pub fn push_read_chunk(&mut self, data: &[u8]) {
        self.read_chunks.lock().unwrap().push_back(data.to_vec());
    }

    /// Everything written to the port so far
    pub fn get_written_data(&self) -> Vec<u8> {
        self.written.lock().unwrap().clone()
    }

    /// Check whether a byte sequence was written
    pub fn was_written(&self, expected: &[u8]) -> bool {
        let written = self.written.lock().unwrap();
        written
            .windows(expected.len())
            .any(|window| window == expected)
    }
}

impl Transport for MockSerialPort {
    async fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.written.lock().unwrap().extend_from_slice(buf);
        Ok(())
    }

    async fn read_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.read_chunks.lock().unwrap().pop_front())
    }
}

/// Deliberate device misbehavior for protocol validation tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Refuse the PROGRAM handshake with a NAK
    RefuseProgramMode,

    /// Answer reads with a command byte other than 'W'
    WrongCommand,

    /// Echo a different address than the one requested
    WrongAddressEcho,

    /// Echo a different length than the one requested
    WrongLengthEcho,

    /// Flip bits in the checksum byte
    CorruptChecksum,

    /// Replace the trailing ACK with a NAK
    DropAck,

    /// Cut each read response short, then end the stream
    Truncate(usize),

    /// Accept read requests but never answer them
    Stall,
}

struct MockRadioInner {
    pending: VecDeque<Vec<u8>>,
    written: Vec<u8>,
    ident: Vec<u8>,
    memory: Arc<dyn Fn(u32) -> u8 + Send + Sync>,
    fault: Option<Fault>,
    chunk_size: Option<usize>,
    in_program_mode: bool,
}

/// Scripted AT-D878UV simulator. Parses the commands written to it and
/// synthesizes protocol-correct responses, optionally degraded by a
/// [`Fault`]. Memory contents come from a configurable address function.
#[derive(Clone)]
pub struct MockRadio {
    inner: Arc<Mutex<MockRadioInner>>,
}

impl MockRadio {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockRadioInner {
                pending: VecDeque::new(),
                written: Vec::new(),
                ident: b"ID878UV\x00V100\x00\x00".to_vec(),
                memory: Arc::new(|_| 0),
                fault: None,
                chunk_size: None,
                in_program_mode: false,
            })),
        }
    }

    pub fn with_ident(self, ident: &[u8]) -> Self {
        self.inner.lock().unwrap().ident = ident.to_vec();
        self
    }

    pub fn with_fault(self, fault: Fault) -> Self {
        self.inner.lock().unwrap().fault = Some(fault);
        self
    }

    /// Deliver responses in chunks of at most `size` bytes, so tests can
    /// exercise reassembly across chunk boundaries
    pub fn with_chunk_size(self, size: usize) -> Self {
        assert!(size > 0);
        self.inner.lock().unwrap().chunk_size = Some(size);
        self
    }

    /// Define the byte stored at each absolute memory address
    pub fn with_memory(self, f: impl Fn(u32) -> u8 + Send + Sync + 'static) -> Self {
        self.inner.lock().unwrap().memory = Arc::new(f);
        self
    }

    pub fn get_written_data(&self) -> Vec<u8> {
        self.inner.lock().unwrap().written.clone()
    }

    pub fn was_written(&self, expected: &[u8]) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .written
            .windows(expected.len())
            .any(|window| window == expected)
    }

    pub fn in_program_mode(&self) -> bool {
        self.inner.lock().unwrap().in_program_mode
    }

    fn queue(inner: &mut MockRadioInner, frame: Vec<u8>) {
        match inner.chunk_size {
            Some(size) => {
                for chunk in frame.chunks(size) {
                    inner.pending.push_back(chunk.to_vec());
                }
            }
            None => inner.pending.push_back(frame),
        }
    }

    fn read_response(inner: &MockRadioInner, address: u32) -> Vec<u8> {
        let data: Vec<u8> = (0..wire::READ_CHUNK_LEN as u32)
            .map(|i| (inner.memory)(address.wrapping_add(i)))
            .collect();
        let mut frame = wire::encode_response(address, &data);

        match inner.fault {
            Some(Fault::WrongCommand) => frame[0] = b'Q',
            Some(Fault::WrongAddressEcho) => frame[1] = frame[1].wrapping_add(1),
            Some(Fault::WrongLengthEcho) => frame[5] = 0x10,
            Some(Fault::CorruptChecksum) => frame[wire::READ_RESPONSE_LEN - 2] ^= 0x5A,
            Some(Fault::DropAck) => frame[wire::READ_RESPONSE_LEN - 1] = 0x15,
            Some(Fault::Truncate(len)) => frame.truncate(len),
            _ => {}
        }

        frame
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockRadio {
    async fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.written.extend_from_slice(buf);

        if buf == wire::ENTER_PROGRAM_MODE {
            if inner.fault == Some(Fault::RefuseProgramMode) {
                Self::queue(&mut inner, vec![0x15]);
            } else {
                inner.in_program_mode = true;
                Self::queue(&mut inner, wire::ENTER_PROGRAM_MODE_ACK.to_vec());
            }
        } else if buf == wire::EXIT_PROGRAM_MODE {
            inner.in_program_mode = false;
            Self::queue(&mut inner, vec![wire::ACK]);
        } else if buf == [wire::IDENTIFY_COMMAND] {
            let ident = inner.ident.clone();
            Self::queue(&mut inner, ident);
        } else if buf.len() == wire::READ_REQUEST_LEN && buf[0] == wire::READ_COMMAND {
            if inner.fault != Some(Fault::Stall) {
                let address = wire::decode_address([buf[1], buf[2], buf[3], buf[4]]);
                let frame = Self::read_response(&inner, address);
                Self::queue(&mut inner, frame);
            }
        }

        Ok(())
    }

    async fn read_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let (chunk, stalled) = {
            let mut inner = self.inner.lock().unwrap();
            (inner.pending.pop_front(), inner.fault == Some(Fault::Stall))
        };

        match chunk {
            Some(chunk) => Ok(Some(chunk)),
            // A stalled device never supplies more bytes and never signals
            // end-of-stream; only a deadline gets the caller out
            None if stalled => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_port_round_trip() {
        let mut port = MockSerialPort::new();
        port.push_read_chunk(b"Hello");

        assert_eq!(port.read_chunk().await.unwrap().unwrap(), b"Hello");
        assert_eq!(port.read_chunk().await.unwrap(), None);

        port.write_bytes(b"World").await.unwrap();
        assert_eq!(port.get_written_data(), b"World");
        assert!(port.was_written(b"orl"));
        assert!(!port.was_written(b"xyz"));
    }

    #[tokio::test]
    async fn test_mock_radio_program_mode_handshake() {
        let mut radio = MockRadio::new();

        radio.write_bytes(wire::ENTER_PROGRAM_MODE).await.unwrap();
        assert!(radio.in_program_mode());
        assert_eq!(
            radio.read_chunk().await.unwrap().unwrap(),
            wire::ENTER_PROGRAM_MODE_ACK
        );

        radio.write_bytes(wire::EXIT_PROGRAM_MODE).await.unwrap();
        assert!(!radio.in_program_mode());
        assert_eq!(radio.read_chunk().await.unwrap().unwrap(), [wire::ACK]);
    }

    #[tokio::test]
    async fn test_mock_radio_answers_reads_from_memory_fn() {
        let mut radio = MockRadio::new().with_memory(|addr| addr as u8);

        let request = wire::ReadRequest::new(0x0080_0000).to_bytes();
        radio.write_bytes(&request).await.unwrap();

        let frame = radio.read_chunk().await.unwrap().unwrap();
        let response = wire::ReadResponse::parse(frame, 0x0080_0000).unwrap();
        assert_eq!(response.data()[0], 0x00);
        assert_eq!(response.data()[5], 0x05);
    }

    #[tokio::test]
    async fn test_mock_radio_chunked_delivery() {
        let mut radio = MockRadio::new().with_chunk_size(100);

        let request = wire::ReadRequest::new(0x0080_0000).to_bytes();
        radio.write_bytes(&request).await.unwrap();

        let mut total = 0;
        while let Some(chunk) = radio.read_chunk().await.unwrap() {
            assert!(chunk.len() <= 100);
            total += chunk.len();
        }
        assert_eq!(total, wire::READ_RESPONSE_LEN);
    }
}
