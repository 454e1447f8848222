// AT-D878UV programming-mode protocol engine
pub mod reader;
pub mod session;
pub mod wire;

use std::time::Duration;
use thiserror::Error;

use crate::serial::SerialError;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Handshake failed: expected {expected:02X?}, got {actual:02X?}")]
    HandshakeFailed { expected: Vec<u8>, actual: Vec<u8> },

    #[error("Not in program mode")]
    NotInProgramMode,

    #[error("Already in program mode")]
    AlreadyInProgramMode,

    #[error("Unexpected response command byte {actual:#04X} (expected {expected:#04X})")]
    UnexpectedCommand { expected: u8, actual: u8 },

    #[error("Address echo mismatch: requested {requested:#010X}, device echoed {echoed:#010X}")]
    AddressMismatch { requested: u32, echoed: u32 },

    #[error("Length echo mismatch: requested {requested:#04X}, device echoed {echoed:#04X}")]
    LengthMismatch { requested: u8, echoed: u8 },

    #[error("Checksum mismatch: computed {computed:#04X}, frame carries {received:#04X}")]
    ChecksumMismatch { computed: u8, received: u8 },

    #[error("Response not acknowledged: trailing byte {0:#04X}")]
    NotAcknowledged(u8),

    #[error("Invalid response length: expected {expected} bytes, got {actual}")]
    InvalidResponseLength { expected: usize, actual: usize },

    #[error("Device stalled: no complete response within {0:?}")]
    ReadTimeout(Duration),

    #[error("Serial communication error: {0}")]
    Serial(#[from] SerialError),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

pub use reader::{MemoryReader, ProgressCallback};
pub use session::{ProgramSession, SessionConfig, SessionState};
pub use wire::{checksum, decode_address, encode_address, ReadRequest, ReadResponse};
pub use wire::{CODEPLUG_SIZE, MEMORY_HIGH, MEMORY_LOW};
