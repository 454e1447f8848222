// Wire-level constants and codecs for the AT-D878UV programming protocol
// All multi-byte addresses on the wire are little-endian.

use super::{ProtocolError, Result};

/// Command that switches the radio into program mode
pub const ENTER_PROGRAM_MODE: &[u8] = b"PROGRAM";

/// Acknowledgement sent by the radio after entering program mode
pub const ENTER_PROGRAM_MODE_ACK: &[u8] = b"QX\x06";

/// Command that returns the radio to normal operation
pub const EXIT_PROGRAM_MODE: &[u8] = b"END";

/// Generic acknowledgement byte
pub const ACK: u8 = 0x06;

/// Command requesting the radio's identity string
pub const IDENTIFY_COMMAND: u8 = 0x02;

/// Read-memory request command byte
pub const READ_COMMAND: u8 = b'R';

/// Command byte the radio uses in read responses (a write-echo)
pub const READ_RESPONSE_COMMAND: u8 = b'W';

/// Data bytes carried by one read exchange
pub const READ_CHUNK_LEN: usize = 255;

/// Read request: command + 4-byte address + length
pub const READ_REQUEST_LEN: usize = 6;

/// Read response: command + address + length + data + checksum + ack
pub const READ_RESPONSE_LEN: usize = 1 + 4 + 1 + READ_CHUNK_LEN + 1 + 1;

/// First address of the codeplug region
pub const MEMORY_LOW: u32 = 0x0080_0000;

/// One past the last address of the codeplug region.
/// Factory software has been observed bounding reads by both 0x0768_0000
/// and 0x0760_0000; this crate uses the former throughout.
pub const MEMORY_HIGH: u32 = 0x0768_0000;

/// Size of a complete codeplug image in bytes
pub const CODEPLUG_SIZE: usize = (MEMORY_HIGH - MEMORY_LOW) as usize;

/// 8-bit wraparound sum of a byte sequence
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Encode a memory address as it appears on the wire
pub fn encode_address(address: u32) -> [u8; 4] {
    address.to_le_bytes()
}

/// Decode a wire address
pub fn decode_address(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// One read-memory request frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    address: u32,
}

impl ReadRequest {
    pub fn new(address: u32) -> Self {
        Self { address }
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    /// Frame layout: `['R', addr0, addr1, addr2, addr3, 0xFF]`
    pub fn to_bytes(&self) -> [u8; READ_REQUEST_LEN] {
        let addr = encode_address(self.address);
        [
            READ_COMMAND,
            addr[0],
            addr[1],
            addr[2],
            addr[3],
            READ_CHUNK_LEN as u8,
        ]
    }
}

/// One validated read-memory response frame.
///
/// Layout: `['W', addr0..addr3, 0xFF, data[255], checksum, 0x06]` where the
/// checksum is the 8-bit wraparound sum of address, length and data bytes.
#[derive(Debug, Clone)]
pub struct ReadResponse {
    frame: Vec<u8>,
}

impl ReadResponse {
    /// Validate a raw frame against the request it answers.
    ///
    /// Checks run in a fixed order, each with its own error kind: total
    /// length, command byte, address echo, length echo, checksum, ack.
    pub fn parse(frame: Vec<u8>, requested: u32) -> Result<Self> {
        if frame.len() != READ_RESPONSE_LEN {
            return Err(ProtocolError::InvalidResponseLength {
                expected: READ_RESPONSE_LEN,
                actual: frame.len(),
            });
        }

        if frame[0] != READ_RESPONSE_COMMAND {
            return Err(ProtocolError::UnexpectedCommand {
                expected: READ_RESPONSE_COMMAND,
                actual: frame[0],
            });
        }

        let echoed = decode_address([frame[1], frame[2], frame[3], frame[4]]);
        if echoed != requested {
            return Err(ProtocolError::AddressMismatch { requested, echoed });
        }

        if frame[5] != READ_CHUNK_LEN as u8 {
            return Err(ProtocolError::LengthMismatch {
                requested: READ_CHUNK_LEN as u8,
                echoed: frame[5],
            });
        }

        // Checksum covers address, length and data (bytes 1..=260)
        let computed = checksum(&frame[1..READ_RESPONSE_LEN - 2]);
        let received = frame[READ_RESPONSE_LEN - 2];
        if computed != received {
            return Err(ProtocolError::ChecksumMismatch { computed, received });
        }

        let trailer = frame[READ_RESPONSE_LEN - 1];
        if trailer != ACK {
            return Err(ProtocolError::NotAcknowledged(trailer));
        }

        Ok(Self { frame })
    }

    /// The echoed address
    pub fn address(&self) -> u32 {
        decode_address([self.frame[1], self.frame[2], self.frame[3], self.frame[4]])
    }

    /// The 255 data bytes
    pub fn data(&self) -> &[u8] {
        &self.frame[6..6 + READ_CHUNK_LEN]
    }
}

/// Build a protocol-correct response frame. Test support for the scripted
/// device mocks.
#[cfg(test)]
pub(crate) fn encode_response(address: u32, data: &[u8]) -> Vec<u8> {
    assert_eq!(data.len(), READ_CHUNK_LEN);
    let mut frame = Vec::with_capacity(READ_RESPONSE_LEN);
    frame.push(READ_RESPONSE_COMMAND);
    frame.extend_from_slice(&encode_address(address));
    frame.push(READ_CHUNK_LEN as u8);
    frame.extend_from_slice(data);
    frame.push(checksum(&frame[1..]));
    frame.push(ACK);
    frame
}
