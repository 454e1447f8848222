// Program-mode session lifecycle: enter, identify, exit
//
// The radio only accepts memory commands while in program mode. A session
// borrows the transport exclusively, so no two exchanges can interleave;
// the protocol has no request identifiers and responses are matched purely
// by read order. Callers that need to share a session across tasks must
// wrap it in a tokio::sync::Mutex themselves.

use std::io;
use std::time::Duration;

use tokio::time::sleep;

use super::wire;
use super::{ProtocolError, Result};
use crate::serial::{SerialError, Transport};

/// Session timing parameters.
///
/// The radio gives no flow-control signal while it switches modes or
/// assembles a response, so each write is followed by a fixed settle delay
/// before the reply is read. The defaults are tuned for the stock 921600
/// baud USB bridge; slower cables need longer delays.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Wait after sending PROGRAM before reading the acknowledgement
    pub enter_settle_delay: Duration,

    /// Wait after sending END. The mode switch back is quicker.
    pub exit_settle_delay: Duration,

    /// Wait after a read-memory request before collecting the response
    pub read_settle_delay: Duration,

    /// Deadline for accumulating one complete read response
    pub read_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enter_settle_delay: Duration::from_millis(100),
            exit_settle_delay: Duration::from_millis(30),
            read_settle_delay: Duration::from_millis(20),
            read_timeout: Duration::from_secs(2),
        }
    }
}

impl SessionConfig {
    /// Set the response accumulation deadline
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Scale the settle delays for a transport speed other than 921600 baud
    pub fn for_baud(baud_rate: u32) -> Self {
        let base = Self::default();
        let factor = (921_600f64 / baud_rate.max(1) as f64).max(1.0);
        let scale = |d: Duration| d.mul_f64(factor);
        Self {
            enter_settle_delay: scale(base.enter_settle_delay),
            exit_settle_delay: scale(base.exit_settle_delay),
            read_settle_delay: scale(base.read_settle_delay),
            read_timeout: base.read_timeout,
        }
    }
}

#[cfg(test)]
impl SessionConfig {
    /// Zero settle delays so protocol tests run at full speed
    pub(crate) fn immediate() -> Self {
        Self {
            enter_settle_delay: Duration::ZERO,
            exit_settle_delay: Duration::ZERO,
            read_settle_delay: Duration::ZERO,
            read_timeout: Duration::from_secs(5),
        }
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InProgramMode,
}

/// A programming session over a borrowed transport.
///
/// Created `Idle`; becomes `InProgramMode` only on a verified handshake
/// acknowledgement and returns to `Idle` when the exit exchange runs. The
/// session never closes the transport; that stays with the caller.
pub struct ProgramSession<'t, T: Transport> {
    transport: &'t mut T,
    config: SessionConfig,
    state: SessionState,
}

impl<'t, T: Transport> ProgramSession<'t, T> {
    pub fn new(transport: &'t mut T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    pub fn with_config(transport: &'t mut T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_in_program_mode(&self) -> bool {
        self.state == SessionState::InProgramMode
    }

    pub(crate) fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Switch the radio into program mode.
    ///
    /// Sends PROGRAM, waits for the radio to settle, and verifies the
    /// `QX\x06` acknowledgement byte-for-byte. A missing or mismatched
    /// acknowledgement leaves the session `Idle`. Entering twice without
    /// an intervening exit is a caller bug and is rejected outright.
    pub async fn enter_program_mode(&mut self) -> Result<()> {
        if self.state == SessionState::InProgramMode {
            return Err(ProtocolError::AlreadyInProgramMode);
        }

        self.transport.write_bytes(wire::ENTER_PROGRAM_MODE).await?;
        sleep(self.config.enter_settle_delay).await;

        let response = self.transport.read_chunk().await?.unwrap_or_default();
        tracing::debug!("enter program mode response: {:02X?}", response);

        if response != wire::ENTER_PROGRAM_MODE_ACK {
            return Err(ProtocolError::HandshakeFailed {
                expected: wire::ENTER_PROGRAM_MODE_ACK.to_vec(),
                actual: response,
            });
        }

        self.state = SessionState::InProgramMode;
        tracing::debug!("program mode established");
        Ok(())
    }

    /// Return the radio to normal operation.
    ///
    /// The session goes back to `Idle` no matter what the radio answers:
    /// exit runs unconditionally from cleanup paths and must always retire
    /// the session. A mismatched acknowledgement is still reported so the
    /// caller can decide whether to propagate it.
    pub async fn exit_program_mode(&mut self) -> Result<()> {
        self.state = SessionState::Idle;

        self.transport.write_bytes(wire::EXIT_PROGRAM_MODE).await?;
        sleep(self.config.exit_settle_delay).await;

        let response = self.transport.read_chunk().await?.unwrap_or_default();
        tracing::debug!("exit program mode response: {:02X?}", response);

        if response != [wire::ACK] {
            return Err(ProtocolError::HandshakeFailed {
                expected: vec![wire::ACK],
                actual: response,
            });
        }

        tracing::debug!("program mode exited");
        Ok(())
    }

    /// Ask the radio for its identity string.
    ///
    /// The response is returned verbatim; this layer does not decode the
    /// identity format.
    pub async fn identify(&mut self) -> Result<Vec<u8>> {
        self.ensure_program_mode()?;

        self.transport
            .write_bytes(&[wire::IDENTIFY_COMMAND])
            .await?;

        match self.transport.read_chunk().await? {
            Some(ident) => {
                tracing::debug!("radio identity: {:02X?}", ident);
                Ok(ident)
            }
            None => Err(ProtocolError::Serial(SerialError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no identity response",
            )))),
        }
    }

    /// Write a protocol frame. Only valid inside an established session.
    pub(crate) async fn send(&mut self, buf: &[u8]) -> Result<()> {
        self.ensure_program_mode()?;
        self.transport.write_bytes(buf).await?;
        Ok(())
    }

    /// Read one response chunk. Only valid inside an established session.
    pub(crate) async fn recv_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        self.ensure_program_mode()?;
        Ok(self.transport.read_chunk().await?)
    }

    fn ensure_program_mode(&self) -> Result<()> {
        match self.state {
            SessionState::InProgramMode => Ok(()),
            SessionState::Idle => Err(ProtocolError::NotInProgramMode),
        }
    }
}
