// Chunked memory reads over an established programming session

use std::sync::Arc;

use tokio::time::{sleep, timeout};

use super::session::ProgramSession;
use super::wire::{self, ReadRequest, ReadResponse};
use super::{ProtocolError, Result};
use crate::serial::Transport;

/// Progress callback type
/// Arguments: (bytes_transferred, total_bytes, status_message)
pub type ProgressCallback = Arc<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Reads radio memory through an active [`ProgramSession`].
///
/// The reader never touches the transport directly; every exchange goes
/// through the session, which requires program mode to be established.
pub struct MemoryReader<'s, 't, T: Transport> {
    session: &'s mut ProgramSession<'t, T>,
}

impl<'s, 't, T: Transport> MemoryReader<'s, 't, T> {
    pub fn new(session: &'s mut ProgramSession<'t, T>) -> Self {
        Self { session }
    }

    /// Read one 255-byte block starting at `address`.
    ///
    /// Sends the framed request, waits the settle delay, then accumulates
    /// response chunks until the full 263-byte frame has arrived. The
    /// accumulation runs under a deadline so a stalled device surfaces as
    /// [`ProtocolError::ReadTimeout`] instead of hanging forever. The frame
    /// is validated field by field before the data bytes are returned.
    pub async fn read_memory(&mut self, address: u32) -> Result<Vec<u8>> {
        let request = ReadRequest::new(address);
        self.session.send(&request.to_bytes()).await?;
        sleep(self.session.config().read_settle_delay).await;

        let deadline = self.session.config().read_timeout;
        let frame = timeout(deadline, self.accumulate_response())
            .await
            .map_err(|_| ProtocolError::ReadTimeout(deadline))??;

        tracing::trace!("read {:#010X}: {} bytes accumulated", address, frame.len());

        let response = ReadResponse::parse(frame, address)?;
        Ok(response.data().to_vec())
    }

    /// Collect transport chunks until a whole response frame is buffered
    /// or the stream ends
    async fn accumulate_response(&mut self) -> Result<Vec<u8>> {
        let mut frame = Vec::with_capacity(wire::READ_RESPONSE_LEN);
        while frame.len() < wire::READ_RESPONSE_LEN {
            match self.session.recv_chunk().await? {
                Some(chunk) => frame.extend_from_slice(&chunk),
                None => break,
            }
        }
        Ok(frame)
    }

    /// Read the complete codeplug region.
    ///
    /// Allocates the image once, then walks the address range in 255-byte
    /// strides. The range is not an exact multiple of the stride, so the
    /// final block is clipped to the remaining space. Any failed read
    /// aborts the whole download; no block is retried and no partial image
    /// is ever returned.
    pub async fn read_codeplug(&mut self, progress: Option<ProgressCallback>) -> Result<Vec<u8>> {
        let mut image = vec![0u8; wire::CODEPLUG_SIZE];

        let mut address = wire::MEMORY_LOW;
        while address < wire::MEMORY_HIGH {
            let data = self.read_memory(address).await?;

            let offset = (address - wire::MEMORY_LOW) as usize;
            let take = data.len().min(wire::CODEPLUG_SIZE - offset);
            image[offset..offset + take].copy_from_slice(&data[..take]);

            if let Some(ref callback) = progress {
                callback(offset + take, wire::CODEPLUG_SIZE, "Reading codeplug");
            }

            address += wire::READ_CHUNK_LEN as u32;
        }

        Ok(image)
    }
}
