// AnyTone AT-D878UV radio driver
//
// The radio exposes its configuration memory over a USB serial bridge.
// A download is one programming session: enter program mode, walk the
// codeplug address range in framed 255-byte reads, exit program mode.

use std::sync::Arc;

use super::traits::{CloneModeRadio, Radio, RadioError, RadioResult, StatusCallback};
use crate::proto::{
    MemoryReader, ProgramSession, ProgressCallback, SessionConfig, CODEPLUG_SIZE,
};
use crate::serial::Transport;

/// USB vendor ID of the radio's serial bridge (GigaDevice)
pub const USB_VENDOR_ID: u16 = 0x28E9;

/// USB product ID of the radio's serial bridge
pub const USB_PRODUCT_ID: u16 = 0x018A;

/// AT-D878UV driver
pub struct At878Uv {
    vendor: String,
    model: String,
    config: SessionConfig,
}

impl At878Uv {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create a driver with custom session timing, e.g. for slow cables
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            vendor: "AnyTone".to_string(),
            model: "AT-D878UV".to_string(),
            config,
        }
    }

    /// Run the END exchange from a cleanup path. A failure here is
    /// logged; it never masks a primary error or discards a completed
    /// download.
    async fn exit_best_effort<T: Transport>(session: &mut ProgramSession<'_, T>) {
        if let Err(e) = session.exit_program_mode().await {
            tracing::warn!("Failed to exit program mode: {}", e);
        }
    }
}

impl Default for At878Uv {
    fn default() -> Self {
        Self::new()
    }
}

impl Radio for At878Uv {
    fn vendor(&self) -> &str {
        &self.vendor
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn usb_vendor_id(&self) -> u16 {
        USB_VENDOR_ID
    }

    fn usb_product_id(&self) -> u16 {
        USB_PRODUCT_ID
    }

    fn codeplug_size(&self) -> usize {
        CODEPLUG_SIZE
    }
}

impl CloneModeRadio for At878Uv {
    async fn download<T: Transport>(
        &mut self,
        transport: &mut T,
        status_fn: Option<StatusCallback>,
    ) -> RadioResult<Vec<u8>> {
        let mut session = ProgramSession::with_config(transport, self.config.clone());
        session.enter_program_mode().await?;

        tracing::info!("Downloading codeplug ({} bytes)", CODEPLUG_SIZE);

        let progress = status_fn.map(|f| -> ProgressCallback { Arc::from(f) });
        let result = MemoryReader::new(&mut session).read_codeplug(progress).await;

        // Exit is attempted on success and failure alike
        Self::exit_best_effort(&mut session).await;

        let image = result?;

        if image.len() != CODEPLUG_SIZE {
            return Err(RadioError::CodeplugLength {
                expected: CODEPLUG_SIZE,
                actual: image.len(),
            });
        }

        tracing::info!("Download complete");
        Ok(image)
    }

    async fn identify<T: Transport>(&mut self, transport: &mut T) -> RadioResult<Vec<u8>> {
        let mut session = ProgramSession::with_config(transport, self.config.clone());
        session.enter_program_mode().await?;

        let result = session.identify().await;
        Self::exit_best_effort(&mut session).await;

        result.map_err(RadioError::from)
    }
}
