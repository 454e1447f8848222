// Radio driver traits

use std::fmt;
use thiserror::Error;

use crate::proto::ProtocolError;
use crate::serial::{SerialError, Transport};

#[derive(Error, Debug)]
pub enum RadioError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Serial communication error: {0}")]
    Serial(#[from] SerialError),

    #[error("Codeplug length mismatch: expected {expected} bytes, got {actual}")]
    CodeplugLength { expected: usize, actual: usize },
}

pub type RadioResult<T> = std::result::Result<T, RadioError>;

/// Progress callback for download operations
pub type StatusCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Base trait for all radio drivers
pub trait Radio: Send {
    /// Get the radio vendor name
    fn vendor(&self) -> &str;

    /// Get the radio model name
    fn model(&self) -> &str;

    /// USB vendor ID of the radio's serial bridge
    fn usb_vendor_id(&self) -> u16;

    /// USB product ID of the radio's serial bridge
    fn usb_product_id(&self) -> u16;

    /// Size of the radio's configuration memory image in bytes
    fn codeplug_size(&self) -> usize;

    /// Get a printable name for this radio
    fn get_name(&self) -> String {
        format!("{} {}", self.vendor(), self.model())
    }
}

/// Trait for radios that support clone mode (full memory dump)
pub trait CloneModeRadio: Radio {
    /// Download the radio's full configuration memory.
    /// This initiates a radio-to-PC clone operation.
    async fn download<T: Transport>(
        &mut self,
        transport: &mut T,
        status_fn: Option<StatusCallback>,
    ) -> RadioResult<Vec<u8>>;

    /// Read the radio's identity string
    async fn identify<T: Transport>(&mut self, transport: &mut T) -> RadioResult<Vec<u8>>;
}

/// Status information for progress reporting
#[derive(Debug, Clone)]
pub struct Status {
    pub current: usize,
    pub max: usize,
    pub message: String,
}

impl Status {
    pub fn new(current: usize, max: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            max,
            message: message.into(),
        }
    }

    pub fn percent(&self) -> f32 {
        if self.max == 0 {
            return 100.0;
        }
        (self.current as f32 / self.max as f32) * 100.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}/{} - {:.1}%)",
            self.message,
            self.current,
            self.max,
            self.percent()
        )
    }
}
