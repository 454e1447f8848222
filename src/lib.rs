// ANYTONE-RS: codeplug programming for AnyTone radios
// Copyright 2024 - Licensed under GPLv3

pub mod drivers;
pub mod formats;
pub mod proto;
pub mod serial;

// Re-export commonly used types
pub use drivers::{
    init_drivers, list_drivers, CloneModeRadio, Radio, RadioError, Status, StatusCallback,
};
pub use formats::{load_codeplug, save_codeplug, CodeplugFileError};
pub use proto::{
    MemoryReader, ProgramSession, ProtocolError, SessionConfig, SessionState, CODEPLUG_SIZE,
    MEMORY_HIGH, MEMORY_LOW,
};
pub use serial::{SerialConfig, SerialError, SerialPort, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
