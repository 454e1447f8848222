// Codeplug file formats
pub mod bin;

pub use bin::{load_codeplug, save_codeplug, CodeplugFileError};
