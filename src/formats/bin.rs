// Flat binary codeplug files
//
// The persisted artifact is the raw memory image: no header, no metadata,
// length exactly equal to the codeplug region.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

use crate::proto::CODEPLUG_SIZE;

#[derive(Error, Debug)]
pub enum CodeplugFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codeplug length mismatch: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CodeplugFileError>;

/// Save a codeplug image as a flat binary file.
/// Refuses images that are not exactly one codeplug long.
pub fn save_codeplug(filename: impl AsRef<Path>, image: &[u8]) -> Result<()> {
    if image.len() != CODEPLUG_SIZE {
        return Err(CodeplugFileError::Length {
            expected: CODEPLUG_SIZE,
            actual: image.len(),
        });
    }

    let mut file = File::create(filename)?;
    file.write_all(image)?;
    Ok(())
}

/// Load a codeplug image from a flat binary file.
/// Refuses files that are not exactly one codeplug long.
pub fn load_codeplug(filename: impl AsRef<Path>) -> Result<Vec<u8>> {
    let mut file = File::open(filename)?;
    let mut image = Vec::new();
    file.read_to_end(&mut image)?;

    if image.len() != CODEPLUG_SIZE {
        return Err(CodeplugFileError::Length {
            expected: CODEPLUG_SIZE,
            actual: image.len(),
        });
    }

    Ok(image)
}
