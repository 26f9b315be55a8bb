use std::{io, result};

use camino::Utf8PathBuf;
use zip::result::ZipError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] ZipError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid input file {0}: not a .cbz archive")]
    InvalidExtension(Utf8PathBuf),

    #[error("invalid quality {0}, must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("archive entry is too large to buffer in memory")]
    EntryTooLarge,
}

pub type Result<T, E = Error> = result::Result<T, E>;
