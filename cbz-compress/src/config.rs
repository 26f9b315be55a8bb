use camino::{Utf8Path, Utf8PathBuf};

use crate::{Error, Result};

/// Suffix required of the input archive path, checked verbatim
pub static ARCHIVE_EXTENSION: &str = ".cbz";

/// Inserted before the extension when the output path has to be derived
pub static OUTPUT_SUFFIX: &str = "_compressed";

/// Jpeg quality used when none is provided
pub static DEFAULT_QUALITY: u8 = 50;

/// A validated run configuration, built once from the raw arguments and never
/// mutated afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    input: Utf8PathBuf,
    output: Utf8PathBuf,
    quality: u8,
}

impl Config {
    /// Validates the raw arguments and derives the output path when none is
    /// provided; an empty output path counts as none.
    ///
    /// The input path must end in `.cbz` (case-sensitive, checked on the raw
    /// path string) and the quality must be between 1 and 100 inclusive. The
    /// derived output path is the input path with its extension replaced by
    /// `_compressed.cbz`. No I/O happens here.
    ///
    /// ## Errors
    ///
    /// Fails with `Error::InvalidExtension`, then `Error::InvalidQuality`, in
    /// that order of checks
    pub fn new(input: Utf8PathBuf, output: Option<Utf8PathBuf>, quality: u8) -> Result<Self> {
        let Some(stem) = input.as_str().strip_suffix(ARCHIVE_EXTENSION) else {
            return Err(Error::InvalidExtension(input));
        };

        if !(1..=100).contains(&quality) {
            return Err(Error::InvalidQuality(quality));
        }

        let output = output
            .filter(|path| !path.as_str().is_empty())
            .unwrap_or_else(|| {
                Utf8PathBuf::from(format!("{stem}{OUTPUT_SUFFIX}{ARCHIVE_EXTENSION}"))
            });

        Ok(Self {
            input,
            output,
            quality,
        })
    }

    #[must_use]
    pub fn input(&self) -> &Utf8Path {
        &self.input
    }

    #[must_use]
    pub fn output(&self) -> &Utf8Path {
        &self.output
    }

    #[must_use]
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_input_without_cbz_extension() {
        let err = Config::new("foo.txt".into(), None, 50).unwrap_err();

        assert!(matches!(err, Error::InvalidExtension(path) if path == "foo.txt"));
    }

    #[test]
    fn extension_check_is_case_sensitive() {
        assert!(matches!(
            Config::new("foo.CBZ".into(), None, 50),
            Err(Error::InvalidExtension(_))
        ));
    }

    #[test]
    fn rejects_quality_zero() {
        assert!(matches!(
            Config::new("foo.cbz".into(), None, 0),
            Err(Error::InvalidQuality(0))
        ));
    }

    #[test]
    fn rejects_quality_above_one_hundred() {
        assert!(matches!(
            Config::new("foo.cbz".into(), None, 101),
            Err(Error::InvalidQuality(101))
        ));
    }

    #[test]
    fn accepts_quality_bounds() {
        assert_eq!(Config::new("foo.cbz".into(), None, 1).unwrap().quality(), 1);
        assert_eq!(
            Config::new("foo.cbz".into(), None, 100).unwrap().quality(),
            100
        );
    }

    #[test]
    fn extension_is_checked_before_quality() {
        assert!(matches!(
            Config::new("foo.txt".into(), None, 0),
            Err(Error::InvalidExtension(_))
        ));
    }

    #[test]
    fn derives_the_output_path_from_the_input() {
        let config = Config::new("a.cbz".into(), None, 50).unwrap();

        assert_eq!(config.output().as_str(), "a_compressed.cbz");
    }

    #[test]
    fn derived_output_path_keeps_the_directory() {
        let config = Config::new("scans/vol1.cbz".into(), None, 50).unwrap();

        assert_eq!(config.output().as_str(), "scans/vol1_compressed.cbz");
    }

    #[test]
    fn explicit_output_path_is_used_verbatim() {
        let config = Config::new("a.cbz".into(), Some("out/b.cbz".into()), 50).unwrap();

        assert_eq!(config.output().as_str(), "out/b.cbz");
    }

    #[test]
    fn empty_output_path_falls_back_to_derivation() {
        let config = Config::new("a.cbz".into(), Some("".into()), 50).unwrap();

        assert_eq!(config.output().as_str(), "a_compressed.cbz");
    }
}
