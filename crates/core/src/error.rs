use thiserror::Error;

/// Top-level error type shared by every limebar crate.
///
/// Only conditions the bar cannot recover from travel through this type.
/// Malformed colors, segments and font indices are corrected where they
/// are found and never reach here.
#[derive(Debug, Error)]
pub enum BarError {
    #[error("config error: {0}")]
    Config(String),

    /// The pixel buffer could not be allocated, mapped or resized.
    #[error("surface error: {0}")]
    Surface(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("wayland error: {0}")]
    Wayland(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = BarError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        fn open() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        let err = open().unwrap_err();
        assert!(matches!(err, BarError::Io { .. }));
        assert_eq!(err.to_string(), "I/O error: gone");
    }
}
