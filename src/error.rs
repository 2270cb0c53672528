use std::fmt;
use std::path::PathBuf;

/// Failure modes of board construction and image generation.
#[derive(Debug)]
pub enum GaltonError {
    /// A construction parameter or a render argument was rejected.
    InvalidParameter {
        param: &'static str,
        reason: &'static str,
    },
    /// The output image could not be created, encoded, or written.
    Io {
        path: PathBuf,
        source: image::ImageError,
    },
    /// Count labels were requested but no usable system font was found.
    FontUnavailable,
}

impl fmt::Display for GaltonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { param, reason } => {
                write!(f, "invalid parameter `{param}`: {reason}")
            }
            Self::Io { path, source } => {
                write!(f, "failed to write image {}: {source}", path.display())
            }
            Self::FontUnavailable => {
                write!(f, "no system font found for rendering count labels")
            }
        }
    }
}

impl std::error::Error for GaltonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Io { source, .. } = self {
            return Some(source);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_names_the_parameter() {
        let err = GaltonError::InvalidParameter {
            param: "num_rows",
            reason: "must be positive",
        };
        let msg = err.to_string();
        assert!(msg.contains("num_rows"), "message should name the parameter: {msg}");
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_io_error_carries_path_and_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = GaltonError::Io {
            path: PathBuf::from("out/galton.png"),
            source: image::ImageError::IoError(inner),
        };
        assert!(err.to_string().contains("galton.png"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
