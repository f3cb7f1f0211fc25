use thiserror::Error;

/// Main error type for the ledlog-render library
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while reading render logs and location files
#[derive(Error, Debug)]
pub enum InputError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Malformed row {line} in {path}: {reason}")]
    MalformedRow {
        path: String,
        line: u64,
        reason: String,
    },

    #[error("Malformed location row {line} in {path}: {reason}")]
    MalformedLocation {
        path: String,
        line: u64,
        reason: String,
    },

    #[error("Render log contains no frames: {path}")]
    EmptyInput { path: String },
}

/// Errors raised while mapping LEDs onto the canvas
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("LED index {index} is outside the layout ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    CoordinateOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Errors raised by the image writers and the optimizer pass
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("GIF encoding failed: {reason}")]
    Gif { reason: String },

    #[error("PNG encoding failed: {reason}")]
    Png { reason: String },

    #[error("Canvas of {width}x{height} exceeds the {format} size limit")]
    TooLarge {
        format: &'static str,
        width: u32,
        height: u32,
    },

    #[error("Optimizer failed: {reason}")]
    Optimizer { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Coarse classification used for reporting and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    MalformedRow,
    MalformedLocation,
    IndexOutOfRange,
    CoordinateOutOfBounds,
    EmptyInput,
    EncodingFailure,
    Config,
    Io,
    Other,
}

/// Convenience type alias for Results using RenderError
pub type Result<T> = std::result::Result<T, RenderError>;

impl RenderError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(InputError::FileNotFound { .. }) => ErrorKind::FileNotFound,
            Self::Input(InputError::MalformedRow { .. }) => ErrorKind::MalformedRow,
            Self::Input(InputError::MalformedLocation { .. }) => ErrorKind::MalformedLocation,
            Self::Input(InputError::EmptyInput { .. }) => ErrorKind::EmptyInput,
            Self::Layout(LayoutError::IndexOutOfRange { .. }) => ErrorKind::IndexOutOfRange,
            Self::Layout(LayoutError::CoordinateOutOfBounds { .. }) => {
                ErrorKind::CoordinateOutOfBounds
            }
            Self::Encoding(_) => ErrorKind::EncodingFailure,
            Self::Config(ConfigError::FileNotFound { .. }) => ErrorKind::FileNotFound,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Generic(_) => ErrorKind::Other,
        }
    }

    /// Setup errors abort the whole run before any file is rendered;
    /// everything else only fails one file
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Input(InputError::FileNotFound { .. })
                | Self::Input(InputError::MalformedLocation { .. })
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Input(InputError::FileNotFound { path }) => {
                format!("Could not open '{}'. Please check the file exists.", path)
            }
            Self::Input(InputError::EmptyInput { path }) => {
                format!("'{}' has no frames to render.", path)
            }
            Self::Layout(LayoutError::IndexOutOfRange { index, len }) => {
                format!(
                    "LED {} has no location (the location file lists {} LEDs).",
                    index, len
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err: RenderError = InputError::EmptyInput { path: "a.csv".into() }.into();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);

        let err: RenderError = LayoutError::IndexOutOfRange { index: 5, len: 3 }.into();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);

        let err: RenderError = EncodingError::Optimizer { reason: "boom".into() }.into();
        assert_eq!(err.kind(), ErrorKind::EncodingFailure);
    }

    #[test]
    fn test_setup_errors() {
        let err: RenderError = ConfigError::InvalidValue {
            key: "jobs.workers".into(),
            value: "0".into(),
        }
        .into();
        assert!(err.is_setup_error());

        let err: RenderError = InputError::FileNotFound { path: "a.csv".into() }.into();
        assert!(err.is_setup_error());

        let err: RenderError = InputError::EmptyInput { path: "a.csv".into() }.into();
        assert!(!err.is_setup_error());
    }

    #[test]
    fn test_user_message_mentions_path() {
        let err: RenderError = InputError::FileNotFound { path: "missing.csv".into() }.into();
        assert!(err.user_message().contains("missing.csv"));
    }
}
