//! Error types for modsync-core

use modsync_fs::ContentHash;

/// Result type for modsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in modsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, DNS or timeout failure talking to the manifest server
    #[error("Network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Unexpected status or unparseable response body
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Manifest parsed but is semantically invalid
    #[error("Invalid manifest: {message}")]
    Manifest { message: String },

    /// Fetching or installing a single artifact failed
    #[error("Failed to download {filename}: {reason}")]
    Download { filename: String, reason: String },

    /// Downloaded content does not match the manifest hash
    #[error("Integrity check failed for {filename}: expected {expected}, got {actual}")]
    Integrity {
        filename: String,
        expected: ContentHash,
        actual: ContentHash,
    },

    /// Configuration is missing or invalid
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Filesystem error from modsync-fs
    #[error(transparent)]
    Fs(#[from] modsync_fs::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

/// Coarse error category, for hosts that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Protocol,
    Manifest,
    Io,
    Download,
    Integrity,
    Config,
}

impl Error {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }

    pub fn download(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Download {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::Manifest { .. } => ErrorKind::Manifest,
            Self::Download { .. } => ErrorKind::Download,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::Config { .. } | Self::TomlDe(_) => ErrorKind::Config,
            Self::Fs(_) => ErrorKind::Io,
        }
    }
}
