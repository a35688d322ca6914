use thiserror::Error;

/// Application-level errors using thiserror for structured error handling.
///
/// Each enum covers one concern. Recoverable conditions (an unavailable
/// window, a bad counter row) never surface here; they are handled where
/// they happen. These errors are what callers actually have to deal with.

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read counter file: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write counter file: {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to enumerate windows")]
    EnumerationFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to capture window '{title}'")]
    CaptureFailed {
        title: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to read replay file: {path}")]
    ReplayUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize OCR engine")]
    InitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to perform OCR on image")]
    RecognitionFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to encode image for OCR")]
    EncodeFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine a config directory")]
    NoConfigDir,
}

#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Failed to bind status server to {addr}")]
    BindFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn status server thread")]
    ThreadSpawnFailed(#[source] std::io::Error),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
