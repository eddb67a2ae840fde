//! Crate-wide error types.

use thiserror::Error;

/// Main error type for a pipeline job.
#[derive(Error, Debug)]
pub enum LitesubError {
    /// A standard I/O error (file open, read, rename, ...)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The EBML/Matroska container could not be parsed
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// A track's codec ID is not one of the recognized text subtitle codecs
    #[error("unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// The requested subtitle track index has no corresponding track
    #[error("track index {requested} out of range ({available} available)")]
    TrackIndexOutOfRange { requested: usize, available: usize },

    /// A subtitle file (SRT/ASS/WebVTT) could not be parsed
    #[error("subtitle parse error: {0}")]
    SubtitleParseError(String),

    /// A translation backend failure that exhausted retries and fallbacks
    #[error("backend failure: {0}")]
    Backend(#[from] BackendFailure),

    /// Every backend in the chain failed for C consecutive batches
    #[error("translation aborted after {consecutive_failures} consecutive batch failures")]
    TranslationAborted { consecutive_failures: u32 },

    /// Fewer than the configured fraction of batches succeeded
    #[error("success rate too low: {succeeded}/{total} batches succeeded")]
    SuccessRateTooLow { succeeded: usize, total: usize },

    /// The backend returned text indistinguishable from the input for too
    /// large a fraction of entries -- a sign of a silently failing backend
    #[error("no translation progress: {unchanged}/{total} entries unchanged")]
    NoProgress { unchanged: usize, total: usize },

    /// The job was cancelled cooperatively; not a failure
    #[error("job cancelled")]
    Cancelled,

    /// Cache store error (I/O or metadata corruption)
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error, e.g. cache metadata sidecar
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML config file parse error
    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LitesubError>;

/// Typed failures a translation backend must distinguish (spec §4.6).
#[derive(Error, Debug, Clone)]
pub enum BackendFailure {
    /// Credential absent (API key, token, ...)
    #[error("backend auth missing")]
    AuthMissing,

    /// Server-signalled throttling; `retry_after` is seconds if provided
    #[error("backend rate limited (retry_after={retry_after:?})")]
    RateLimited { retry_after: Option<f64> },

    /// Network or 5xx failure; retryable
    #[error("backend transient error: {0}")]
    Transient(String),

    /// 4xx-class failure; not retryable
    #[error("backend invalid request: {0}")]
    Invalid(String),

    /// Returned sequence length did not match the input length
    #[error("backend shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// The requested language pair is not supported by this backend
    #[error("backend does not support this language pair")]
    Unsupported,
}

impl BackendFailure {
    /// Whether this failure should trigger a same-backend retry, as opposed
    /// to an immediate move to the fallback chain.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendFailure::Transient(_) | BackendFailure::RateLimited { .. }
        )
    }

    /// Whether this failure permanently disqualifies the backend for the
    /// remainder of the job (spec §4.7: "no permanent auth/unsupported
    /// failure recorded for this job").
    pub fn is_permanent(&self) -> bool {
        matches!(self, BackendFailure::AuthMissing | BackendFailure::Unsupported)
    }
}

/// Source-reader specific error, kept distinct from [`LitesubError`] so the
/// extractor can treat a short read as a stop condition rather than
/// propagating it as a hard failure (spec §4.1).
#[derive(Error, Debug)]
pub enum ByteSourceError {
    #[error("short read: wanted {wanted} bytes, got {got}")]
    ShortRead { wanted: usize, got: usize },

    #[error("seek target outside buffered window and source is not seekable")]
    NotSeekable,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ByteSourceError> for LitesubError {
    fn from(e: ByteSourceError) -> Self {
        match e {
            ByteSourceError::Io(io) => LitesubError::Io(io),
            other => LitesubError::MalformedContainer(other.to_string()),
        }
    }
}
