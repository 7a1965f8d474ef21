use std::time::Duration;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure of a single transport attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, reset, ...).
    Network(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The body could not be decoded as JSON.
    Decode(String),
    /// The fallback transport did not answer within its fixed timeout.
    FallbackTimeout(Duration),
    /// The fallback transport answered, but not with a usable callback script.
    FallbackTransport(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Status(status) => write!(f, "request failed with status {status}"),
            FetchError::Decode(msg) => write!(f, "invalid JSON response: {msg}"),
            FetchError::FallbackTimeout(timeout) => {
                write!(f, "fallback timed out after {}s", timeout.as_secs_f64())
            }
            FetchError::FallbackTransport(msg) => write!(f, "fallback transport error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// A load cycle that ended without data.
///
/// `fallback` is `None` when no fallback transport was configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub primary: FetchError,
    pub fallback: Option<FetchError>,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.fallback {
            Some(fallback) => write!(f, "primary: {}; fallback: {fallback}", self.primary),
            None => write!(f, "{}", self.primary),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(4, format!("Failed to load sales data ({err})."))
    }
}
