use thiserror::Error;

pub type Result<T> = std::result::Result<T, TablyErr>;

#[derive(Debug, Error)]
pub enum TablyErr {
    #[error("error: {0}")]
    Error(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("registration failed: {0}")]
    Registration(String),

    /// Registry could not produce an address for the requested service.
    #[error("resolution failed: {0}")]
    Resolution(String),

    /// The downstream call itself failed after an address was resolved.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TablyErr {
    /// HTTP status class for this error. Decode is a transport failure for
    /// propagation purposes and shares its 502 class.
    pub fn status(&self) -> u16 {
        match self {
            TablyErr::InvalidArgument(_) | TablyErr::Validation(_) => 400,
            TablyErr::NotFound(_) => 404,
            TablyErr::Resolution(_) | TablyErr::Transport(_) | TablyErr::Decode(_) => 502,
            TablyErr::Timeout(_) => 504,
            _ => 500,
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        TablyErr::InvalidArgument(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        TablyErr::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        TablyErr::NotFound(msg.into())
    }

    pub fn registration(msg: impl Into<String>) -> Self {
        TablyErr::Registration(msg.into())
    }

    pub fn resolution(msg: impl Into<String>) -> Self {
        TablyErr::Resolution(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        TablyErr::Transport(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        TablyErr::Decode(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        TablyErr::Timeout(msg.into())
    }
}

impl From<String> for TablyErr {
    fn from(s: String) -> Self {
        TablyErr::Error(s)
    }
}

impl From<&str> for TablyErr {
    fn from(s: &str) -> Self {
        TablyErr::Error(s.to_string())
    }
}
