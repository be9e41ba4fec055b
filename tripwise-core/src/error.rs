#[derive(Debug, thiserror::Error)]
pub enum TripwiseError {
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<TripwiseError>,
    },

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl TripwiseError {
    /// HTTP status carried by this error, looking through retry exhaustion.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TripwiseError::Http { status, .. } => Some(*status),
            TripwiseError::RetriesExhausted { source, .. } => source.status_code(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TripwiseError>;
