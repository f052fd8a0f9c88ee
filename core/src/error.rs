use uuid::Uuid;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("block index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no current block")]
    NoCurrentBlock,
    #[error("unknown block {0}")]
    UnknownBlock(Uuid),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SequenceError> for HandlerError {
    fn from(err: SequenceError) -> Self {
        Self::new(err.to_string())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("handler for {channel} failed: {source}")]
    Handler {
        channel: String,
        #[source]
        source: HandlerError,
    },
    #[error("{channel} emitted while already dispatching {channel}")]
    Reentrant { channel: String },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
