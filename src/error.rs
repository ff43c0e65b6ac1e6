use thiserror::Error;

pub type Result<T> = std::result::Result<T, SymdexError>;

#[derive(Debug, Error)]
pub enum SymdexError {
    #[error("invalid record #{position} ({key:?}): {reason}")]
    InvalidRecord {
        position: usize,
        key: String,
        reason: String,
    },

    #[error("batch produced no usable records")]
    EmptyBatch,

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("{source_name}: parse error at byte {offset}: {message}")]
    Parse {
        source_name: String,
        offset: usize,
        message: String,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

impl SymdexError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRecord { .. } => "INVALID_RECORD",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Pattern(_) => "PATTERN_ERROR",
        }
    }

    /// Errors that only affect a single record or entry of a batch.
    pub fn is_per_record(&self) -> bool {
        matches!(self, Self::InvalidRecord { .. } | Self::Parse { .. })
    }

    pub(crate) fn invalid_record(position: usize, key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            position,
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
