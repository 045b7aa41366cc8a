use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown attribute type: {0}")]
    UnknownType(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Mismatched sample lengths: {left} vs {right}")]
    MismatchedLength { left: usize, right: usize },

    #[error("Computation aborted")]
    Aborted,

    #[error("Worker failure in {routine}: {message}")]
    Worker { routine: String, message: String },

    #[error("Worker pool is shut down")]
    PoolClosed,

    #[error("No measure applies to {0}")]
    NoMeasure(String),

    #[error("Column not found: {0}")]
    UnknownColumn(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the computation was abandoned because it was superseded,
    /// as opposed to failing.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Error::Aborted)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
