use hepcore::candidate::error::GraphError;
use thiserror::Error;

/// Errors raised while configuring the writer or moving records in and out of sinks.
///
/// Projection itself never returns an error; a graph that breaks the shape
/// the projectors rely on is a bug upstream and panics instead.
#[derive(Error, Debug)]
pub enum TreeWriterError {
    /// Class name not in the output schema.
    #[error("cannot create branch for class '{0}'")]
    UnknownClass(String),

    /// Two configured branches share a name.
    #[error("branch '{0}' is already defined")]
    DuplicateBranch(String),

    /// A detector card line that looks like a branch definition but is not one.
    #[error("malformed branch definition at line {line}: '{text}'")]
    MalformedCardLine { line: usize, text: String },

    /// An input event whose candidate graph breaks the arena invariants.
    #[error("event {number}: {source}")]
    InvalidEvent {
        number: u64,
        #[source]
        source: GraphError,
    },

    #[error("invalid card pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record encoding failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("record decoding failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type TreeWriterResult<T> = Result<T, TreeWriterError>;
