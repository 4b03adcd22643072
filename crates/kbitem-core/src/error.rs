//! Error type shared by the ordered collections, the rank scale and the data model.

/// Errors raised by data-model operations.
///
/// Every operation validates its input before writing, so a returned error
/// means the receiver was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataModelError {
    /// Malformed input: an unknown rank ordinal, a bad property id, and so on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A numeric index outside the bounds of the current state.
    #[error("index {index} is out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
    /// Lookup by property id or by element identity found nothing.
    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, DataModelError>;
