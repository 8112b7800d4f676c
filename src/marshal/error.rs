/// Contract violations of the hash marshaling engine.
///
/// Apart from `NotFound`, these point at a programming error in the caller or a
/// corrupted stored record and are never worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("field {field:?} is marked expand but is neither a record nor a string map")]
    InvalidExpand { field: String },

    #[error("invalid destination: {0}")]
    InvalidDestination(&'static str),

    #[error("stored value for field {field:?} is invalid: {reason}")]
    InvalidStoredValue { field: String, reason: String },

    #[error("field name {name:?} contains the reserved separator '_'")]
    ReservedName { name: String },

    #[error("malformed field annotation {tag:?}: {reason}")]
    InvalidTag { tag: String, reason: String },

    #[error("no hash fields found")]
    NotFound,
}
