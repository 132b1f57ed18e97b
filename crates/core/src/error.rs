use derive_more::From;

pub use crate::mapping::error::{DecodeError, Field, ValidationError};
pub use crate::reconcile::error::{Operation, StorageError};

/// Any failure of a single invocation. None of them is retried.
#[derive(Debug, From, thiserror::Error)]
pub enum Error {
    /// The desired mapping was rejected before storage was touched.
    #[error(transparent)]
    Validation(ValidationError),
    /// Storage failed while reading or writing.
    #[error(transparent)]
    Storage(StorageError),
}
