use core::fmt::{Display, Formatter, Result};

use crate::storage::ConfigCategory;

/// Storage operation attempted by the reconciler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Connect,
    Count,
    Fetch,
    Insert,
    /// Single-column update of the named column.
    Update(&'static str),
    Delete,
    Persist(ConfigCategory),
    Activate(ConfigCategory),
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Connect => write!(f, "connect to ProxySQL admin interface"),
            Self::Count => write!(f, "count galera hostgroups"),
            Self::Fetch => write!(f, "fetch galera hostgroup"),
            Self::Insert => write!(f, "insert galera hostgroup"),
            Self::Update(column) => write!(f, "update galera hostgroup {column}"),
            Self::Delete => write!(f, "delete galera hostgroup"),
            Self::Persist(category) => write!(f, "save {category} to disk"),
            Self::Activate(category) => write!(f, "load {category} to runtime"),
        }
    }
}

/// A failure reported by storage, with the operation that was attempted.
///
/// The underlying error is kept verbatim as the [`source`](std::error::Error::source).
#[derive(Debug, thiserror::Error)]
#[error("unable to {operation}: {source}")]
pub struct StorageError {
    operation: Operation,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl StorageError {
    pub fn new<E>(operation: Operation, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            operation,
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }
}
