//! Declarative management of a ProxySQL Galera hostgroup mapping.
//!
//! A Galera hostgroup mapping is one row of ProxySQL's `mysql_galera_hostgroups`
//! admin table. It ties a writer hostgroup to its companion backup-writer,
//! reader and offline hostgroups, which ProxySQL uses to route traffic and
//! fail over between Galera nodes.
//!
//! The crate converges that row to a desired state:
//!
//! 1. **Validate** raw input into a [`HostgroupMapping`] with [`validate()`].
//!    Invalid input is rejected before any storage access.
//! 2. **Reconcile** the mapping against storage with a [`Reconciler`]. The
//!    current row is read by its `writer_hostgroup` key, and then inserted,
//!    updated column by column, or deleted, depending on the requested
//!    [`State`].
//! 3. Optionally **persist** and/or **activate** the in-memory configuration
//!    once a mutation has been applied.
//!
//! Storage is abstracted behind the [`Storage`] trait. The handle is lent to
//! the reconciler by the caller, which owns its whole lifecycle.
//!
//! ```rust,ignore
//! use galera_hostgroups_core::{validate, Options, RawMapping, Reconciler, State};
//!
//! let desired = validate(&raw)?;
//! let outcome = Reconciler::new(&mut storage, Options::default())
//!     .converge(&desired, State::Present)?;
//! println!("changed: {}", outcome.changed);
//! ```
//!
//! # Crate features
//!
//! - **`serde`** -- enables `Serialize` on the result types ([`Outcome`],
//!   [`HostgroupMapping`], [`FieldChange`]).

pub mod error;
pub mod mapping;
pub mod reconcile;
pub mod record;
pub mod storage;

pub use error::Error;
pub use mapping::{validate, CheckType, HostgroupMapping, RawMapping, WriterIsAlsoReader};
pub use reconcile::{exists, fetch, OptionalColumns, Options, Outcome, Reconciler, State};
pub use record::{diff, FieldChange, Record, Row, Value};
pub use storage::{ConfigCategory, Storage};
