//! ## Crate layout
//! - `binder`: the contract every generated binder implements, plus the
//!   helpers generated code calls into.
//! - `contract`: the naming contract shared with the build-time generator.
//! - `error`: runtime error types.
//! - `locate`: host -> binder resolution and the `inject` entry points.
//! - `registry`: the name-keyed binder table, local and process-wide.
//! - `source`: the value-source interface and the `SlotMap` implementation.
//!
//! Nothing here inspects types at runtime beyond `Any` downcasts; binders are
//! generated ahead of time by `viewbind-build` and registered through the
//! table emitted next to them.

pub mod binder;
pub mod contract;
pub mod error;
pub mod locate;
pub mod macros;
pub mod registry;
pub mod source;

pub use binder::Binder;
pub use contract::{BINDER_SUFFIX, BindHost, CONTRACT_VERSION, binder_name};
pub use error::{Error, InjectError, LocateError};
pub use locate::{inject, inject_with, locate, locate_by_name, locate_in};
pub use registry::Registry;
pub use source::{ContentView, SlotMap, ValueSource};

/// re-exports
///
/// generated code reaches its dependencies through here so the host crate
/// does not have to list them in its own Cargo.toml
pub mod __reexports {
    pub use ctor;
}

/// Helpers called from generated binders. Not a stable API.
#[doc(hidden)]
pub mod __internal {
    pub use crate::binder::{downcast_host, fetch};
}
