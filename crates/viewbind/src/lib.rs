//! ## Crate layout
//! - `build`: build-script side; scans a crate and writes its binders.
//! - `core`: runtime side; binder contract, registry and locator.
//! - `Bind`: derive that marks a struct as a binding host.
//!
//! A host crate needs three things: `viewbind::build!()` in `build.rs`,
//! `viewbind::include_binders!()` at its crate root, and `#[derive(Bind)]`
//! with `#[bind(slot)]` fields on each host struct.

pub use viewbind_build as build;
pub use viewbind_core as core;

// generated code refers to the runtime through this crate
pub use viewbind_core::{__internal, __reexports, binder, contract, error, registry, source};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Runtime surface
//

pub use viewbind_core::{
    BINDER_SUFFIX, BindHost, Binder, CONTRACT_VERSION, ContentView, Error, InjectError,
    LocateError, Registry, SlotMap, ValueSource, binder_name, inject, inject_with, locate,
    locate_by_name, locate_in,
};

//
// Macros
//

pub use viewbind_build::build;
pub use viewbind_core::include_binders;
pub use viewbind_derive::Bind;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Bind, BindHost as _, Binder as _, ContentView, SlotMap, ValueSource as _, inject,
        inject_with, locate,
    };
}
