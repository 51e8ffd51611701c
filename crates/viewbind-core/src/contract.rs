//! The naming contract between build time and run time.
//!
//! The generator names every artifact with [`binder_name`] and the locator
//! looks it up with the same function, so the two sides cannot drift apart.

/// Suffix appended to a host's qualified path to form its binder name.
pub const BINDER_SUFFIX: &str = "$$Bind";

/// Version of the generated-binder contract.
///
/// Embedded in every generated binder; the locator refuses binders built
/// against a different version instead of invoking them.
pub const CONTRACT_VERSION: u32 = 1;

/// Derive the binder name for a host's fully-qualified path.
#[must_use]
pub fn binder_name(host_path: &str) -> String {
    format!("{host_path}{BINDER_SUFFIX}")
}

///
/// BindHost
///
/// Implemented by `#[derive(Bind)]`. `PATH` is the host's fully-qualified
/// path (`crate::module::Type`), the runtime half of the naming contract.
///

pub trait BindHost: 'static {
    const PATH: &'static str;

    /// Name of the binder generated for this host.
    #[must_use]
    fn binder_name() -> String {
        binder_name(Self::PATH)
    }
}

///
/// TESTS
///
