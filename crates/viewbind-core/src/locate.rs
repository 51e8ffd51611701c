//! Runtime locator: resolves a host to its generated binder by name and
//! invokes it.

use crate::{
    binder::Binder,
    contract::{BindHost, CONTRACT_VERSION, binder_name},
    error::{Error, LocateError},
    registry::{Registry, registry_read},
    source::{ContentView, ValueSource},
};
use std::any::{TypeId, type_name};

/// Find the binder generated for `host` in the process-wide registry.
pub fn locate<H: BindHost>(host: &H) -> Result<&'static dyn Binder, LocateError> {
    locate_in(&registry_read(), host)
}

/// Find the binder generated for `host` in the given registry.
pub fn locate_in<H: BindHost>(
    registry: &Registry,
    _host: &H,
) -> Result<&'static dyn Binder, LocateError> {
    let binder = resolve(registry, &binder_name(H::PATH))?;

    if binder.host_type_id() != TypeId::of::<H>() {
        return Err(LocateError::HostMismatch {
            binder: binder.binder_name().to_string(),
            host: type_name::<H>(),
        });
    }

    Ok(binder)
}

/// Find a binder by its full name in the process-wide registry.
pub fn locate_by_name(name: &str) -> Result<&'static dyn Binder, LocateError> {
    resolve(&registry_read(), name)
}

// resolve
// name lookup plus the contract version check shared by every entry point
fn resolve(registry: &Registry, name: &str) -> Result<&'static dyn Binder, LocateError> {
    let binder = registry
        .get(name)
        .ok_or_else(|| LocateError::BinderNotFound {
            expected: name.to_string(),
        })?;

    let found = binder.contract_version();
    if found != CONTRACT_VERSION {
        return Err(LocateError::ContractMismatch {
            binder: name.to_string(),
            expected: CONTRACT_VERSION,
            found,
        });
    }

    Ok(binder)
}

/// Inject a host that carries its own value source.
pub fn inject<H: BindHost + ContentView>(host: &mut H) -> Result<(), Error> {
    let root = host.content_view();

    inject_with(host, &root)
}

/// Inject a host from an explicit value source.
pub fn inject_with<H: BindHost>(host: &mut H, source: &dyn ValueSource) -> Result<(), Error> {
    let binder = locate(host)?;
    binder.inject(host, source)?;

    Ok(())
}

///
/// TESTS
///
