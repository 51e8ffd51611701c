use crate::{error::InjectError, source::ValueSource};
use std::any::{Any, TypeId, type_name};

///
/// Binder
///
/// The contract every generated binder implements. One binder exists per
/// host type; `inject` assigns each declared field from the value source.
///

pub trait Binder: Send + Sync + 'static {
    /// Binder name, `<host path>$$Bind`.
    fn binder_name(&self) -> &'static str;

    /// Contract version the binder was generated against.
    fn contract_version(&self) -> u32;

    /// `TypeId` of the host type the binder assigns into.
    fn host_type_id(&self) -> TypeId;

    /// Assign every declared field of `host` from `source`.
    fn inject(&self, host: &mut dyn Any, source: &dyn ValueSource) -> Result<(), InjectError>;
}

impl std::fmt::Debug for dyn Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("name", &self.binder_name())
            .field("contract_version", &self.contract_version())
            .finish_non_exhaustive()
    }
}

/// Narrow the untyped host handed to a binder back to its concrete type.
pub fn downcast_host<'a, H: Any>(
    host: &'a mut dyn Any,
    binder: &'static str,
) -> Result<&'a mut H, InjectError> {
    host.downcast_mut::<H>().ok_or(InjectError::HostMismatch {
        binder,
        expected: type_name::<H>(),
    })
}

/// Look up the value for `slot` and coerce it to the field type.
pub fn fetch<T: Any>(
    source: &dyn ValueSource,
    slot: i32,
    binder: &'static str,
) -> Result<T, InjectError> {
    let value = source
        .find_value(slot)
        .ok_or(InjectError::MissingSlot { binder, slot })?;

    value
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|_| InjectError::TypeMismatch {
            binder,
            slot,
            expected: type_name::<T>(),
        })
}

///
/// TESTS
///
