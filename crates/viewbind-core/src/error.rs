use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Inject(#[from] InjectError),
}

///
/// LocateError
///
/// Raised when a host cannot be matched to a usable binder. Every variant
/// points at a build configuration defect, so callers should surface it
/// rather than continue with an unbound host.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum LocateError {
    #[error("can not find binder `{expected}`; was the viewbind build step run for this crate?")]
    BinderNotFound { expected: String },

    #[error(
        "binder `{binder}` was generated for contract version {found}, runtime expects {expected}"
    )]
    ContractMismatch {
        binder: String,
        expected: u32,
        found: u32,
    },

    #[error("binder `{binder}` is registered for a different host type than `{host}`")]
    HostMismatch { binder: String, host: &'static str },
}

///
/// InjectError
///
/// Raised by a generated binder while assigning fields.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum InjectError {
    #[error("binder `{binder}` was invoked with a host that is not `{expected}`")]
    HostMismatch {
        binder: &'static str,
        expected: &'static str,
    },

    #[error("binder `{binder}`: value source has no value for slot {slot}")]
    MissingSlot { binder: &'static str, slot: i32 },

    #[error("binder `{binder}`: value for slot {slot} is not a `{expected}`")]
    TypeMismatch {
        binder: &'static str,
        slot: i32,
        expected: &'static str,
    },
}
