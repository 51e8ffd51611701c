use crate::error::Error;
use proc_macro2::TokenStream;
use quote::quote;
use std::{env, str::FromStr};
use syn::Path;

/// Path of the runtime crate as seen from generated code.
pub const DEFAULT_RUNTIME_PATH: &str = "::viewbind";

const CRATE_NAME_ENV: &str = "VIEWBIND_CRATE_NAME";
const RUNTIME_CRATE_ENV: &str = "VIEWBIND_CRATE";
const DUPLICATE_SLOTS_ENV: &str = "VIEWBIND_DUPLICATE_SLOTS";
const FAIL_ON_ERROR_ENV: &str = "VIEWBIND_FAIL_ON_ERROR";

/// Every environment variable the configuration reads.
pub const ENV_VARS: &[&str] = &[
    "CARGO_PKG_NAME",
    CRATE_NAME_ENV,
    RUNTIME_CRATE_ENV,
    DUPLICATE_SLOTS_ENV,
    FAIL_ON_ERROR_ENV,
];

///
/// DuplicatePolicy
/// what to do when one host declares the same slot id twice
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DuplicatePolicy {
    /// Warn; the later declaration replaces the earlier one.
    #[default]
    Warn,

    /// Error; the later declaration is rejected and the earlier one kept.
    Deny,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "deny" => Ok(Self::Deny),
            other => Err(format!("expected `warn` or `deny`, found `{other}`")),
        }
    }
}

///
/// GeneratorConfig
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratorConfig {
    /// Crate name as it appears in `module_path!()`.
    pub crate_name: String,

    /// Runtime crate path used by generated code.
    pub runtime_path: String,

    pub duplicate_slots: DuplicatePolicy,

    /// Fail the build script when any error diagnostic is reported.
    pub fail_on_error: bool,
}

impl GeneratorConfig {
    #[must_use]
    pub fn new(crate_name: &str) -> Self {
        Self {
            crate_name: normalize_crate_name(crate_name),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            duplicate_slots: DuplicatePolicy::default(),
            fail_on_error: true,
        }
    }

    /// Read the configuration a build script runs with.
    ///
    /// `CARGO_PKG_NAME` supplies the crate name; `VIEWBIND_*` variables
    /// override individual settings.
    pub fn from_env() -> Result<Self, Error> {
        let crate_name = env::var(CRATE_NAME_ENV)
            .or_else(|_| env::var("CARGO_PKG_NAME"))
            .map_err(|_| Error::MissingEnv("CARGO_PKG_NAME"))?;
        let mut config = Self::new(&crate_name);

        if let Some(path) = env_value(RUNTIME_CRATE_ENV) {
            config.runtime_path = path;
        }

        if let Some(value) = env_value(DUPLICATE_SLOTS_ENV) {
            config.duplicate_slots = value.parse().map_err(|reason| Error::InvalidEnv {
                name: DUPLICATE_SLOTS_ENV,
                value: value.clone(),
                reason,
            })?;
        }

        if let Some(value) = env_value(FAIL_ON_ERROR_ENV) {
            config.fail_on_error = parse_bool(&value).ok_or_else(|| Error::InvalidEnv {
                name: FAIL_ON_ERROR_ENV,
                value: value.clone(),
                reason: "expected `true` or `false`".to_string(),
            })?;
        }

        config.runtime_tokens()?;

        Ok(config)
    }

    #[must_use]
    pub fn with_runtime_path(mut self, path: &str) -> Self {
        self.runtime_path = path.to_string();
        self
    }

    #[must_use]
    pub const fn with_duplicate_slots(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_slots = policy;
        self
    }

    #[must_use]
    pub const fn with_fail_on_error(mut self, fail: bool) -> Self {
        self.fail_on_error = fail;
        self
    }

    /// Parse the runtime path into tokens for code generation.
    pub fn runtime_tokens(&self) -> Result<TokenStream, Error> {
        let path: Path = syn::parse_str(self.runtime_path.trim())
            .map_err(|_| Error::RuntimePath(self.runtime_path.clone()))?;

        Ok(quote!(#path))
    }
}

// normalize_crate_name
// package names may use '-', module paths never do
fn normalize_crate_name(name: &str) -> String {
    name.trim().replace('-', "_")
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

///
/// TESTS
///
