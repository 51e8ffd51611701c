//! Build-time binder generation.
//!
//! A build script scans its crate for `#[bind(...)]` fields, groups them by
//! host struct and writes one `$$Bind` binder per host into `OUT_DIR`, plus a
//! table that registers every binder with the runtime at startup.
//!
//! Most crates only need the `build!` macro in `build.rs` and
//! `viewbind::include_binders!()` at their crate root.

pub mod config;
pub mod diagnostic;
pub mod driver;
pub mod error;
pub mod model;
pub mod render;
pub mod scan;
pub mod site;
pub mod sink;
pub mod validate;

mod macros;

pub use config::{DuplicatePolicy, GeneratorConfig};
pub use diagnostic::{Diagnostic, DiagnosticKind, Location, Severity};
pub use driver::{ArtifactRecord, Generator, Report};
pub use error::Error;
pub use model::{HostModel, ModelSet};
pub use render::Synthesizer;
pub use scan::{ScanOutput, Scanner};
pub use sink::{ArtifactError, ArtifactSink, DirSink, MemorySink};

use std::{
    env,
    path::{Path, PathBuf},
};

const CRATE_ROOTS: [&str; 2] = ["src/lib.rs", "src/main.rs"];

// generate
/// Scan the crate at `manifest_dir` and write its binders under `out_dir`.
///
/// Only configuration and I/O setup problems are returned as `Err`; everything
/// attributable to a declaration site or host ends up in the report.
pub fn generate(
    config: &GeneratorConfig,
    manifest_dir: &Path,
    out_dir: &Path,
) -> Result<Report, Error> {
    let root = crate_root(manifest_dir)?;
    let generator = Generator::new(config.clone())?;

    tracing::debug!(crate_name = %config.crate_name, root = %root.display(), "scanning crate");
    let scanned = Scanner::new(&config.crate_name).scan_crate(&root);

    let mut sink = DirSink::new(out_dir);
    let pass = generator.run_pass(&scanned.sites, &mut sink);

    let mut diagnostics = scanned.diagnostics;
    diagnostics.extend(pass.diagnostics);

    Ok(Report {
        diagnostics,
        sources: scanned.files,
        ..pass
    })
}

// crate_root
fn crate_root(manifest_dir: &Path) -> Result<PathBuf, Error> {
    CRATE_ROOTS
        .iter()
        .map(|root| manifest_dir.join(root))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::MissingCrateRoot(manifest_dir.display().to_string()))
}

// run_build_script
/// Entry point used by `build!`: read cargo's environment, generate, and
/// report back to cargo.
///
/// Error diagnostics fail the build unless `VIEWBIND_FAIL_ON_ERROR=false`,
/// in which case they are downgraded to cargo warnings.
pub fn run_build_script() -> Result<Report, Error> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .map_err(|_| Error::MissingEnv("CARGO_MANIFEST_DIR"))?;
    let out_dir = env::var("OUT_DIR")
        .map(PathBuf::from)
        .map_err(|_| Error::MissingEnv("OUT_DIR"))?;

    run_build_script_in(&manifest_dir, &out_dir)
}

/// Same as [`run_build_script`], with explicit directories.
pub fn run_build_script_in(manifest_dir: &Path, out_dir: &Path) -> Result<Report, Error> {
    for name in config::ENV_VARS {
        println!("cargo::rerun-if-env-changed={name}");
    }

    let config = GeneratorConfig::from_env()?;
    let report = generate(&config, manifest_dir, out_dir)?;

    for source in &report.sources {
        println!("cargo::rerun-if-changed={}", source.display());
    }

    for line in cargo_directives(&report, config.fail_on_error) {
        println!("{line}");
    }

    let errors = report.errors().count();
    if config.fail_on_error && errors > 0 {
        return Err(Error::Failed(errors));
    }

    Ok(report)
}

// cargo_directives
// one directive per diagnostic; cargo shows only the first line of each
fn cargo_directives(report: &Report, fail_on_error: bool) -> Vec<String> {
    report
        .diagnostics
        .iter()
        .map(|diag| {
            let key = if diag.is_error() && fail_on_error {
                "error"
            } else {
                "warning"
            };
            let text = diag.to_string().replace('\n', " ");

            format!("cargo::{key}={text}")
        })
        .collect()
}

///
/// TESTS
///
