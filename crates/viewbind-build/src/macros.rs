/// Build-script helper that generates the `$$Bind` binders for the calling
/// crate.
///
/// Use it inside a `build.rs` `main` that returns `Result`; pair it with
/// `include_binders!()` at the crate root.
#[macro_export]
macro_rules! build {
    () => {
        //
        // CARGO
        //

        println!("cargo::rerun-if-changed=build.rs");

        //
        // BINDERS
        //

        $crate::run_build_script()?;
    };

    ($manifest_dir:expr, $out_dir:expr) => {
        println!("cargo::rerun-if-changed=build.rs");

        $crate::run_build_script_in(
            ::std::path::Path::new(&$manifest_dir),
            ::std::path::Path::new(&$out_dir),
        )?;
    };
}
