// include_binders
// macro to be included once at the root of a host crate's lib.rs / main.rs
/// Include the binder table emitted by `build!` (placed in `OUT_DIR/viewbind.rs`).
///
/// The table is installed by a startup constructor on native targets.
/// wasm32 has no startup constructors, so hosts built for it call the
/// generated `register_binders()` once before the first lookup:
///
/// ```ignore
/// viewbind::include_binders!();
///
/// pub fn start() {
///     register_binders();
/// }
/// ```
#[macro_export]
macro_rules! include_binders {
    () => {
        include!(concat!(env!("OUT_DIR"), "/viewbind.rs"));
    };
}
