use proc_macro::TokenStream;

mod bind_host;

/// Mark a struct as a binding host.
///
/// Registers `#[bind(..)]` as a field attribute and implements `BindHost`.
/// The binder itself is generated by the `viewbind` build step.
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    bind_host::derive_bind(input.into()).into()
}
