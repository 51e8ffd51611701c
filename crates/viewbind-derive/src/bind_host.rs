use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Path, ext::IdentExt};

const RUNTIME_CRATE_ENV: &str = "VIEWBIND_CRATE";

// runtime_path
// generated code goes through the facade unless VIEWBIND_CRATE overrides it
fn runtime_path() -> TokenStream {
    std::env::var(RUNTIME_CRATE_ENV)
        .ok()
        .and_then(|value| syn::parse_str::<Path>(value.trim()).ok())
        .map_or_else(|| quote!(::viewbind), |path| quote!(#path))
}

// derive_bind
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    if !matches!(input.data, Data::Struct(_)) {
        return Error::new_spanned(&input.ident, "Bind can only be derived for structs")
            .to_compile_error();
    }

    let ident = &input.ident;
    // `r#Home` is registered as `Home`, matching the build-time scanner
    let name = ident.unraw().to_string();
    let runtime = runtime_path();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics #runtime::BindHost for #ident #ty_generics #where_clause {
            const PATH: &'static str = concat!(module_path!(), "::", #name);
        }
    }
}

///
/// TESTS
///
