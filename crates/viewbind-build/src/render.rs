//! Code synthesizer: host model in, binder source text out.
//!
//! Rendering is a pure function of the model and the runtime path, so the
//! same model always produces byte-identical text.

use crate::model::HostModel;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use viewbind_core::CONTRACT_VERSION;

/// Directory (relative to the output root) holding one file per binder.
pub const ARTIFACT_DIR: &str = "viewbind";

/// File name of the binder table, relative to the output root.
pub const INDEX_FILE: &str = "viewbind.rs";

/// Name of the generated binder table.
pub const TABLE_IDENT: &str = "VIEWBIND_BINDERS";

///
/// Synthesizer
///

#[derive(Clone, Debug)]
pub struct Synthesizer {
    runtime: TokenStream,
}

impl Synthesizer {
    #[must_use]
    pub const fn new(runtime: TokenStream) -> Self {
        Self { runtime }
    }

    /// Render the binder for one host.
    #[must_use]
    pub fn render(&self, model: &HostModel) -> String {
        self.binder_tokens(model).to_string()
    }

    /// Render the binder table for every host whose artifact was written.
    #[must_use]
    pub fn render_index(&self, models: &[&HostModel]) -> String {
        self.index_tokens(models).to_string()
    }

    fn binder_tokens(&self, model: &HostModel) -> TokenStream {
        let rt = &self.runtime;
        let binder_ident = model.binder_ident();
        let binder_name = model.binder_name();
        let host_ty = model.type_path();
        let cfg = &model.cfg;
        let doc = format!(" Generated binder for `{}`.", model.qualified_name());
        let slot_docs = model.bindings.iter().map(|(slot, field)| {
            let ty = &field.ty;
            let line = format!(" - slot {slot}: `{}: {}`", field.name(), quote!(#ty));

            quote!(#[doc = #line])
        });

        let body = if model.bindings.is_empty() {
            quote! {
                let _ = #rt::__internal::downcast_host::<#host_ty>(host, Self::NAME)?;
                let _ = source;
            }
        } else {
            // field types are inferred; the declared type may name items
            // only in scope inside the host's module
            let statements = model.bindings.iter().map(|(slot, field)| {
                let member = &field.member;

                quote! {
                    host.#member = #rt::__internal::fetch(source, #slot, Self::NAME)?;
                }
            });

            quote! {
                let host = #rt::__internal::downcast_host::<#host_ty>(host, Self::NAME)?;
                #(#statements)*
            }
        };

        quote! {
            #(#cfg)*
            #[doc = #doc]
            #(#slot_docs)*
            #[doc(hidden)]
            #[allow(non_camel_case_types)]
            pub struct #binder_ident;

            #(#cfg)*
            impl #binder_ident {
                pub const NAME: &str = #binder_name;
            }

            #(#cfg)*
            impl #rt::Binder for #binder_ident {
                fn binder_name(&self) -> &'static str {
                    Self::NAME
                }

                fn contract_version(&self) -> u32 {
                    #CONTRACT_VERSION
                }

                fn host_type_id(&self) -> ::std::any::TypeId {
                    ::std::any::TypeId::of::<#host_ty>()
                }

                fn inject(
                    &self,
                    host: &mut dyn ::std::any::Any,
                    source: &dyn #rt::ValueSource,
                ) -> ::std::result::Result<(), #rt::InjectError> {
                    #body
                    Ok(())
                }
            }
        }
    }

    fn index_tokens(&self, models: &[&HostModel]) -> TokenStream {
        let rt = &self.runtime;
        let table_ident = format_ident!("{TABLE_IDENT}");

        // a host compiled out by `cfg` takes its binder and table entry with it
        let includes = models.iter().map(|model| {
            let cfg = &model.cfg;
            let file = format!("/{ARTIFACT_DIR}/{}", model.artifact_file());
            quote! {
                #(#cfg)*
                include!(concat!(env!("OUT_DIR"), #file));
            }
        });
        let entries = models.iter().map(|model| {
            let cfg = &model.cfg;
            let ident = model.binder_ident();
            quote!(#(#cfg)* &#ident)
        });

        quote! {
            #(#includes)*

            /// Every binder generated for this crate.
            pub static #table_ident: &[&dyn #rt::Binder] = &[#(#entries),*];

            /// Install this crate's binders into the process-wide registry.
            ///
            /// Runs automatically at startup on native targets; wasm32 hosts
            /// call it themselves before the first `locate`.
            pub fn register_binders() {
                #rt::registry::install(#table_ident);
            }

            #[cfg(not(target_arch = "wasm32"))]
            #[#rt::__reexports::ctor::ctor(unsafe, anonymous, crate_path = #rt::__reexports::ctor)]
            fn __ctor() {
                register_binders();
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldSymbol;
    use syn::{Member, parse_quote};

    fn synth() -> Synthesizer {
        Synthesizer::new(quote!(::viewbind))
    }

    fn host() -> HostModel {
        let mut model = HostModel::new("app", &["screens"], "Home");
        model.add_binding(
            10,
            FieldSymbol::new(Member::Named(format_ident!("title")), parse_quote!(TextView)),
        );
        model.add_binding(
            20,
            FieldSymbol::new(Member::Named(format_ident!("action")), parse_quote!(Button)),
        );

        model
    }

    #[test]
    fn render_is_deterministic() {
        assert_eq!(synth().render(&host()), synth().render(&host()));
    }

    #[test]
    fn render_emits_one_statement_per_binding_in_order() {
        let rt = quote!(::viewbind);
        let expected_title =
            quote!(host.title = #rt::__internal::fetch(source, 10i32, Self::NAME)?;).to_string();
        let expected_action =
            quote!(host.action = #rt::__internal::fetch(source, 20i32, Self::NAME)?;).to_string();

        let text = synth().render(&host());

        let title_at = text.find(&expected_title).expect("title statement present");
        let action_at = text.find(&expected_action).expect("action statement present");
        assert!(title_at < action_at, "statements must follow insertion order");
        assert!(text.contains("\"app::screens::Home$$Bind\""));
        assert!(text.contains("pub struct app__screens__Home__Bind"));
        assert!(text.contains(&quote!(crate::screens::Home).to_string()));
        assert!(text.contains("slot 10: `title: TextView`"));
    }

    #[test]
    fn tuple_members_render_as_index_access() {
        let mut model = HostModel::new("app", &[], "Badge");
        model.add_binding(
            3,
            FieldSymbol::new(Member::Unnamed(0.into()), parse_quote!(Label)),
        );

        let text = synth().render(&model);
        assert!(text.contains("host . 0 ="), "{text}");
    }

    #[test]
    fn empty_model_renders_a_binder_without_assignments() {
        let model = HostModel::new("app", &[], "Empty");

        let text = synth().render(&model);
        assert!(text.contains("impl :: viewbind :: Binder for app__Empty__Bind"));
        assert!(!text.contains("fetch"));
    }

    #[test]
    fn contract_version_is_embedded() {
        let text = synth().render(&host());
        let expected = quote!(fn contract_version(&self) -> u32 { #CONTRACT_VERSION }).to_string();

        assert!(text.contains(&expected));
    }

    #[test]
    fn index_includes_each_artifact_and_lists_the_table() {
        let home = host();
        let badge = HostModel::new("app", &[], "Badge");

        let text = synth().render_index(&[&badge, &home]);

        assert!(text.contains("\"/viewbind/app__Badge__Bind.rs\""));
        assert!(text.contains("\"/viewbind/app__screens__Home__Bind.rs\""));
        assert!(text.contains("& app__Badge__Bind , & app__screens__Home__Bind"));
        assert!(text.contains("registry :: install (VIEWBIND_BINDERS)"));
    }

    #[test]
    fn index_ctor_uses_the_unsafe_form_and_delegates_to_register_binders() {
        let text = synth().render_index(&[&host()]);

        assert!(text.contains("ctor :: ctor (unsafe , anonymous , crate_path"), "{text}");
        assert!(text.contains("pub fn register_binders ()"));
        assert!(text.contains("fn __ctor () { register_binders () ; }"));
    }

    #[test]
    fn cfg_gated_hosts_gate_their_binder_include_and_table_entry() {
        let mut gated = host();
        gated.cfg = vec![parse_quote!(#[cfg(feature = "screens")])];
        let badge = HostModel::new("app", &[], "Badge");
        let cfg = quote!(#[cfg(feature = "screens")]).to_string();

        let binder = synth().render(&gated);
        assert!(
            binder.contains(&format!("{cfg} # [doc =")),
            "binder struct must carry the cfg: {binder}"
        );
        assert_eq!(binder.matches(&cfg).count(), 3);

        let index = synth().render_index(&[&badge, &gated]);
        assert!(index.contains(&format!("{cfg} include !")), "{index}");
        assert!(index.contains(&format!("& app__Badge__Bind , {cfg} & app__screens__Home__Bind")));
        assert_eq!(index.matches(&cfg).count(), 2);
    }
}
