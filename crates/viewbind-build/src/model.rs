//! Symbol model: one `HostModel` per host struct, built fresh for every
//! generation pass.

use crate::{
    diagnostic::Location,
    site::{HostSymbol, member_name},
};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use std::collections::BTreeMap;
use syn::{Attribute, Ident, Member, Type};
use viewbind_core::binder_name;

///
/// FieldSymbol
/// the field a slot is assigned to
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldSymbol {
    pub member: Member,
    pub ty: Type,
}

impl FieldSymbol {
    #[must_use]
    pub const fn new(member: Member, ty: Type) -> Self {
        Self { member, ty }
    }

    #[must_use]
    pub fn name(&self) -> String {
        member_name(&self.member)
    }
}

///
/// BindingMap
///
/// Slot id -> field, iterated in insertion order. Re-inserting a slot
/// replaces its field but keeps its original position.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BindingMap {
    entries: Vec<(i32, FieldSymbol)>,
}

impl BindingMap {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or overwrite, returning the field previously bound to `slot`.
    pub fn insert(&mut self, slot: i32, field: FieldSymbol) -> Option<FieldSymbol> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(s, _)| *s == slot) {
            return Some(std::mem::replace(existing, field));
        }

        self.entries.push((slot, field));
        None
    }

    #[must_use]
    pub fn get(&self, slot: i32) -> Option<&FieldSymbol> {
        self.entries
            .iter()
            .find_map(|(s, field)| (*s == slot).then_some(field))
    }

    #[must_use]
    pub fn contains(&self, slot: i32) -> bool {
        self.get(slot).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &FieldSymbol)> {
        self.entries.iter().map(|(slot, field)| (*slot, field))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

///
/// HostModel
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostModel {
    pub crate_name: String,
    pub module_path: Vec<String>,
    pub ident: String,
    pub location: Location,

    /// Carried onto everything generated for the host.
    pub cfg: Vec<Attribute>,
    pub bindings: BindingMap,
}

impl HostModel {
    #[must_use]
    pub fn new(crate_name: &str, module_path: &[&str], ident: &str) -> Self {
        Self {
            crate_name: crate_name.to_string(),
            module_path: module_path.iter().map(ToString::to_string).collect(),
            ident: ident.to_string(),
            location: Location::default(),
            cfg: Vec::new(),
            bindings: BindingMap::new(),
        }
    }

    /// Empty model for a scanned host.
    #[must_use]
    pub fn from_symbol(host: &HostSymbol) -> Self {
        Self {
            crate_name: host.crate_name.clone(),
            module_path: host.module_path.clone(),
            ident: host.ident.clone(),
            location: host.location.clone(),
            cfg: host.cfg.clone(),
            bindings: BindingMap::new(),
        }
    }

    pub fn add_binding(&mut self, slot: i32, field: FieldSymbol) -> Option<FieldSymbol> {
        self.bindings.insert(slot, field)
    }

    /// `crate::module::Host`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        let mut name = self.crate_name.clone();
        for segment in self.module_path.iter().chain(std::iter::once(&self.ident)) {
            name.push_str("::");
            name.push_str(segment);
        }

        name
    }

    /// `crate::module::Host$$Bind`
    #[must_use]
    pub fn binder_name(&self) -> String {
        binder_name(&self.qualified_name())
    }

    /// Rust identifier of the generated binder struct.
    ///
    /// `$` is not legal in identifiers, so the binder name is mangled:
    /// `::` becomes `__` and the suffix becomes `__Bind`. Raw segments lose
    /// their `r#` prefix.
    #[must_use]
    pub fn binder_ident(&self) -> Ident {
        let mangled = std::iter::once(&self.crate_name)
            .chain(&self.module_path)
            .chain(std::iter::once(&self.ident))
            .map(|segment| segment.strip_prefix("r#").unwrap_or(segment.as_str()))
            .collect::<Vec<_>>()
            .join("__");

        format_ident!("{mangled}__Bind")
    }

    /// File the artifact is written to, relative to the artifact directory.
    #[must_use]
    pub fn artifact_file(&self) -> String {
        format!("{}.rs", self.binder_ident())
    }

    /// The host type as seen from the crate root: `crate::module::Host`.
    #[must_use]
    pub fn type_path(&self) -> TokenStream {
        let segments = self
            .module_path
            .iter()
            .chain(std::iter::once(&self.ident))
            .map(|segment| path_ident(segment));

        quote!(crate #(:: #segments)*)
    }
}

// path_ident
// keywords used as module names come back as raw identifiers
fn path_ident(segment: &str) -> Ident {
    syn::parse_str::<Ident>(segment).unwrap_or_else(|_| Ident::new_raw(segment, Span::call_site()))
}

///
/// ModelSet
///
/// Pass-scoped aggregate of host models keyed by qualified name. Iteration is
/// sorted by that key, which keeps generated output stable across passes.
///

#[derive(Clone, Debug, Default)]
pub struct ModelSet {
    models: BTreeMap<String, HostModel>,
}

impl ModelSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    /// The model for `host`, created on first sight.
    pub fn entry(&mut self, host: &HostSymbol) -> &mut HostModel {
        self.models
            .entry(host.qualified_name())
            .or_insert_with(|| HostModel::from_symbol(host))
    }

    #[must_use]
    pub fn get(&self, qualified_name: &str) -> Option<&HostModel> {
        self.models.get(qualified_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostModel> {
        self.models.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl IntoIterator for ModelSet {
    type Item = HostModel;
    type IntoIter = std::collections::btree_map::IntoValues<String, HostModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_values()
    }
}

///
/// TESTS
///
