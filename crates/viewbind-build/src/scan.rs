//! Source scanner.
//!
//! Walks a crate's module tree the way rustc resolves it and records every
//! `#[bind(..)]` attribute, whatever it is attached to. Nothing is rejected
//! here; deciding which sites are valid is the validator's job.

use crate::{
    diagnostic::{Diagnostic, DiagnosticKind, Location},
    site::{
        Access, DeclarationSite, Element, ElementKind, FieldElement, HostSymbol, SlotArg,
        is_bind_attr,
    },
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use syn::{
    AttrStyle, Attribute, ImplItem, Item, ItemEnum, ItemImpl, ItemMod, ItemStruct, ItemTrait,
    ItemUnion, Member, Meta, TraitItem, Visibility, ext::IdentExt, spanned::Spanned,
};

///
/// ScanOutput
///

#[derive(Clone, Debug, Default)]
pub struct ScanOutput {
    pub sites: Vec<DeclarationSite>,
    pub diagnostics: Vec<Diagnostic>,

    /// Every source file read, for `rerun-if-changed`.
    pub files: Vec<PathBuf>,
}

///
/// ModuleContext
/// where we are in the module tree, and where child module files live
///

#[derive(Clone, Debug)]
struct ModuleContext {
    path: Vec<String>,
    dir: PathBuf,
    file: String,

    /// First module on `path` the crate root cannot name.
    sealed: Option<String>,

    /// `#[cfg(..)]` attributes of every enclosing module.
    cfg: Vec<Attribute>,
}

impl ModuleContext {
    fn root(path: Vec<String>, dir: PathBuf, file: String) -> Self {
        Self {
            path,
            dir,
            file,
            sealed: None,
            cfg: Vec::new(),
        }
    }

    fn child(&self, name: &str, item: &ItemMod) -> Self {
        let mut path = self.path.clone();
        path.push(name.to_string());

        let mut cfg = self.cfg.clone();
        cfg.extend(cfg_attrs(&item.attrs));

        Self {
            sealed: self.child_sealed(&path, &item.vis),
            path,
            dir: self.dir.join(name),
            file: self.file.clone(),
            cfg,
        }
    }

    // child_sealed
    // anything declared in the root itself is reachable from it
    fn child_sealed(&self, path: &[String], vis: &Visibility) -> Option<String> {
        if self.sealed.is_some() {
            return self.sealed.clone();
        }

        let depth = self.path.len();
        (depth > 0 && Access::new(vis, depth) == Access::Private).then(|| path.join("::"))
    }
}

///
/// Scanner
///

#[derive(Debug)]
pub struct Scanner {
    crate_name: String,
    output: ScanOutput,
}

impl Scanner {
    #[must_use]
    pub fn new(crate_name: &str) -> Self {
        Self {
            crate_name: crate_name.replace('-', "_"),
            output: ScanOutput::default(),
        }
    }

    /// Scan a whole crate starting from its root file (`src/lib.rs`).
    #[must_use]
    pub fn scan_crate(mut self, root: &Path) -> ScanOutput {
        let ctx = ModuleContext::root(
            Vec::new(),
            root.parent().map(Path::to_path_buf).unwrap_or_default(),
            root.display().to_string(),
        );
        self.scan_file(root, ctx);

        self.output
    }

    /// Scan one in-memory source file as the module at `module_path`.
    #[must_use]
    pub fn scan_source(mut self, module_path: &[&str], file: &str, source: &str) -> ScanOutput {
        let mut ctx = ModuleContext::root(
            module_path.iter().map(ToString::to_string).collect(),
            PathBuf::new(),
            file.to_string(),
        );

        match syn::parse_file(source) {
            Ok(parsed) => {
                ctx.cfg.extend(cfg_attrs(&parsed.attrs));
                self.scan_items(&parsed.items, &ctx);
            }
            Err(err) => self.unavailable(&ctx.file, &format!("failed to parse: {err}")),
        }

        self.output
    }

    // scan_file
    // `ctx.dir` is where this file's child modules are looked up
    fn scan_file(&mut self, path: &Path, ctx: ModuleContext) {
        let file = path.display().to_string();

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                self.unavailable(&file, &format!("failed to read: {err}"));
                return;
            }
        };
        self.output.files.push(path.to_path_buf());

        let parsed = match syn::parse_file(&source) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.unavailable(&file, &format!("failed to parse: {err}"));
                return;
            }
        };

        // a file module may gate itself with `#![cfg(..)]`
        let mut ctx = ModuleContext { file, ..ctx };
        ctx.cfg.extend(cfg_attrs(&parsed.attrs));
        self.scan_items(&parsed.items, &ctx);
    }

    fn unavailable(&mut self, file: &str, message: &str) {
        tracing::warn!(file, reason = message, "source unavailable");
        self.output.diagnostics.push(Diagnostic::error(
            DiagnosticKind::SourceUnavailable,
            Some(Location::file(file)),
            message,
        ));
    }

    fn scan_items(&mut self, items: &[Item], ctx: &ModuleContext) {
        for item in items {
            self.scan_item(item, ctx);
        }
    }

    fn scan_item(&mut self, item: &Item, ctx: &ModuleContext) {
        if is_cfg_test(item_attrs(item)) {
            return;
        }

        match item {
            Item::Struct(item) => self.scan_struct(item, ctx),
            Item::Enum(item) => self.scan_enum(item, ctx),
            Item::Union(item) => self.scan_union(item, ctx),
            Item::Impl(item) => self.scan_impl(item, ctx),
            Item::Trait(item) => self.scan_trait(item, ctx),
            Item::Mod(item) => self.scan_mod(item, ctx),
            Item::Fn(item) => {
                self.misplaced(&item.attrs, ElementKind::Function, &item.sig.ident, ctx);
            }
            Item::Const(item) => self.misplaced(&item.attrs, ElementKind::Const, &item.ident, ctx),
            Item::Static(item) => {
                self.misplaced(&item.attrs, ElementKind::Static, &item.ident, ctx);
            }
            Item::Type(item) => {
                self.misplaced(&item.attrs, ElementKind::TypeAlias, &item.ident, ctx);
            }
            other => {
                let name = other_item_name(other);
                self.misplaced(item_attrs(other), ElementKind::Other, &name, ctx);
            }
        }
    }

    fn scan_struct(&mut self, item: &ItemStruct, ctx: &ModuleContext) {
        self.misplaced(&item.attrs, ElementKind::Struct, &item.ident, ctx);

        let depth = ctx.path.len();
        let mut cfg = ctx.cfg.clone();
        cfg.extend(cfg_attrs(&item.attrs));

        let host = HostSymbol {
            crate_name: self.crate_name.clone(),
            module_path: ctx.path.clone(),
            ident: item.ident.unraw().to_string(),
            access: Access::new(&item.vis, depth),
            generic: !item.generics.params.is_empty(),
            sealed_module: ctx.sealed.clone(),
            cfg,
            location: self.location(ctx, item.ident.span()),
        };

        for (index, field) in item.fields.iter().enumerate() {
            let member = field.ident.clone().map_or_else(
                || Member::Unnamed(index.into()),
                Member::Named,
            );

            for attr in field.attrs.iter().filter(|attr| is_bind_attr(attr)) {
                let element = Element::Field(FieldElement {
                    host: host.clone(),
                    member: member.clone(),
                    ty: field.ty.clone(),
                    access: Access::new(&field.vis, depth),
                });
                self.push(attr, element, ctx);
            }
        }
    }

    fn scan_enum(&mut self, item: &ItemEnum, ctx: &ModuleContext) {
        self.misplaced(&item.attrs, ElementKind::Enum, &item.ident, ctx);

        for variant in &item.variants {
            let variant_name = format!("{}::{}", item.ident, variant.ident);
            self.misplaced(&variant.attrs, ElementKind::Variant, &variant_name, ctx);

            for (index, field) in variant.fields.iter().enumerate() {
                let name = field.ident.as_ref().map_or_else(
                    || format!("{variant_name}.{index}"),
                    |ident| format!("{variant_name}.{ident}"),
                );
                self.misplaced(&field.attrs, ElementKind::VariantField, &name, ctx);
            }
        }
    }

    fn scan_union(&mut self, item: &ItemUnion, ctx: &ModuleContext) {
        self.misplaced(&item.attrs, ElementKind::Union, &item.ident, ctx);

        for field in &item.fields.named {
            let name = field
                .ident
                .as_ref()
                .map_or_else(String::new, ToString::to_string);
            self.misplaced(
                &field.attrs,
                ElementKind::UnionField,
                &format!("{}.{name}", item.ident),
                ctx,
            );
        }
    }

    fn scan_impl(&mut self, item: &ItemImpl, ctx: &ModuleContext) {
        let self_ty = quote::ToTokens::to_token_stream(&item.self_ty).to_string();
        self.misplaced(&item.attrs, ElementKind::Impl, &self_ty, ctx);

        for impl_item in &item.items {
            match impl_item {
                ImplItem::Fn(f) => {
                    let name = format!("{self_ty}::{}", f.sig.ident);
                    self.misplaced(&f.attrs, ElementKind::Method, &name, ctx);
                }
                ImplItem::Const(c) => {
                    let name = format!("{self_ty}::{}", c.ident);
                    self.misplaced(&c.attrs, ElementKind::AssociatedConst, &name, ctx);
                }
                ImplItem::Type(t) => {
                    let name = format!("{self_ty}::{}", t.ident);
                    self.misplaced(&t.attrs, ElementKind::AssociatedType, &name, ctx);
                }
                _ => {}
            }
        }
    }

    fn scan_trait(&mut self, item: &ItemTrait, ctx: &ModuleContext) {
        self.misplaced(&item.attrs, ElementKind::Trait, &item.ident, ctx);

        for trait_item in &item.items {
            match trait_item {
                TraitItem::Fn(f) => {
                    let name = format!("{}::{}", item.ident, f.sig.ident);
                    self.misplaced(&f.attrs, ElementKind::Method, &name, ctx);
                }
                TraitItem::Const(c) => {
                    let name = format!("{}::{}", item.ident, c.ident);
                    self.misplaced(&c.attrs, ElementKind::AssociatedConst, &name, ctx);
                }
                TraitItem::Type(t) => {
                    let name = format!("{}::{}", item.ident, t.ident);
                    self.misplaced(&t.attrs, ElementKind::AssociatedType, &name, ctx);
                }
                _ => {}
            }
        }
    }

    fn scan_mod(&mut self, item: &ItemMod, ctx: &ModuleContext) {
        self.misplaced(&item.attrs, ElementKind::Module, &item.ident, ctx);

        let name = item.ident.unraw().to_string();

        let mut child = ctx.child(&name, item);

        // inline module
        if let Some((_, items)) = &item.content {
            if let Some(path) = path_attr(&item.attrs) {
                child.dir = ctx.dir.join(path);
            }
            self.scan_items(items, &child);
            return;
        }

        // file module
        if let Some(path) = path_attr(&item.attrs) {
            let file = ctx.dir.join(path);
            child.dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
            self.scan_file(&file, child);
            return;
        }

        let flat = ctx.dir.join(format!("{name}.rs"));
        let nested = ctx.dir.join(&name).join("mod.rs");

        if flat.is_file() {
            self.scan_file(&flat, child);
        } else if nested.is_file() {
            self.scan_file(&nested, child);
        } else {
            let location = self.location(ctx, item.ident.span());
            tracing::warn!(module = %name, file = %ctx.file, "module file not found");
            self.output.diagnostics.push(Diagnostic::error(
                DiagnosticKind::SourceUnavailable,
                Some(location),
                format!(
                    "module `{name}` not found (looked for {} and {})",
                    flat.display(),
                    nested.display()
                ),
            ));
        }
    }

    // misplaced
    // records a site for every #[bind] on an element that is not a struct field
    fn misplaced(
        &mut self,
        attrs: &[Attribute],
        kind: ElementKind,
        name: &impl ToString,
        ctx: &ModuleContext,
    ) {
        for attr in attrs.iter().filter(|attr| is_bind_attr(attr)) {
            let element = Element::Other {
                kind,
                name: name.to_string(),
            };
            self.push(attr, element, ctx);
        }
    }

    fn push(&mut self, attr: &Attribute, element: Element, ctx: &ModuleContext) {
        self.output.sites.push(DeclarationSite {
            location: self.location(ctx, attr.span()),
            slot: SlotArg::parse(attr),
            element,
        });
    }

    fn location(&self, ctx: &ModuleContext, span: proc_macro2::Span) -> Location {
        let start = span.start();

        Location::new(ctx.file.clone(), start.line, start.column)
    }
}

fn item_attrs(item: &Item) -> &[Attribute] {
    match item {
        Item::Const(i) => &i.attrs,
        Item::Enum(i) => &i.attrs,
        Item::ExternCrate(i) => &i.attrs,
        Item::Fn(i) => &i.attrs,
        Item::ForeignMod(i) => &i.attrs,
        Item::Impl(i) => &i.attrs,
        Item::Macro(i) => &i.attrs,
        Item::Mod(i) => &i.attrs,
        Item::Static(i) => &i.attrs,
        Item::Struct(i) => &i.attrs,
        Item::Trait(i) => &i.attrs,
        Item::TraitAlias(i) => &i.attrs,
        Item::Type(i) => &i.attrs,
        Item::Union(i) => &i.attrs,
        Item::Use(i) => &i.attrs,
        _ => &[],
    }
}

fn other_item_name(item: &Item) -> String {
    match item {
        Item::ExternCrate(i) => i.ident.to_string(),
        Item::TraitAlias(i) => i.ident.to_string(),
        Item::Macro(i) => i
            .ident
            .as_ref()
            .map_or_else(|| "macro invocation".to_string(), ToString::to_string),
        Item::Use(_) => "use declaration".to_string(),
        Item::ForeignMod(_) => "extern block".to_string(),
        _ => "item".to_string(),
    }
}

// is_cfg_test
// test-only items are not compiled into the crate the binders are built for
fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}

// cfg_attrs
// `#[cfg(..)]` and `#![cfg(..)]`, both returned in outer form
fn cfg_attrs(attrs: &[Attribute]) -> impl Iterator<Item = Attribute> + '_ {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("cfg"))
        .map(|attr| Attribute {
            style: AttrStyle::Outer,
            ..attr.clone()
        })
}

// path_attr
// value of a `#[path = ".."]` attribute
fn path_attr(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().find_map(|attr| match &attr.meta {
        Meta::NameValue(nv) if nv.path.is_ident("path") => match &nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) => Some(s.value()),
            _ => None,
        },
        _ => None,
    })
}

///
/// TESTS
///
