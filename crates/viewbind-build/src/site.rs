//! Declaration sites: every place a `#[bind(..)]` attribute was written,
//! captured with enough context to validate it.

use crate::diagnostic::Location;
use darling::FromMeta;
use std::fmt::{self, Display};
use syn::{
    Attribute, Expr, ExprLit, ExprUnary, Lit, LitInt, Member, Meta, Path, Type, UnOp, Visibility,
};

/// Name of the binding attribute.
pub const BIND_ATTR: &str = "bind";

///
/// DeclarationSite
///

#[derive(Clone, Debug)]
pub struct DeclarationSite {
    pub location: Location,
    pub slot: SlotArg,
    pub element: Element,
}

///
/// SlotArg
/// the parsed argument of one `#[bind(..)]`
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SlotArg {
    Id(i32),
    Malformed(String),
}

impl SlotArg {
    /// Parse `#[bind(10)]`, `#[bind(-3)]` or `#[bind(id = 10)]`.
    #[must_use]
    pub fn parse(attr: &Attribute) -> Self {
        match &attr.meta {
            Meta::Path(_) => Self::Malformed("missing slot id".to_string()),
            Meta::NameValue(_) => {
                Self::Malformed("expected `#[bind(<id>)]`, found `#[bind = ..]`".to_string())
            }
            Meta::List(list) => match list.parse_args::<Expr>() {
                Ok(expr) => match int_expr(&expr) {
                    Some(result) => result,
                    None => Self::parse_named(&attr.meta),
                },
                Err(_) => Self::parse_named(&attr.meta),
            },
        }
    }

    fn parse_named(meta: &Meta) -> Self {
        match BindArgs::from_meta(meta) {
            Ok(args) => Self::Id(args.id),
            Err(err) => Self::Malformed(err.to_string()),
        }
    }
}

///
/// BindArgs
/// the named form, `#[bind(id = 10)]`
///

#[derive(Debug, FromMeta)]
struct BindArgs {
    id: i32,
}

// int_expr
// Some(..) when the expression is an integer literal, negated or not
fn int_expr(expr: &Expr) -> Option<SlotArg> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit), ..
        }) => Some(int_lit(lit, false)),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => match expr.as_ref() {
            Expr::Lit(ExprLit {
                lit: Lit::Int(lit), ..
            }) => Some(int_lit(lit, true)),
            _ => None,
        },
        _ => None,
    }
}

fn int_lit(lit: &LitInt, negative: bool) -> SlotArg {
    let digits = if negative {
        format!("-{}", lit.base10_digits())
    } else {
        lit.base10_digits().to_string()
    };

    match digits.parse::<i32>() {
        Ok(id) => SlotArg::Id(id),
        Err(_) => SlotArg::Malformed(format!("slot id `{digits}` does not fit in i32")),
    }
}

/// True for `#[bind(..)]` in any form.
#[must_use]
pub fn is_bind_attr(attr: &Attribute) -> bool {
    attr.path().is_ident(BIND_ATTR)
}

///
/// Element
/// the thing a `#[bind]` attribute is attached to
///

#[derive(Clone, Debug)]
pub enum Element {
    Field(FieldElement),
    Other { kind: ElementKind, name: String },
}

impl Element {
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Field(_) => ElementKind::Field,
            Self::Other { kind, .. } => *kind,
        }
    }
}

///
/// ElementKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ElementKind {
    AssociatedConst,
    AssociatedType,
    Const,
    Enum,
    Field,
    Function,
    Impl,
    Method,
    Module,
    Other,
    Static,
    Struct,
    Trait,
    TypeAlias,
    Union,
    UnionField,
    Variant,
    VariantField,
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AssociatedConst => "associated const",
            Self::AssociatedType => "associated type",
            Self::Const => "const",
            Self::Enum => "enum",
            Self::Field => "field",
            Self::Function => "function",
            Self::Impl => "impl block",
            Self::Method => "method",
            Self::Module => "module",
            Self::Other => "item",
            Self::Static => "static",
            Self::Struct => "struct",
            Self::Trait => "trait",
            Self::TypeAlias => "type alias",
            Self::Union => "union",
            Self::UnionField => "union field",
            Self::Variant => "enum variant",
            Self::VariantField => "enum variant field",
        };

        f.write_str(label)
    }
}

///
/// FieldElement
///

#[derive(Clone, Debug)]
pub struct FieldElement {
    pub host: HostSymbol,
    pub member: Member,
    pub ty: Type,
    pub access: Access,
}

impl FieldElement {
    #[must_use]
    pub fn field_name(&self) -> String {
        member_name(&self.member)
    }
}

/// Display form of a field member (`title`, `0`).
#[must_use]
pub fn member_name(member: &Member) -> String {
    match member {
        Member::Named(ident) => ident.to_string(),
        Member::Unnamed(index) => index.index.to_string(),
    }
}

///
/// HostSymbol
/// the struct enclosing a bound field
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostSymbol {
    pub crate_name: String,
    pub module_path: Vec<String>,
    pub ident: String,
    pub access: Access,
    pub generic: bool,

    /// Enclosing module the crate root cannot name, if any.
    pub sealed_module: Option<String>,

    /// `#[cfg(..)]` attributes of the struct and its enclosing modules,
    /// outermost first.
    pub cfg: Vec<Attribute>,
    pub location: Location,
}

impl HostSymbol {
    /// `crate::module::Host`, the same string `module_path!()` produces.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        let mut segments = Vec::with_capacity(self.module_path.len() + 2);
        segments.push(self.crate_name.as_str());
        segments.extend(self.module_path.iter().map(String::as_str));
        segments.push(self.ident.as_str());

        segments.join("::")
    }

    #[must_use]
    pub const fn at_crate_root(&self) -> bool {
        self.module_path.is_empty()
    }
}

///
/// Access
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    /// No visibility modifier.
    Private,

    /// `pub(crate)`, `pub(super)`, `pub(in ..)`.
    Restricted,

    Public,
}

impl Access {
    /// Access of an item declared with `vis` in a module `depth` levels
    /// below the crate root, as seen from the root.
    ///
    /// A restriction that does not cover the root (`pub(self)`,
    /// `pub(super)` two levels down, `pub(in crate::a)`) counts as private.
    #[must_use]
    pub fn new(vis: &Visibility, depth: usize) -> Self {
        match vis {
            Visibility::Public(_) => Self::Public,
            Visibility::Restricted(restricted) if covers_root(&restricted.path, depth) => {
                Self::Restricted
            }
            Visibility::Restricted(_) | Visibility::Inherited => Self::Private,
        }
    }
}

// covers_root
// `crate`, or enough `super` hops to climb out of `depth` modules
fn covers_root(path: &Path, depth: usize) -> bool {
    if path.leading_colon.is_some() {
        return false;
    }

    let segments: Vec<String> = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();

    match segments.as_slice() {
        [only] if only == "crate" => true,
        [] => false,
        hops if hops.iter().all(|segment| segment == "super") => hops.len() >= depth,
        _ => false,
    }
}

///
/// TESTS
///
