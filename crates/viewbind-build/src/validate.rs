use crate::{
    diagnostic::{Diagnostic, DiagnosticKind, Location},
    model::FieldSymbol,
    site::{Access, DeclarationSite, Element, HostSymbol, SlotArg},
};

///
/// FieldBinding
/// a declaration site that passed validation
///

#[derive(Clone, Debug)]
pub struct FieldBinding {
    pub host: HostSymbol,
    pub slot: i32,
    pub field: FieldSymbol,
    pub location: Location,
}

/// Check one declaration site in isolation.
///
/// Rejections are attributed to the site's own location so each one can be
/// fixed independently.
pub fn validate_site(site: &DeclarationSite) -> Result<FieldBinding, Diagnostic> {
    let reject = |message: String| {
        Diagnostic::error(
            DiagnosticKind::InvalidDeclarationSite,
            Some(site.location.clone()),
            message,
        )
    };

    // must be a struct field
    let field = match &site.element {
        Element::Field(field) => field,
        Element::Other { kind, name } => {
            return Err(reject(format!(
                "`#[bind]` must be declared on a struct field, found {kind} `{name}`"
            )));
        }
    };
    let host = &field.host;
    let field_name = field.field_name();

    // slot argument
    let slot = match &site.slot {
        SlotArg::Id(id) => *id,
        SlotArg::Malformed(reason) => {
            return Err(reject(format!(
                "`#[bind]` on field `{field_name}` of `{}` expects one integer slot id: {reason}",
                host.ident
            )));
        }
    };

    // generated code lives at the crate root and cannot see private fields
    if field.access == Access::Private {
        return Err(reject(format!(
            "field `{field_name}` of `{}` must not be private; declare it `pub(crate)` or wider",
            host.ident
        )));
    }

    if host.access == Access::Private && !host.at_crate_root() {
        return Err(reject(format!(
            "host `{}` must be visible from the crate root; declare it `pub(crate)` or wider",
            host.qualified_name()
        )));
    }

    if let Some(module) = &host.sealed_module {
        return Err(reject(format!(
            "host `{}` sits in private module `{module}`; declare the module `pub(crate)` or wider",
            host.qualified_name()
        )));
    }

    if host.generic {
        return Err(reject(format!(
            "host `{}` must not be generic",
            host.qualified_name()
        )));
    }

    Ok(FieldBinding {
        host: host.clone(),
        slot,
        field: FieldSymbol::new(field.member.clone(), field.ty.clone()),
        location: site.location.clone(),
    })
}

///
/// TESTS
///
