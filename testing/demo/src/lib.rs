//! Demo host crate.
//!
//! `build.rs` generates a binder for every struct here that declares
//! `#[bind(..)]` fields; `include_binders!()` below compiles them in and
//! registers them at startup.

pub mod screens;
pub mod widget;

viewbind::include_binders!();

///
/// badges
/// hosts declared in an inline module
///

pub mod badges {
    use crate::widget::Label;
    use viewbind::Bind;

    #[derive(Bind, Debug, Default)]
    pub struct Badge(#[bind(40)] pub Label);
}

///
/// Plain
/// a host with no bound fields, so no binder is generated for it
///

#[derive(viewbind::Bind, Debug, Default)]
pub struct Plain {
    pub note: String,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        badges::Badge,
        screens::{category::CategoryScreen, home::HomeScreen},
        widget::{Button, Label, ListView, TextView},
    };
    use std::rc::Rc;
    use viewbind::{
        BindHost, Binder, Error, InjectError, LocateError, SlotMap, binder_name, inject,
        inject_with, locate, locate_by_name, registry::registry_read,
    };

    const HOME_BINDER: &str = "viewbind_testing_demo::screens::home::HomeScreen$$Bind";

    fn home_root() -> Rc<SlotMap> {
        Rc::new(
            SlotMap::new()
                .with(10, TextView::new("Welcome"))
                .with(20, Button::new("Start")),
        )
    }

    #[test]
    fn table_lists_every_host_with_bindings() {
        let mut names: Vec<_> = VIEWBIND_BINDERS.iter().map(|b| b.binder_name()).collect();
        names.sort_unstable();

        assert_eq!(
            names,
            vec![
                "viewbind_testing_demo::badges::Badge$$Bind",
                "viewbind_testing_demo::screens::category::CategoryScreen$$Bind",
                HOME_BINDER,
            ]
        );
    }

    #[test]
    fn startup_installs_the_table() {
        let registry = registry_read();

        for binder in VIEWBIND_BINDERS {
            assert!(registry.contains(binder.binder_name()));
        }
    }

    #[test]
    fn manual_registration_is_idempotent() {
        let before = registry_read().len();
        crate::register_binders();
        crate::register_binders();

        assert_eq!(registry_read().len(), before);
        assert!(locate(&HomeScreen::default()).is_ok());
    }

    #[test]
    fn binder_name_is_derived_from_the_host_path() {
        assert_eq!(
            HomeScreen::PATH,
            "viewbind_testing_demo::screens::home::HomeScreen"
        );
        assert_eq!(binder_name(HomeScreen::PATH), HOME_BINDER);
        assert_eq!(HomeScreen::binder_name(), HOME_BINDER);

        let binder = locate(&HomeScreen::default()).expect("home binder registered");
        assert_eq!(binder.binder_name(), HOME_BINDER);
        assert_eq!(binder.contract_version(), viewbind::CONTRACT_VERSION);
    }

    #[test]
    fn inject_assigns_every_bound_field() {
        let mut screen = HomeScreen::new(home_root());

        inject(&mut screen).expect("home screen injects");

        assert_eq!(screen.title(), &TextView::new("Welcome"));
        assert_eq!(screen.action(), &Button::new("Start"));
        assert_eq!(screen.visits, 0);
    }

    #[test]
    fn inject_twice_reassigns_fresh_values() {
        let root = home_root();
        let mut screen = HomeScreen::new(Rc::clone(&root));

        inject(&mut screen).expect("first injection");
        screen.title.text.push('!');
        inject(&mut screen).expect("second injection");

        assert_eq!(screen.title().text, "Welcome");
    }

    #[test]
    fn inject_with_an_explicit_source() {
        let source = SlotMap::new()
            .with(30, ListView::new(&["tea", "coffee"]))
            .with(-1, Label("Drinks".to_string()));
        let mut screen = CategoryScreen::default();

        inject_with(&mut screen, &source).expect("category screen injects");

        assert_eq!(screen.items, ListView::new(&["tea", "coffee"]));
        assert_eq!(screen.header, Label("Drinks".to_string()));
    }

    #[test]
    fn tuple_hosts_bind_by_position() {
        let source = SlotMap::new().with(40, Label("new".to_string()));
        let mut badge = Badge::default();

        inject_with(&mut badge, &source).expect("badge injects");

        assert_eq!(badge.0, Label("new".to_string()));
    }

    #[test]
    fn missing_slot_is_reported() {
        let root = Rc::new(SlotMap::new().with(10, TextView::new("Welcome")));
        let mut screen = HomeScreen::new(root);

        let err = inject(&mut screen).expect_err("slot 20 is missing");

        assert!(matches!(
            err,
            Error::Inject(InjectError::MissingSlot { slot: 20, binder }) if binder == HOME_BINDER
        ));
    }

    #[test]
    fn wrong_value_type_is_reported() {
        let root = Rc::new(
            SlotMap::new()
                .with(10, Label("not a text view".to_string()))
                .with(20, Button::new("Start")),
        );
        let mut screen = HomeScreen::new(root);

        let err = inject(&mut screen).expect_err("slot 10 has the wrong type");

        assert!(matches!(
            err,
            Error::Inject(InjectError::TypeMismatch { slot: 10, .. })
        ));
    }

    #[test]
    fn host_without_bindings_has_no_binder() {
        let err = locate(&Plain::default()).expect_err("no binder for Plain");

        assert_eq!(
            err,
            LocateError::BinderNotFound {
                expected: "viewbind_testing_demo::Plain$$Bind".to_string(),
            }
        );
        assert!(err.to_string().contains("viewbind_testing_demo::Plain$$Bind"));
    }

    #[test]
    fn locate_by_name_finds_registered_binders() {
        let binder = locate_by_name(HOME_BINDER).expect("home binder by name");
        assert_eq!(binder.binder_name(), HOME_BINDER);

        assert!(matches!(
            locate_by_name("viewbind_testing_demo::Missing$$Bind"),
            Err(LocateError::BinderNotFound { .. })
        ));
    }
}
