use crate::widget::{Button, TextView};
use std::rc::Rc;
use viewbind::{Bind, ContentView, SlotMap};

///
/// HomeScreen
/// carries its own view tree, so it can be injected with `inject`
///

#[derive(Bind, Debug, Default)]
pub struct HomeScreen {
    #[bind(10)]
    pub(crate) title: TextView,

    #[bind(20)]
    pub(crate) action: Button,

    pub visits: u32,
    root: Rc<SlotMap>,
}

impl HomeScreen {
    #[must_use]
    pub fn new(root: Rc<SlotMap>) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn title(&self) -> &TextView {
        &self.title
    }

    #[must_use]
    pub const fn action(&self) -> &Button {
        &self.action
    }
}

impl ContentView for HomeScreen {
    type Root = Rc<SlotMap>;

    fn content_view(&self) -> Self::Root {
        Rc::clone(&self.root)
    }
}
