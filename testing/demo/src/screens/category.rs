use crate::widget::{Label, ListView};
use viewbind::Bind;

///
/// CategoryScreen
///

#[derive(Bind, Debug, Default)]
pub struct CategoryScreen {
    #[bind(id = 30)]
    pub items: ListView,

    #[bind(-1)]
    pub header: Label,
}
