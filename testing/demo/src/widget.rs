//! Stand-in widgets. Each one is a plain value so a `SlotMap` can hand out
//! copies of it.

///
/// TextView
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TextView {
    pub text: String,
}

impl TextView {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

///
/// Button
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Button {
    pub label: String,
    pub enabled: bool,
}

impl Button {
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            enabled: true,
        }
    }
}

///
/// ListView
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListView {
    pub items: Vec<String>,
}

impl ListView {
    #[must_use]
    pub fn new(items: &[&str]) -> Self {
        Self {
            items: items.iter().map(ToString::to_string).collect(),
        }
    }
}

///
/// Label
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Label(pub String);
