use std::{any::Any, collections::BTreeMap, fmt, rc::Rc, sync::Arc};

///
/// ValueSource
///
/// Anything that can produce a value for an integer slot id. In a UI this is
/// the root of a view tree searched by id.
///

pub trait ValueSource {
    fn find_value(&self, slot: i32) -> Option<Box<dyn Any>>;
}

impl<T: ValueSource + ?Sized> ValueSource for &T {
    fn find_value(&self, slot: i32) -> Option<Box<dyn Any>> {
        (**self).find_value(slot)
    }
}

impl<T: ValueSource + ?Sized> ValueSource for Box<T> {
    fn find_value(&self, slot: i32) -> Option<Box<dyn Any>> {
        (**self).find_value(slot)
    }
}

impl<T: ValueSource + ?Sized> ValueSource for Rc<T> {
    fn find_value(&self, slot: i32) -> Option<Box<dyn Any>> {
        (**self).find_value(slot)
    }
}

impl<T: ValueSource + ?Sized> ValueSource for Arc<T> {
    fn find_value(&self, slot: i32) -> Option<Box<dyn Any>> {
        (**self).find_value(slot)
    }
}

///
/// ContentView
///
/// A host that carries its own value source, so it can be injected without
/// passing one in. The root is returned by value (typically a cheap shared
/// handle) because the host is mutably borrowed while fields are assigned.
///

pub trait ContentView {
    type Root: ValueSource;

    fn content_view(&self) -> Self::Root;
}

type Factory = Box<dyn Fn() -> Box<dyn Any>>;

///
/// SlotMap
///
/// In-memory value source. Each lookup hands out a fresh clone of the stored
/// value, so one map can serve any number of injections.
///

#[derive(Default)]
pub struct SlotMap {
    values: BTreeMap<i32, Factory>,
}

impl SlotMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `slot`, replacing any previous value.
    pub fn insert<T: Any + Clone>(&mut self, slot: i32, value: T) {
        self.values
            .insert(slot, Box::new(move || Box::new(value.clone())));
    }

    #[must_use]
    pub fn with<T: Any + Clone>(mut self, slot: i32, value: T) -> Self {
        self.insert(slot, value);
        self
    }

    pub fn remove(&mut self, slot: i32) -> bool {
        self.values.remove(&slot).is_some()
    }

    #[must_use]
    pub fn contains(&self, slot: i32) -> bool {
        self.values.contains_key(&slot)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueSource for SlotMap {
    fn find_value(&self, slot: i32) -> Option<Box<dyn Any>> {
        self.values.get(&slot).map(|factory| factory())
    }
}

impl fmt::Debug for SlotMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_map_hands_out_fresh_clones() {
        let source = SlotMap::new().with(1, vec![1_u8, 2, 3]);

        let first = source.find_value(1).expect("slot 1 present");
        let second = source.find_value(1).expect("slot 1 present");

        assert_eq!(first.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2, 3]));
        assert_eq!(second.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn slot_map_insert_replaces_previous_value() {
        let mut source = SlotMap::new();
        source.insert(4, "old");
        source.insert(4, "new");

        assert_eq!(source.len(), 1);
        let value = source.find_value(4).expect("slot 4 present");
        assert_eq!(value.downcast_ref::<&str>(), Some(&"new"));
    }

    #[test]
    fn shared_handles_forward_lookups() {
        let source = Rc::new(SlotMap::new().with(-1, 'x'));
        let by_ref: &dyn ValueSource = &source;

        assert!(by_ref.find_value(-1).is_some());
        assert!(by_ref.find_value(0).is_none());
    }
}
