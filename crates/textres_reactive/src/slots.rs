//! Positional storage for remembered values.
//!
//! Each `remember` call in a render pass takes the next slot, so a scope must
//! call them in the same order every pass. A slot keeps its value while the
//! keys it was created with compare equal to the keys of the current call.

use std::any::Any;

use tracing::debug;

struct Slot {
    keys: Box<dyn Any + Send>,
    value: Box<dyn Any + Send>,
}

/// Marks a slot whose factory failed; never matches any keys or value type.
struct Vacant;

#[derive(Default)]
pub(crate) struct SlotTable {
    slots: Vec<Slot>,
    cursor: usize,
}

impl SlotTable {
    pub(crate) fn begin_pass(&mut self) {
        self.cursor = 0;
    }

    /// Slots not reached during the pass are forgotten.
    pub(crate) fn end_pass(&mut self) {
        self.slots.truncate(self.cursor);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.cursor = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn remember<K, T, F>(&mut self, keys: K, factory: F) -> T
    where
        K: PartialEq + Send + 'static,
        T: Clone + Send + 'static,
        F: FnOnce() -> T,
    {
        match self.try_remember(keys, || Ok::<T, std::convert::Infallible>(factory())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    pub(crate) fn try_remember<K, T, E, F>(&mut self, keys: K, factory: F) -> Result<T, E>
    where
        K: PartialEq + Send + 'static,
        T: Clone + Send + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let index = self.cursor;
        self.cursor += 1;

        if let Some(slot) = self.slots.get(index) {
            let same_keys = slot.keys.downcast_ref::<K>().is_some_and(|k| *k == keys);
            if same_keys {
                if let Some(value) = slot.value.downcast_ref::<T>() {
                    return Ok(value.clone());
                }
            }
            debug!(slot = index, "remembered value invalidated");
        }

        match factory() {
            Ok(value) => {
                let slot = Slot {
                    keys: Box::new(keys),
                    value: Box::new(value.clone()),
                };
                self.store(index, slot);
                Ok(value)
            }
            Err(err) => {
                // Keep later slots aligned with their call sites; the failed
                // slot is recreated on the next pass.
                let slot = Slot {
                    keys: Box::new(Vacant),
                    value: Box::new(Vacant),
                };
                self.store(index, slot);
                Err(err)
            }
        }
    }

    fn store(&mut self, index: usize, slot: Slot) {
        if index < self.slots.len() {
            self.slots[index] = slot;
        } else {
            self.slots.push(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_keys_reuse_value() {
        let mut table = SlotTable::default();
        let mut calls = 0;

        for _ in 0..3 {
            table.begin_pass();
            let v = table.remember((), || {
                calls += 1;
                calls
            });
            table.end_pass();
            assert_eq!(v, 1);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_changed_keys_recreate() {
        let mut table = SlotTable::default();

        table.begin_pass();
        assert_eq!(table.remember("alice", || 1), 1);
        table.end_pass();

        table.begin_pass();
        assert_eq!(table.remember("bob", || 2), 2);
        table.end_pass();

        table.begin_pass();
        assert_eq!(table.remember("bob", || 3), 2);
        table.end_pass();
    }

    #[test]
    fn test_key_type_change_recreates() {
        let mut table = SlotTable::default();

        table.begin_pass();
        table.remember((1, 2), || "pair");
        table.end_pass();

        table.begin_pass();
        assert_eq!(table.remember((1, 2, 3), || "triple"), "triple");
        table.end_pass();
    }

    #[test]
    fn test_unvisited_slots_are_dropped() {
        let mut table = SlotTable::default();

        table.begin_pass();
        table.remember(0, || 'a');
        table.remember(1, || 'b');
        table.end_pass();
        assert_eq!(table.len(), 2);

        table.begin_pass();
        table.remember(0, || 'x');
        table.end_pass();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_failed_factory_is_not_cached() {
        let mut table = SlotTable::default();

        table.begin_pass();
        let err = table.try_remember((), || Err::<u8, _>("boom"));
        assert_eq!(err, Err("boom"));
        assert_eq!(table.remember("next", || 7u8), 7);
        table.end_pass();

        table.begin_pass();
        assert_eq!(table.try_remember((), || Ok::<_, &str>(1u8)), Ok(1));
        assert_eq!(table.remember("next", || 9u8), 7);
        table.end_pass();
    }
}
