use std::mem;

use crate::ListId;

/// One storage slot of a node slab.
#[derive(Debug)]
pub(crate) struct Slot<T> {
    /// Bumped every time the slot is released, so references to an earlier occupant of the slot
    /// can be told apart from references to the current one.
    generation: u32,

    state: SlotState<T>,
}

#[derive(Debug)]
pub(crate) enum SlotState<T> {
    /// The slot is part of the free list. `next_free_index` is the next entry of the free list
    /// and points out of bounds if this is the last free slot.
    Vacant { next_free_index: usize },

    /// The slot holds a node of a list.
    Occupied(Node<T>),
}

/// A node of a list, linking to its neighbors by slot index.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
    pub(crate) owner: ListId,
}

impl<T> Slot<T> {
    #[must_use]
    pub(crate) fn vacant(next_free_index: usize) -> Self {
        Self {
            generation: 0,
            state: SlotState::Vacant { next_free_index },
        }
    }

    #[must_use]
    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub(crate) fn state(&self) -> &SlotState<T> {
        &self.state
    }

    #[must_use]
    pub(crate) fn node(&self) -> Option<&Node<T>> {
        match &self.state {
            SlotState::Occupied(node) => Some(node),
            SlotState::Vacant { .. } => None,
        }
    }

    #[must_use]
    pub(crate) fn node_mut(&mut self) -> Option<&mut Node<T>> {
        match &mut self.state {
            SlotState::Occupied(node) => Some(node),
            SlotState::Vacant { .. } => None,
        }
    }

    /// Places a fresh unlinked node into a vacant slot.
    ///
    /// Returns the next free index that the slot was holding.
    ///
    /// # Panics
    ///
    /// Panics if the slot is occupied.
    pub(crate) fn occupy(&mut self, value: T, owner: ListId) -> usize {
        let next_free_index = match self.state {
            SlotState::Vacant { next_free_index } => next_free_index,
            SlotState::Occupied(_) => panic!("attempted to occupy a slot that is already occupied"),
        };

        self.state = SlotState::Occupied(Node {
            value,
            prev: None,
            next: None,
            owner,
        });

        next_free_index
    }

    /// Turns an occupied slot back into a vacant one, returning the value it held.
    ///
    /// # Panics
    ///
    /// Panics if the slot is vacant.
    pub(crate) fn vacate(&mut self, next_free_index: usize) -> T {
        assert!(
            matches!(self.state, SlotState::Occupied(_)),
            "attempted to vacate a slot that is already vacant"
        );

        let previous = mem::replace(&mut self.state, SlotState::Vacant { next_free_index });

        self.generation = self.generation.wrapping_add(1);

        match previous {
            SlotState::Occupied(node) => node.value,
            SlotState::Vacant { .. } => unreachable!("guarded by assertion above"),
        }
    }

    /// Forcibly returns the slot to the vacant state, dropping any node it held.
    pub(crate) fn reset(&mut self, next_free_index: usize) {
        if matches!(self.state, SlotState::Occupied(_)) {
            self.generation = self.generation.wrapping_add(1);
        }

        self.state = SlotState::Vacant { next_free_index };
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn occupy_then_vacate() {
        let owner = ListId::next();
        let mut slot = Slot::vacant(5);

        assert!(slot.node().is_none());
        assert_eq!(slot.occupy("hello", owner), 5);

        let node = slot.node().unwrap();
        assert_eq!(node.value, "hello");
        assert_eq!(node.prev, None);
        assert_eq!(node.next, None);
        assert_eq!(node.owner, owner);

        assert_eq!(slot.vacate(9), "hello");
        assert!(matches!(
            slot.state(),
            SlotState::Vacant { next_free_index: 9 }
        ));
    }

    #[test]
    fn vacate_bumps_generation() {
        let mut slot = Slot::vacant(1);
        assert_eq!(slot.generation(), 0);

        slot.occupy(1, ListId::next());
        assert_eq!(slot.generation(), 0);

        slot.vacate(1);
        assert_eq!(slot.generation(), 1);
    }

    #[test]
    fn reset_drops_value_and_bumps_generation() {
        struct Droppable {
            dropped: Rc<Cell<bool>>,
        }

        impl Drop for Droppable {
            fn drop(&mut self) {
                self.dropped.set(true);
            }
        }

        let dropped = Rc::new(Cell::new(false));
        let mut slot = Slot::vacant(1);
        slot.occupy(
            Droppable {
                dropped: Rc::clone(&dropped),
            },
            ListId::next(),
        );

        slot.reset(1);

        assert!(dropped.get());
        assert_eq!(slot.generation(), 1);
    }

    #[test]
    fn reset_of_vacant_keeps_generation() {
        let mut slot = Slot::<u32>::vacant(1);

        slot.reset(4);

        assert_eq!(slot.generation(), 0);
        assert!(matches!(
            slot.state(),
            SlotState::Vacant { next_free_index: 4 }
        ));
    }

    #[test]
    #[should_panic]
    fn occupy_occupied_panics() {
        let mut slot = Slot::vacant(1);
        slot.occupy(1, ListId::next());
        slot.occupy(2, ListId::next());
    }

    #[test]
    #[should_panic]
    fn vacate_vacant_panics() {
        let mut slot = Slot::<u32>::vacant(1);
        slot.vacate(1);
    }
}
