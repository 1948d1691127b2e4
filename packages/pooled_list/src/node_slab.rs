use std::any::type_name;
use std::array;

use crate::{ListId, Node, NodeRef, Slot, SlotState};

/// This is the backing storage of a `NodePool`.
///
/// A fixed-capacity collection of `CAPACITY` node slots stored inline, so creating the slab is
/// the only time its memory is obtained and no operation on it ever allocates. Vacant slots are
/// threaded together into a stack of free slots (an intrusive freelist): allocating pops the
/// most recently released slot, releasing pushes the slot back on top.
///
/// The slab knows nothing about list topology beyond storing the links of each node. Keeping the
/// links consistent is the job of the list that owns the nodes.
#[derive(Debug)]
pub(crate) struct NodeSlab<T, const CAPACITY: usize> {
    slots: [Slot<T>; CAPACITY],

    /// Index of the next free slot in the collection. Think of this as a virtual stack of the most
    /// recently freed slots, with the stack entries stored in the slots themselves.
    /// This will point out of bounds if the collection is full.
    next_free_index: usize,

    /// The number of occupied slots.
    used: usize,
}

impl<T, const CAPACITY: usize> NodeSlab<T, CAPACITY> {
    /// # Panics
    ///
    /// Panics if the capacity is zero.
    #[must_use]
    pub(crate) fn new() -> Self {
        assert!(CAPACITY > 0, "NodeSlab must have non-zero capacity");
        assert!(
            CAPACITY < usize::MAX,
            "NodeSlab capacity must be less than usize::MAX"
        );

        Self {
            // For the last slot, this will point out of bounds, which is fine.
            // It means the slab is full and no more nodes can be allocated.
            slots: array::from_fn(|index| Slot::vacant(Self::successor(index))),
            next_free_index: 0,
            used: 0,
        }
    }

    fn successor(index: usize) -> usize {
        index
            .checked_add(1)
            .expect("guarded by capacity < usize::MAX in slab ctor")
    }

    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use.
    pub(crate) fn len(&self) -> usize {
        self.used
    }

    #[must_use]
    pub(crate) fn is_full(&self) -> bool {
        self.next_free_index >= CAPACITY
    }

    fn slot(&self, index: usize) -> &Slot<T> {
        self.slots.get(index).unwrap_or_else(|| {
            panic!(
                "slot {index} index out of bounds in slab of {}",
                type_name::<T>()
            )
        })
    }

    fn slot_mut(&mut self, index: usize) -> &mut Slot<T> {
        self.slots.get_mut(index).unwrap_or_else(|| {
            panic!(
                "slot {index} index out of bounds in slab of {}",
                type_name::<T>()
            )
        })
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds or the slot is vacant.
    #[must_use]
    pub(crate) fn node(&self, index: usize) -> &Node<T> {
        self.slot(index).node().unwrap_or_else(|| {
            panic!(
                "node({index}) slot was vacant in slab of {}",
                type_name::<T>()
            )
        })
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds or the slot is vacant.
    #[must_use]
    pub(crate) fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        self.slot_mut(index).node_mut().unwrap_or_else(|| {
            panic!(
                "node_mut({index}) slot was vacant in slab of {}",
                type_name::<T>()
            )
        })
    }

    /// Creates a reference to the node currently occupying the slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds or the slot is vacant.
    #[must_use]
    pub(crate) fn node_ref(&self, index: usize) -> NodeRef {
        let slot = self.slot(index);
        let owner = self.node(index).owner;

        NodeRef::new(index, slot.generation(), owner)
    }

    /// Whether `node` refers to the current occupant of its slot and that occupant is owned by
    /// `owner`. Never panics, whatever the reference contains.
    #[must_use]
    pub(crate) fn is_live(&self, node: NodeRef, owner: ListId) -> bool {
        if node.owner() != owner {
            return false;
        }

        let Some(slot) = self.slots.get(node.index()) else {
            return false;
        };

        slot.generation() == node.generation() && slot.node().is_some_and(|n| n.owner == owner)
    }

    /// Takes a slot from the free list and fills it with an unlinked node holding `value`.
    ///
    /// If the slab is full, the value is handed back and nothing changes.
    pub(crate) fn allocate(&mut self, value: T, owner: ListId) -> Result<usize, T> {
        #[cfg(debug_assertions)]
        self.integrity_check();

        if self.is_full() {
            return Err(value);
        }

        // Pop the next free index from the stack of free slots.
        let index = self.next_free_index;
        self.next_free_index = self.slot_mut(index).occupy(value, owner);

        self.used = self
            .used
            .checked_add(1)
            .expect("guarded by capacity < usize::MAX in slab ctor");

        Ok(index)
    }

    /// Returns a slot to the free list, handing back the value of the node it held.
    ///
    /// The caller must have unlinked the node from its list first.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds or the slot is vacant.
    pub(crate) fn release(&mut self, index: usize) -> T {
        let next_free_index = self.next_free_index;

        // Push the released slot onto the free stack.
        let value = self.slot_mut(index).vacate(next_free_index);
        self.next_free_index = index;

        self.used = self
            .used
            .checked_sub(1)
            .expect("the slot was occupied so the used count must be non-zero");

        value
    }

    /// Returns every slot to the free list, dropping any values still held.
    pub(crate) fn reset(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.reset(Self::successor(index));
        }

        self.next_free_index = 0;
        self.used = 0;
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(debug_assertions)]
    pub(crate) fn integrity_check(&self) {
        let mut observed_vacant_count: usize = 0;

        for slot in &self.slots {
            if let SlotState::Vacant { next_free_index } = slot.state() {
                observed_vacant_count = observed_vacant_count
                    .checked_add(1)
                    .expect("guarded by capacity < usize::MAX in slab ctor");

                assert!(
                    *next_free_index <= CAPACITY,
                    "vacant slot has an out-of-bounds next_free_index {next_free_index} beyond CAPACITY {CAPACITY} in slab of {}",
                    type_name::<T>()
                );
            }
        }

        assert!(
            CAPACITY.checked_sub(observed_vacant_count) == Some(self.used),
            "self.used {} does not match the observed occupied count {} in slab of {}",
            self.used,
            CAPACITY.saturating_sub(observed_vacant_count),
            type_name::<T>()
        );

        // Walk the free list. Every step must land on a vacant slot and the walk must visit
        // exactly the vacant slots, which also rules out cycles.
        let mut cursor = self.next_free_index;
        let mut walked: usize = 0;

        while cursor < CAPACITY {
            assert!(
                walked < observed_vacant_count,
                "free list is longer than the number of vacant slots in slab of {}",
                type_name::<T>()
            );

            cursor = match self.slot(cursor).state() {
                SlotState::Vacant { next_free_index } => *next_free_index,
                SlotState::Occupied(_) => panic!(
                    "free list points to occupied slot {cursor} in slab of {}",
                    type_name::<T>()
                ),
            };

            walked = walked
                .checked_add(1)
                .expect("guarded by capacity < usize::MAX in slab ctor");
        }

        assert!(
            walked == observed_vacant_count,
            "free list reaches {walked} slots but {observed_vacant_count} are vacant in slab of {}",
            type_name::<T>()
        );
    }
}
