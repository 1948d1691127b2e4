use std::sync::atomic::{AtomicU64, Ordering};

/// A reference to a node of a [`PooledList`][crate::PooledList], returned by the push and
/// find methods of the list.
///
/// The reference is a plain copyable value. It does not borrow the list, so it remains usable
/// while the list is being modified. Whether the node it refers to is still part of the list is
/// verified by [`PooledList::remove_node()`][crate::PooledList::remove_node] and
/// [`PooledList::get()`][crate::PooledList::get].
///
/// # Example
///
/// ```rust
/// use pooled_list::{NodePool, PooledList};
///
/// let pool = NodePool::<u32, 8>::new();
/// let mut list = PooledList::new(&pool);
///
/// let node = list.push_back(42).unwrap();
/// list.push_back(43).unwrap();
///
/// assert_eq!(list.get(node), Ok(42));
/// assert_eq!(list.remove_node(node), Ok(42));
/// assert_eq!(list.len(), 1);
///
/// // The node has been released, so the reference no longer resolves.
/// assert!(list.get(node).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeRef {
    index: usize,
    generation: u32,
    owner: ListId,
}

impl NodeRef {
    #[must_use]
    pub(crate) fn new(index: usize, generation: u32, owner: ListId) -> Self {
        Self {
            index,
            generation,
            owner,
        }
    }

    #[must_use]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub(crate) fn owner(&self) -> ListId {
        self.owner
    }
}

/// Identifies one attachment of a list to a pool. Every attachment gets a new identity, so
/// node references from before a detach/attach cycle or from any other list never match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ListId(u64);

/// Zero is reserved for lists that are not attached to any pool.
static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

impl ListId {
    pub(crate) const DETACHED: Self = Self(0);

    #[must_use]
    pub(crate) fn next() -> Self {
        // Uniqueness is all we need, there is no data published through this counter.
        Self(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(NodeRef: Send, Sync, Copy);

    #[test]
    fn list_ids_are_unique() {
        let a = ListId::next();
        let b = ListId::next();

        assert_ne!(a, b);
        assert_ne!(a, ListId::DETACHED);
        assert_ne!(b, ListId::DETACHED);
    }

    #[test]
    fn node_ref_exposes_parts() {
        let owner = ListId::next();
        let node = NodeRef::new(3, 7, owner);

        assert_eq!(node.index(), 3);
        assert_eq!(node.generation(), 7);
        assert_eq!(node.owner(), owner);
    }
}
