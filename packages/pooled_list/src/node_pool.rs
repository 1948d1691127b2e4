use std::any::type_name;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::thread;

use tracing::debug;

use crate::{DropPolicy, NodePoolBuilder, NodeSlab};

/// A fixed-capacity pool of list nodes, the backing storage of one or more
/// [`PooledList`][crate::PooledList] instances.
///
/// The pool owns storage for `CAPACITY` nodes, kept inline in the pool value itself. Creating
/// the pool is the only time memory is obtained; after that, lists take nodes from the pool when
/// items are pushed and return them when items are removed, without ever touching the heap.
/// When all nodes are in use, pushing to any list backed by the pool fails with
/// [`Error::PoolExhausted`][crate::Error::PoolExhausted].
///
/// Lists borrow the pool, so any number of lists can share one pool. The pool is meant for use
/// by a single thread. It may be moved to another thread while no list borrows it.
///
/// # Example
///
/// ```rust
/// use pooled_list::{NodePool, PooledList};
///
/// let pool = NodePool::<u32, 4>::new();
///
/// let mut evens = PooledList::new(&pool);
/// let mut odds = PooledList::new(&pool);
///
/// evens.push_back(2).unwrap();
/// odds.push_back(1).unwrap();
/// odds.push_back(3).unwrap();
///
/// assert_eq!(pool.capacity(), 4);
/// assert_eq!(pool.used_count(), 3);
/// assert_eq!(pool.available(), 1);
/// ```
pub struct NodePool<T, const CAPACITY: usize> {
    slab: RefCell<NodeSlab<T, CAPACITY>>,

    drop_policy: DropPolicy,
}

impl<T, const CAPACITY: usize> NodePool<T, CAPACITY> {
    /// # Panics
    ///
    /// Panics if `CAPACITY` is zero.
    #[must_use]
    pub(crate) fn new_inner(drop_policy: DropPolicy) -> Self {
        Self {
            slab: RefCell::new(NodeSlab::new()),
            drop_policy,
        }
    }

    /// Creates a new [`NodePool`] with the default configuration, with every node free.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pooled_list::NodePool;
    ///
    /// let pool = NodePool::<String, 16>::new();
    ///
    /// assert_eq!(pool.capacity(), 16);
    /// assert_eq!(pool.used_count(), 0);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `CAPACITY` is zero.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a new [`NodePool`].
    ///
    /// Use this when you want to customize the pool configuration beyond the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pooled_list::{DropPolicy, NodePool};
    ///
    /// let pool = NodePool::<u32, 8>::builder()
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    ///
    /// assert_eq!(pool.used_count(), 0);
    /// ```
    pub fn builder() -> NodePoolBuilder<T, CAPACITY> {
        NodePoolBuilder::new()
    }

    /// The total number of nodes in the pool, whether in use or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        CAPACITY
    }

    /// The number of nodes currently in use by lists backed by this pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pooled_list::{NodePool, PooledList};
    ///
    /// let pool = NodePool::<u32, 4>::new();
    /// let mut list = PooledList::new(&pool);
    ///
    /// list.push_back(1).unwrap();
    /// assert_eq!(pool.used_count(), 1);
    ///
    /// list.pop_front();
    /// assert_eq!(pool.used_count(), 0);
    /// ```
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.slab().len()
    }

    /// The number of nodes that can still be taken from the pool.
    #[must_use]
    pub fn available(&self) -> usize {
        CAPACITY
            .checked_sub(self.used_count())
            .expect("the slab never hands out more nodes than its capacity")
    }

    /// Whether every node of the pool is in use.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slab().is_full()
    }

    /// Whether no node of the pool is in use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used_count() == 0
    }

    /// Returns every node to the free list, restoring the pool to its freshly created state.
    ///
    /// Resetting requires exclusive access to the pool, so it cannot happen while any list still
    /// borrows the pool. Lists release their nodes when dropped, so the pool is normally already
    /// empty at this point. Nodes still in use (e.g. because a list was leaked via
    /// [`std::mem::forget()`]) are reclaimed and their values dropped, regardless of the
    /// [drop policy][DropPolicy].
    ///
    /// Node references obtained before the reset never resolve again.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pooled_list::{NodePool, PooledList};
    ///
    /// let mut pool = NodePool::<u32, 4>::new();
    ///
    /// {
    ///     let mut list = PooledList::new(&pool);
    ///     list.push_back(1).unwrap();
    ///     std::mem::forget(list);
    /// }
    ///
    /// assert_eq!(pool.used_count(), 1);
    ///
    /// pool.reset();
    /// assert_eq!(pool.used_count(), 0);
    /// ```
    pub fn reset(&mut self) {
        let slab = self.slab.get_mut();

        debug!(
            reclaimed = slab.len(),
            capacity = CAPACITY,
            "resetting node pool of {}",
            type_name::<T>()
        );

        slab.reset();
    }

    /// # Panics
    ///
    /// Panics if the slab is exclusively borrowed, which can only happen if a caller-supplied
    /// callback accesses the pool while a list operation is in progress.
    pub(crate) fn slab(&self) -> Ref<'_, NodeSlab<T, CAPACITY>> {
        self.slab
            .try_borrow()
            .unwrap_or_else(|_| panic!("{}", Self::REENTRANCY_MESSAGE))
    }

    /// # Panics
    ///
    /// Panics if the slab is already borrowed, which can only happen if a caller-supplied
    /// callback accesses the pool while a list operation is in progress.
    pub(crate) fn slab_mut(&self) -> RefMut<'_, NodeSlab<T, CAPACITY>> {
        self.slab
            .try_borrow_mut()
            .unwrap_or_else(|_| panic!("{}", Self::REENTRANCY_MESSAGE))
    }

    const REENTRANCY_MESSAGE: &'static str =
        "node pool accessed from within a callback of a list operation on the same pool";
}

impl<T, const CAPACITY: usize> Default for NodePool<T, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAPACITY: usize> fmt::Debug for NodePool<T, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(type_name::<Self>());
        debug.field("capacity", &CAPACITY);

        // Debug formatting may legitimately happen from inside a callback of a list operation.
        match self.slab.try_borrow() {
            Ok(slab) => debug.field("used_count", &slab.len()),
            Err(_) => debug.field("used_count", &format_args!("<borrowed>")),
        };

        debug.field("drop_policy", &self.drop_policy).finish()
    }
}

impl<T, const CAPACITY: usize> Drop for NodePool<T, CAPACITY> {
    fn drop(&mut self) {
        let used = self.slab.get_mut().len();

        // If we are already panicking, we do not want to panic again because that will
        // simply obscure whatever the original panic was, leading to debug difficulties.
        if self.drop_policy == DropPolicy::MustNotDropItems && !thread::panicking() {
            assert!(
                used == 0,
                "dropped a node pool of {} with {used} nodes in use with a policy that says it must be empty when dropped",
                type_name::<T>()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::PooledList;

    assert_impl_all!(NodePool<u32, 4>: Send);
    assert_not_impl_any!(NodePool<u32, 4>: Sync);
    assert_not_impl_any!(NodePool<Rc<u32>, 4>: Send, Sync);

    #[test]
    fn fresh_pool_is_empty() {
        let pool = NodePool::<u32, 8>::new();

        assert_eq!(pool.capacity(), 8);
        assert_eq!(pool.used_count(), 0);
        assert_eq!(pool.available(), 8);
        assert!(pool.is_empty());
        assert!(!pool.is_full());
    }

    #[test]
    fn default_is_new() {
        let pool = NodePool::<u32, 3>::default();

        assert_eq!(pool.capacity(), 3);
        assert!(pool.is_empty());
    }

    #[test]
    fn counts_track_list_usage() {
        let pool = NodePool::<u32, 2>::new();
        let mut list = PooledList::new(&pool);

        list.push_back(1).unwrap();
        assert_eq!(pool.used_count(), 1);
        assert_eq!(pool.available(), 1);
        assert!(!pool.is_empty());
        assert!(!pool.is_full());

        list.push_back(2).unwrap();
        assert_eq!(pool.used_count(), 2);
        assert_eq!(pool.available(), 0);
        assert!(pool.is_full());
    }

    #[test]
    fn reset_reclaims_leaked_nodes() {
        let mut pool = NodePool::<u32, 2>::new();

        {
            let mut list = PooledList::new(&pool);
            list.push_back(1).unwrap();
            list.push_back(2).unwrap();
            std::mem::forget(list);
        }

        assert!(pool.is_full());

        pool.reset();

        assert!(pool.is_empty());

        let mut list = PooledList::new(&pool);
        list.push_back(3).unwrap();
        list.push_back(4).unwrap();
        assert_eq!(pool.used_count(), 2);
    }

    #[test]
    fn drop_drops_leaked_values() {
        let value = Rc::new(Cell::new(0));

        {
            let pool = NodePool::<Rc<Cell<i32>>, 2>::new();
            let mut list = PooledList::new(&pool);
            list.push_back(Rc::clone(&value)).unwrap();
            std::mem::forget(list);

            assert_eq!(Rc::strong_count(&value), 2);
        }

        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    #[should_panic]
    fn drop_in_use_with_forbidden_to_drop_policy_panics() {
        let pool = NodePool::<u32, 2>::builder()
            .drop_policy(DropPolicy::MustNotDropItems)
            .build();

        let mut list = PooledList::new(&pool);
        list.push_back(1).unwrap();
        std::mem::forget(list);
    }

    #[test]
    fn drop_unused_with_forbidden_to_drop_policy_ok() {
        let pool = NodePool::<u32, 2>::builder()
            .drop_policy(DropPolicy::MustNotDropItems)
            .build();

        let mut list = PooledList::new(&pool);
        list.push_back(1).unwrap();
        drop(list);

        drop(pool);
    }

    #[test]
    fn debug_output_mentions_usage() {
        let pool = NodePool::<u32, 2>::new();
        let mut list = PooledList::new(&pool);
        list.push_back(1).unwrap();

        let output = format!("{pool:?}");

        assert!(output.contains("capacity: 2"));
        assert!(output.contains("used_count: 1"));
    }

    #[test]
    #[should_panic]
    fn zero_capacity_is_panic() {
        drop(NodePool::<u32, 0>::new());
    }
}
