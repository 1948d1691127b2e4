use std::any::type_name;
use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::{Error, ListId, NodePool, NodeRef, NodeSlab, PushError, Result};

/// A doubly-linked list whose nodes come from a fixed-capacity [`NodePool`].
///
/// The list itself only keeps track of its first and last node and its length. Every push takes
/// one node from the pool and every removal returns one, so the list never allocates memory.
/// All operations at either end of the list, as well as removal of a node identified by a
/// [`NodeRef`], take constant time. Searching and clearing take time proportional to the
/// length of the list.
///
/// The list takes ownership of pushed values and hands them back when they are popped or
/// removed. It never inspects the values except through callbacks supplied by the caller, so
/// they may well be plain handles to data owned elsewhere (indexes, references, pointers).
///
/// # Exhaustion
///
/// A push fails with [`Error::PoolExhausted`] when every node of the pool is in use, leaving the
/// list unchanged and returning the value to the caller via [`PushError::into_inner()`].
///
/// # Attachment
///
/// A list is normally created attached to a pool via [`new()`][Self::new]. A list may also start
/// out [detached][Self::detached] and be [attached][Self::attach] later. Pushing to a detached
/// list fails with [`Error::NoPool`]. A list can only be attached to a different pool while it is
/// empty.
///
/// # Example
///
/// ```rust
/// use pooled_list::{NodePool, PooledList};
///
/// let pool = NodePool::<u32, 8>::new();
/// let mut list = PooledList::new(&pool);
///
/// list.push_back(20).unwrap();
/// list.push_back(30).unwrap();
/// list.push_front(10).unwrap();
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.pop_front(), Some(10));
/// assert_eq!(list.pop_back(), Some(30));
/// assert_eq!(list.pop_back(), Some(20));
/// assert_eq!(list.pop_back(), None);
/// ```
pub struct PooledList<'p, T, const CAPACITY: usize> {
    pool: Option<&'p NodePool<T, CAPACITY>>,

    /// Changes whenever the list is attached to a pool, so node references from a previous
    /// attachment are never confused with nodes of the current one.
    id: ListId,

    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<'p, T, const CAPACITY: usize> PooledList<'p, T, CAPACITY> {
    /// Creates an empty list that takes its nodes from `pool`.
    #[must_use]
    pub fn new(pool: &'p NodePool<T, CAPACITY>) -> Self {
        Self {
            pool: Some(pool),
            id: ListId::next(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list that is not attached to any pool.
    ///
    /// The list must be [attached][Self::attach] to a pool before items can be pushed to it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pooled_list::{Error, NodePool, PooledList};
    ///
    /// let pool = NodePool::<u32, 4>::new();
    /// let mut list = PooledList::detached();
    ///
    /// assert!(list.is_empty());
    /// assert_eq!(list.push_back(1).unwrap_err().error(), Error::NoPool);
    ///
    /// list.attach(&pool).unwrap();
    ///
    /// list.push_back(1).unwrap();
    /// assert_eq!(list.len(), 1);
    /// ```
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            pool: None,
            id: ListId::DETACHED,
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Attaches the list to `pool`, from which all future nodes will be taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListNotEmpty`] if the list contains any items, as those were taken from
    /// the pool the list is currently attached to.
    pub fn attach(&mut self, pool: &'p NodePool<T, CAPACITY>) -> Result<()> {
        self.ensure_empty()?;

        self.pool = Some(pool);
        self.id = ListId::next();

        trace!(list = ?self.id, "attached list of {} to node pool", type_name::<T>());

        Ok(())
    }

    /// Detaches the list from its pool, if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListNotEmpty`] if the list contains any items.
    pub fn detach(&mut self) -> Result<()> {
        self.ensure_empty()?;

        if self.pool.take().is_some() {
            trace!(list = ?self.id, "detached list of {} from node pool", type_name::<T>());
        }

        self.id = ListId::DETACHED;

        Ok(())
    }

    /// The pool the list takes its nodes from, if attached.
    #[must_use]
    pub fn pool(&self) -> Option<&'p NodePool<T, CAPACITY>> {
        self.pool
    }

    /// Whether the list is attached to a pool.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.pool.is_some()
    }

    /// The number of items in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list contains no items. A detached list is always empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `value` at the front of the list.
    ///
    /// Returns a reference to the new node, which may later be passed to
    /// [`remove_node()`][Self::remove_node].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolExhausted`] if the pool has no free nodes and [`Error::NoPool`] if the
    /// list is detached. The list is unchanged and the value is handed back inside the error.
    pub fn push_front(&mut self, value: T) -> std::result::Result<NodeRef, PushError<T>> {
        let Some(pool) = self.pool else {
            return Err(PushError::new(Error::NoPool, value));
        };

        let mut slab = pool.slab_mut();
        let index = self.allocate(&mut slab, value)?;

        slab.node_mut(index).next = self.head;

        match self.head {
            Some(head) => slab.node_mut(head).prev = Some(index),
            None => self.tail = Some(index),
        }

        self.head = Some(index);
        self.increment_len();

        #[cfg(debug_assertions)]
        self.integrity_check(&slab);

        Ok(slab.node_ref(index))
    }

    /// Inserts `value` at the back of the list.
    ///
    /// Returns a reference to the new node, which may later be passed to
    /// [`remove_node()`][Self::remove_node].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolExhausted`] if the pool has no free nodes and [`Error::NoPool`] if the
    /// list is detached. The list is unchanged and the value is handed back inside the error.
    pub fn push_back(&mut self, value: T) -> std::result::Result<NodeRef, PushError<T>> {
        let Some(pool) = self.pool else {
            return Err(PushError::new(Error::NoPool, value));
        };

        let mut slab = pool.slab_mut();
        let index = self.allocate(&mut slab, value)?;

        slab.node_mut(index).prev = self.tail;

        match self.tail {
            Some(tail) => slab.node_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }

        self.tail = Some(index);
        self.increment_len();

        #[cfg(debug_assertions)]
        self.integrity_check(&slab);

        Ok(slab.node_ref(index))
    }

    /// Removes the item at the front of the list and returns it,
    /// or `None` if the list is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let pool = self.pool?;
        let head = self.head?;

        let mut slab = pool.slab_mut();
        Some(self.unlink(&mut slab, head))
    }

    /// Removes the item at the back of the list and returns it,
    /// or `None` if the list is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let pool = self.pool?;
        let tail = self.tail?;

        let mut slab = pool.slab_mut();
        Some(self.unlink(&mut slab, tail))
    }

    /// Returns a clone of the item at the front of the list, or `None` if the list is empty.
    #[must_use]
    pub fn peek_front(&self) -> Option<T>
    where
        T: Clone,
    {
        let pool = self.pool?;
        let head = self.head?;

        Some(pool.slab().node(head).value.clone())
    }

    /// Returns a clone of the item at the back of the list, or `None` if the list is empty.
    #[must_use]
    pub fn peek_back(&self) -> Option<T>
    where
        T: Clone,
    {
        let pool = self.pool?;
        let tail = self.tail?;

        Some(pool.slab().node(tail).value.clone())
    }

    /// Returns a clone of the item in the node identified by `node`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if `node` is not a live node of this list and
    /// [`Error::NoPool`] if the list is detached.
    pub fn get(&self, node: NodeRef) -> Result<T>
    where
        T: Clone,
    {
        let pool = self.pool.ok_or(Error::NoPool)?;
        let slab = pool.slab();

        if !slab.is_live(node, self.id) {
            return Err(Error::InvalidNode);
        }

        Ok(slab.node(node.index()).value.clone())
    }

    /// Scans the list from front to back and returns a reference to the first node whose item
    /// matches `key` according to `predicate`, or `None` if no item matches.
    ///
    /// # Panics
    ///
    /// Panics if `predicate` modifies any list backed by the same pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pooled_list::{NodePool, PooledList};
    ///
    /// let pool = NodePool::<(u32, &str), 8>::new();
    /// let mut list = PooledList::new(&pool);
    ///
    /// list.push_back((1, "one")).unwrap();
    /// list.push_back((2, "two")).unwrap();
    ///
    /// let node = list.find(&2, |item, key| item.0 == *key).unwrap();
    ///
    /// assert_eq!(list.remove_node(node), Ok((2, "two")));
    /// assert!(list.find(&2, |item, key| item.0 == *key).is_none());
    /// ```
    #[must_use]
    pub fn find<K>(&self, key: &K, mut predicate: impl FnMut(&T, &K) -> bool) -> Option<NodeRef>
    where
        K: ?Sized,
    {
        let pool = self.pool?;
        let slab = pool.slab();

        let mut cursor = self.head;

        while let Some(index) = cursor {
            let node = slab.node(index);

            if predicate(&node.value, key) {
                return Some(slab.node_ref(index));
            }

            cursor = node.next;
        }

        None
    }

    /// Returns a reference to the first node (from the front) whose item is equal to `key`.
    #[must_use]
    pub fn find_eq<K>(&self, key: &K) -> Option<NodeRef>
    where
        K: ?Sized,
        T: PartialEq<K>,
    {
        self.find(key, |item, key| item == key)
    }

    /// Returns a reference to the first node (from the front) whose item compares as
    /// [`Ordering::Equal`] to `key` according to the three-way comparison `cmp`.
    #[must_use]
    pub fn find_by_cmp<K>(
        &self,
        key: &K,
        mut cmp: impl FnMut(&T, &K) -> Ordering,
    ) -> Option<NodeRef>
    where
        K: ?Sized,
    {
        self.find(key, |item, key| cmp(item, key) == Ordering::Equal)
    }

    /// Removes the node identified by `node` from the list and returns its item.
    ///
    /// The reference is validated first: the node must still be part of this list. This holds
    /// for references obtained from this list (via push or find) until the node is removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if `node` is not a live node of this list, for example
    /// because it has already been removed or because it belongs to a different list. Returns
    /// [`Error::NoPool`] if the list is detached. The list is unchanged in either case.
    pub fn remove_node(&mut self, node: NodeRef) -> Result<T> {
        let pool = self.pool.ok_or(Error::NoPool)?;
        let mut slab = pool.slab_mut();

        if !slab.is_live(node, self.id) {
            debug!(
                ?node,
                list = ?self.id,
                "rejected removal of a node that is not part of this list of {}",
                type_name::<T>()
            );

            return Err(Error::InvalidNode);
        }

        Ok(self.unlink(&mut slab, node.index()))
    }

    /// Removes the node identified by `node` from the list and returns its item, without
    /// verifying that the node is part of this list.
    ///
    /// This skips the validation performed by [`remove_node()`][Self::remove_node] in builds
    /// without debug assertions. The caller must guarantee that `node` was obtained from this
    /// list and has not been removed since. If that does not hold, the topology of this list and
    /// of whatever list owns the node becomes inconsistent. Memory safety is not affected.
    ///
    /// # Panics
    ///
    /// Panics if the list is detached or if the slot referenced by `node` is not in use.
    /// With debug assertions enabled, also panics if `node` is not a live node of this list.
    pub fn remove_node_unchecked(&mut self, node: NodeRef) -> T {
        let pool = self
            .pool
            .expect("remove_node_unchecked() called on a list that is not attached to a pool");
        let mut slab = pool.slab_mut();

        debug_assert!(
            slab.is_live(node, self.id),
            "remove_node_unchecked({node:?}) called with a node that is not part of this list of {}",
            type_name::<T>()
        );

        self.unlink(&mut slab, node.index())
    }

    /// Removes all items from the list, dropping them.
    pub fn clear(&mut self) {
        self.clear_with(drop);
    }

    /// Removes all items from the list, handing each one to `destructor` in front-to-back order.
    ///
    /// Each node is returned to the pool before its item is passed to `destructor`, so the
    /// callback is free to use the pool, including via other lists.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pooled_list::{NodePool, PooledList};
    ///
    /// let pool = NodePool::<u32, 8>::new();
    /// let mut list = PooledList::new(&pool);
    ///
    /// list.push_back(1).unwrap();
    /// list.push_back(2).unwrap();
    ///
    /// let mut released = Vec::new();
    /// list.clear_with(|item| released.push(item));
    ///
    /// assert_eq!(released, [1, 2]);
    /// assert!(list.is_empty());
    /// assert_eq!(pool.used_count(), 0);
    /// ```
    pub fn clear_with(&mut self, mut destructor: impl FnMut(T)) {
        let cleared = self.len;

        while let Some(value) = self.pop_front() {
            destructor(value);
        }

        if cleared > 0 {
            trace!(
                cleared,
                list = ?self.id,
                "cleared list of {}",
                type_name::<T>()
            );
        }
    }

    fn ensure_empty(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::ListNotEmpty { len: self.len })
        }
    }

    fn allocate(
        &self,
        slab: &mut NodeSlab<T, CAPACITY>,
        value: T,
    ) -> std::result::Result<usize, PushError<T>> {
        slab.allocate(value, self.id).map_err(|value| {
            debug!(
                capacity = CAPACITY,
                len = self.len,
                "push rejected because node pool of {} is exhausted",
                type_name::<T>()
            );

            PushError::new(Error::PoolExhausted { capacity: CAPACITY }, value)
        })
    }

    fn increment_len(&mut self) {
        self.len = self
            .len
            .checked_add(1)
            .expect("guarded by pool capacity, which cannot exceed usize::MAX");
    }

    /// Splices the node at `index` out of the list and returns it to the pool.
    fn unlink(&mut self, slab: &mut NodeSlab<T, CAPACITY>, index: usize) -> T {
        let node = slab.node(index);
        let (prev, next) = (node.prev, node.next);

        match prev {
            Some(prev) => slab.node_mut(prev).next = next,
            None => self.head = next,
        }

        match next {
            Some(next) => slab.node_mut(next).prev = prev,
            None => self.tail = prev,
        }

        self.len = self
            .len
            .checked_sub(1)
            .expect("unlinked a node from an empty list, so the node cannot be part of it");

        let value = slab.release(index);

        #[cfg(debug_assertions)]
        self.integrity_check(slab);

        value
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(debug_assertions)]
    fn integrity_check(&self, slab: &NodeSlab<T, CAPACITY>) {
        assert!(
            self.head.is_none() == (self.len == 0) && self.tail.is_none() == (self.len == 0),
            "list of {} has len {} but head {:?} and tail {:?}",
            type_name::<T>(),
            self.len,
            self.head,
            self.tail
        );

        let mut walked: usize = 0;
        let mut prev = None;
        let mut cursor = self.head;

        while let Some(index) = cursor {
            assert!(
                walked < self.len,
                "forward walk of list of {} exceeds its len {}",
                type_name::<T>(),
                self.len
            );

            let node = slab.node(index);

            assert!(
                node.owner == self.id,
                "node {index} is reachable from list {:?} but owned by {:?}",
                self.id,
                node.owner
            );

            assert!(
                node.prev == prev,
                "node {index} links back to {:?} but was reached from {prev:?}",
                node.prev
            );

            prev = Some(index);
            cursor = node.next;
            walked = walked
                .checked_add(1)
                .expect("guarded by the walk length assertion above");
        }

        assert!(
            walked == self.len && prev == self.tail,
            "forward walk of list of {} reached {prev:?} after {walked} steps but expected tail {:?} after {}",
            type_name::<T>(),
            self.tail,
            self.len
        );
    }
}

impl<T, const CAPACITY: usize> Default for PooledList<'_, T, CAPACITY> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<T, const CAPACITY: usize> fmt::Debug for PooledList<'_, T, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("id", &self.id)
            .field("attached", &self.is_attached())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("len", &self.len)
            .finish()
    }
}

impl<T, const CAPACITY: usize> Drop for PooledList<'_, T, CAPACITY> {
    fn drop(&mut self) {
        // Nodes always go back to the pool. The items are dropped, as the caller had no
        // opportunity to take them out.
        self.clear();
    }
}
