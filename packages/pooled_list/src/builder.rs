use std::marker::PhantomData;

use crate::{DropPolicy, NodePool};

/// Builder for creating an instance of [`NodePool`].
///
/// You only need to use this builder if you want to customize the pool configuration.
/// The default configuration used by [`NodePool::new()`][1] is sufficient for most use cases.
/// The capacity of the pool is not configured here, as it is part of the pool type.
///
/// # Examples
///
/// ```
/// use pooled_list::{DropPolicy, NodePool};
///
/// let pool = NodePool::<u32, 32>::builder()
///     .drop_policy(DropPolicy::MayDropItems)
///     .build();
/// ```
///
/// [1]: NodePool::new
#[must_use]
pub struct NodePoolBuilder<T, const CAPACITY: usize> {
    drop_policy: DropPolicy,

    _item: PhantomData<T>,
}

impl<T, const CAPACITY: usize> std::fmt::Debug for NodePoolBuilder<T, CAPACITY> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodePoolBuilder")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("capacity", &CAPACITY)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<T, const CAPACITY: usize> NodePoolBuilder<T, CAPACITY> {
    pub(crate) fn new() -> Self {
        Self {
            drop_policy: DropPolicy::default(),
            _item: PhantomData,
        }
    }

    /// Sets the [drop policy][DropPolicy] for the pool. This governs how
    /// to treat nodes still in use when the pool is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooled_list::{DropPolicy, NodePool};
    ///
    /// let pool = NodePool::<u32, 32>::builder()
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    /// ```
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the node pool with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if `CAPACITY` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooled_list::NodePool;
    ///
    /// let pool = NodePool::<u32, 32>::builder().build();
    ///
    /// assert_eq!(pool.capacity(), 32);
    /// ```
    #[must_use]
    pub fn build(self) -> NodePool<T, CAPACITY> {
        NodePool::new_inner(self.drop_policy)
    }
}
