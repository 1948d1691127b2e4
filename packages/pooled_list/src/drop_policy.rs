/// Determines what happens when a [`NodePool`][crate::NodePool] is dropped while some of its
/// nodes are still in use.
///
/// Lists return their nodes to the pool when they are dropped, so nodes can only remain in use
/// at that point if a list was leaked. By default, the values of any such nodes are dropped
/// together with the pool.
///
/// # Examples
///
/// ```
/// use pooled_list::{DropPolicy, NodePool};
///
/// // The drop policy is set at pool creation time.
/// let pool = NodePool::<u32, 16>::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The pool will drop the values of any nodes still in use when the pool is dropped.
    /// This is the default.
    #[default]
    MayDropItems,

    /// The pool will panic if any of its nodes are still in use when it is dropped.
    ///
    /// This may be valuable if leaking a list is considered a bug, for example when the values
    /// are handles whose release must be performed explicitly via
    /// [`PooledList::clear_with()`][crate::PooledList::clear_with].
    MustNotDropItems,
}
