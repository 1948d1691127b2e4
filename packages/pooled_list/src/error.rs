use std::fmt;

use thiserror::Error;

/// Errors that can occur when operating on a [`PooledList`][crate::PooledList].
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Every node of the backing pool is already in use. The list was left unchanged.
    #[error("node pool is exhausted: all {capacity} nodes are in use")]
    PoolExhausted {
        /// The fixed capacity of the pool that ran out of nodes.
        capacity: usize,
    },

    /// The list is not attached to a node pool.
    #[error("list is not attached to a node pool")]
    NoPool,

    /// The operation requires an empty list, e.g. attaching a list to a different pool.
    #[error("operation requires an empty list but the list contains {len} items")]
    ListNotEmpty {
        /// The number of items in the list at the time of the call.
        len: usize,
    },

    /// The node reference does not identify a live node of this list. Either the node has been
    /// removed since the reference was obtained or the reference belongs to a different list.
    #[error("node reference does not identify a live node of this list")]
    InvalidNode,
}

/// A specialized `Result` type for list operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

/// A failed push. Ownership of the rejected value is handed back to the caller.
///
/// # Examples
///
/// ```
/// use pooled_list::{Error, NodePool, PooledList};
///
/// let pool = NodePool::<&str, 1>::new();
/// let mut list = PooledList::new(&pool);
///
/// list.push_back("first").unwrap();
///
/// let rejected = list.push_back("second").unwrap_err();
/// assert_eq!(rejected.error(), Error::PoolExhausted { capacity: 1 });
/// assert_eq!(rejected.into_inner(), "second");
/// ```
#[derive(Error)]
#[error("{error}")]
pub struct PushError<T> {
    error: Error,
    value: T,
}

impl<T> PushError<T> {
    pub(crate) fn new(error: Error, value: T) -> Self {
        Self { error, value }
    }

    /// The reason the push failed.
    #[must_use]
    pub fn error(&self) -> Error {
        self.error
    }

    /// Takes back the value that could not be pushed.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

// The value is opaque to us, so it is deliberately not required to implement `Debug`.
impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> From<PushError<T>> for Error {
    fn from(value: PushError<T>) -> Self {
        value.error
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug, Copy);
    assert_impl_all!(PushError<String>: Send, Sync, Debug);

    #[test]
    fn pool_exhausted_mentions_capacity() {
        let error = Error::PoolExhausted { capacity: 32 };

        assert!(error.to_string().contains("32"));
    }

    #[test]
    fn push_error_displays_inner_error() {
        let error = PushError::new(Error::NoPool, 123_u32);

        assert_eq!(error.to_string(), Error::NoPool.to_string());
    }

    #[test]
    fn push_error_returns_value() {
        let error = PushError::new(Error::PoolExhausted { capacity: 1 }, "rejected".to_string());

        assert_eq!(error.error(), Error::PoolExhausted { capacity: 1 });
        assert_eq!(error.into_inner(), "rejected");
    }

    #[test]
    fn push_error_converts_to_error() {
        let error: Error = PushError::new(Error::NoPool, ()).into();

        assert_eq!(error, Error::NoPool);
    }

    #[test]
    fn push_error_debug_works_without_debug_value() {
        struct Opaque;

        let error = PushError::new(Error::NoPool, Opaque);

        assert!(format!("{error:?}").contains("NoPool"));
    }
}
