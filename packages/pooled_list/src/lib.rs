#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A doubly-linked list that takes its nodes from a fixed-capacity pool, for environments where
//! memory must be set aside up front and running out of it must be a recoverable condition.
//!
//! This crate provides two types:
//!
//! - [`NodePool`] - storage for a fixed number of list nodes, kept inline in the pool value.
//!   Creating the pool is the only time memory is obtained.
//! - [`PooledList`] - a doubly-linked list that borrows a [`NodePool`], taking a node from it for
//!   every push and returning the node for every pop or removal.
//!
//! # Key Features
//!
//! - **No allocation after construction**: pushing and popping only relink indexes within the
//!   pool, so neither ever touches the heap
//! - **Recoverable exhaustion**: pushing to a list whose pool is full returns
//!   [`Error::PoolExhausted`] together with the rejected value, leaving the list unchanged
//! - **Constant-time operations**: push and pop at both ends, and removal of any node identified
//!   by a [`NodeRef`], take constant time
//! - **Shared pools**: any number of lists may draw from the same pool
//! - **Checked or unchecked removal**: [`PooledList::remove_node()`] validates that the node is
//!   part of the list, [`PooledList::remove_node_unchecked()`] skips the validation
//! - **Opaque items**: the list never inspects its items except through caller-supplied callbacks
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```rust
//! use pooled_list::{NodePool, PooledList};
//!
//! let pool = NodePool::<u32, 16>::new();
//! let mut list = PooledList::new(&pool);
//!
//! list.push_back(10).unwrap();
//! list.push_back(20).unwrap();
//! list.push_front(5).unwrap();
//!
//! assert_eq!(list.len(), 3);
//! assert_eq!(pool.used_count(), 3);
//!
//! assert_eq!(list.pop_front(), Some(5));
//! assert_eq!(list.pop_back(), Some(20));
//! ```
//!
//! ## Handling exhaustion
//!
//! ```rust
//! use pooled_list::{Error, NodePool, PooledList};
//!
//! let pool = NodePool::<&str, 2>::new();
//! let mut list = PooledList::new(&pool);
//!
//! list.push_back("a").unwrap();
//! list.push_back("b").unwrap();
//!
//! match list.push_back("c") {
//!     Ok(_) => unreachable!("the pool only has two nodes"),
//!     Err(e) => {
//!         assert_eq!(e.error(), Error::PoolExhausted { capacity: 2 });
//!
//!         // The caller keeps ownership of the value that did not fit.
//!         assert_eq!(e.into_inner(), "c");
//!     }
//! }
//!
//! assert_eq!(list.len(), 2);
//! ```
//!
//! ## Finding and removing
//!
//! ```rust
//! use pooled_list::{NodePool, PooledList};
//!
//! let pool = NodePool::<u32, 16>::new();
//! let mut list = PooledList::new(&pool);
//!
//! for value in [3, 1, 4, 1, 5] {
//!     list.push_back(value).unwrap();
//! }
//!
//! let node = list.find_eq(&4).unwrap();
//! assert_eq!(list.remove_node(node), Ok(4));
//!
//! // The reference is no longer valid once its node has been removed.
//! assert!(list.remove_node(node).is_err());
//!
//! let mut remaining = Vec::new();
//! list.clear_with(|value| remaining.push(value));
//! assert_eq!(remaining, [3, 1, 1, 5]);
//! ```
//!
//! # Thread safety
//!
//! The pool and its lists are meant to be used from a single thread. A [`NodePool`] may be moved
//! to another thread while no list borrows it, but it cannot be shared between threads.

mod builder;
mod drop_policy;
mod error;
mod node_pool;
mod node_ref;
mod node_slab;
mod pooled_list;
mod slot;

pub use builder::*;
pub use drop_policy::*;
pub use error::{Error, PushError};
pub(crate) use error::Result;
pub use node_pool::NodePool;
pub use node_ref::NodeRef;
pub(crate) use node_ref::ListId;
pub(crate) use node_slab::*;
pub use pooled_list::PooledList;
pub(crate) use slot::*;
