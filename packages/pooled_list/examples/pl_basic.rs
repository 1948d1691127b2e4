//! Basic usage of the `pooled_list` crate:
//!
//! * Creating a pool and a list backed by it.
//! * Pushing items until the pool runs out of nodes.
//! * Finding and removing items.
//! * Clearing the list with a callback that releases each item.

use pooled_list::{Error, NodePool, PooledList};

/// Stands in for some resource the application must release explicitly.
#[derive(Debug)]
struct Buffer {
    id: u32,
}

fn main() {
    // All storage for the nodes is set aside here. Nothing below allocates.
    let pool = NodePool::<Buffer, 4>::new();
    let mut queue = PooledList::new(&pool);

    for id in 0..6 {
        match queue.push_back(Buffer { id }) {
            Ok(_) => println!("Queued buffer {id}"),
            Err(e) if e.error() == (Error::PoolExhausted { capacity: 4 }) => {
                // The caller gets the value back and decides what to do with it.
                let rejected = e.into_inner();
                println!("Queue is full, rejected buffer {}", rejected.id);
            }
            Err(e) => panic!("unexpected push failure: {e}"),
        }
    }

    println!(
        "Pool has {} of {} nodes in use",
        pool.used_count(),
        pool.capacity()
    );

    // Pull an item out of the middle of the queue.
    if let Some(node) = queue.find(&2, |buffer, id| buffer.id == *id) {
        let buffer = queue.remove_node(node).expect("node was just found in this list");
        println!("Removed buffer {} out of order", buffer.id);
    }

    if let Some(buffer) = queue.pop_front() {
        println!("Processed buffer {}", buffer.id);
    }

    // Release whatever is left, in queue order.
    queue.clear_with(|buffer| println!("Released buffer {}", buffer.id));

    println!("Pool has {} nodes in use after clearing", pool.used_count());
}
