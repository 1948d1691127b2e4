//! Randomized comparison of `PooledList` against `VecDeque`, which serves as the model of
//! correct behavior. The capacity limit of the pool is modeled explicitly.

use std::collections::VecDeque;

use pooled_list::{Error, NodePool, NodeRef, PooledList};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const CAPACITY: usize = 16;
const OPERATIONS: usize = 5_000;

fn contents(list: &mut PooledList<'_, u32, CAPACITY>) -> Vec<u32> {
    // Walks the list by popping everything and pushing it back in the same order.
    let mut items = Vec::with_capacity(list.len());

    while let Some(item) = list.pop_front() {
        items.push(item);
    }

    for item in &items {
        list.push_back(*item).unwrap();
    }

    items
}

#[test]
fn random_operations_match_model() {
    for seed in 0..8 {
        let pool = NodePool::<u32, CAPACITY>::new();
        let mut list = PooledList::new(&pool);
        let mut model = VecDeque::new();
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut next_value: u32 = 0;

        for _ in 0..OPERATIONS {
            match rng.random_range(0..6) {
                0 | 1 => {
                    next_value = next_value.wrapping_add(1);
                    let result = if rng.random_bool(0.5) {
                        model.push_front(next_value);
                        list.push_front(next_value)
                    } else {
                        model.push_back(next_value);
                        list.push_back(next_value)
                    };

                    if model.len() > CAPACITY {
                        let error = result.unwrap_err();
                        assert_eq!(error.error(), Error::PoolExhausted { capacity: CAPACITY });

                        // Undo the model change, the list must not have changed either.
                        let rejected = error.into_inner();
                        let position = model
                            .iter()
                            .position(|item| *item == rejected)
                            .expect("rejected value was pushed to the model");
                        _ = model.remove(position);
                    } else {
                        result.unwrap();
                    }
                }
                2 => assert_eq!(list.pop_front(), model.pop_front()),
                3 => assert_eq!(list.pop_back(), model.pop_back()),
                4 => {
                    if model.is_empty() {
                        assert!(list.find_eq(&0).is_none());
                        continue;
                    }

                    let position = rng.random_range(0..model.len());
                    let key = *model.get(position).expect("guarded by range above");

                    let node = list.find_eq(&key).expect("value present in the model");
                    assert_eq!(list.remove_node(node), Ok(key));
                    _ = model.remove(position);

                    assert!(list.find_eq(&key).is_none());
                }
                _ => {
                    if rng.random_ratio(1, 20) {
                        let mut cleared = Vec::new();
                        list.clear_with(|item| cleared.push(item));
                        assert_eq!(cleared, Vec::from(std::mem::take(&mut model)));
                    }
                }
            }

            assert_eq!(list.len(), model.len());
            assert_eq!(list.is_empty(), model.is_empty());
            assert_eq!(pool.used_count(), model.len());
            assert_eq!(list.peek_front(), model.front().copied());
            assert_eq!(list.peek_back(), model.back().copied());
        }

        assert_eq!(contents(&mut list), Vec::from(model));
    }
}

#[test]
fn fill_to_capacity_then_drain_from_both_ends() {
    let pool = NodePool::<u32, CAPACITY>::new();
    let mut list = PooledList::new(&pool);

    for value in 0..u32::try_from(CAPACITY).unwrap() {
        list.push_back(value).unwrap();
    }

    assert!(pool.is_full());
    assert_eq!(
        list.push_front(999).unwrap_err().error(),
        Error::PoolExhausted { capacity: CAPACITY }
    );
    assert_eq!(list.len(), CAPACITY);

    let mut front = 0;
    let mut back = u32::try_from(CAPACITY).unwrap() - 1;

    while front <= back {
        assert_eq!(list.pop_front(), Some(front));
        front += 1;

        if front > back {
            break;
        }

        assert_eq!(list.pop_back(), Some(back));
        back -= 1;
    }

    assert!(list.is_empty());
    assert!(pool.is_empty());
}

#[test]
fn node_refs_stay_valid_while_list_changes() {
    let pool = NodePool::<u32, CAPACITY>::new();
    let mut list = PooledList::new(&pool);

    let nodes: Vec<NodeRef> = (0..8).map(|value| list.push_back(value).unwrap()).collect();

    // Remove every other node in reverse, touching head, tail and interior positions.
    for node in nodes.iter().rev().step_by(2) {
        list.remove_node(*node).unwrap();
    }

    list.push_front(100).unwrap();
    list.push_back(200).unwrap();

    for (value, node) in (0..).zip(&nodes) {
        if value % 2 == 0 {
            assert_eq!(list.get(*node), Ok(value));
        } else {
            assert_eq!(list.get(*node), Err(Error::InvalidNode));
        }
    }

    assert_eq!(contents(&mut list), [100, 0, 2, 4, 6, 200]);
}
