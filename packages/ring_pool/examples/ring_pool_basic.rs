//! Basic usage of the `ring_pool` crate:
//!
//! * Creating a pool with a factory.
//! * Acquiring instances, both fresh and recycled.
//! * Releasing instances back to the pool.
//! * Watching the pool grow.

use new_zealand::nz;
use ring_pool::RingPool;

fn main() {
    let mut pool = RingPool::with_capacity(nz!(2), || String::with_capacity(128));

    // Nothing is stored yet, so each of these is constructed by the factory.
    let mut alice = pool.acquire();
    let mut bob = pool.acquire();

    alice.push_str("Alice");
    bob.push_str("Bob");

    println!(
        "Pool stores {} instances, with a capacity of {}",
        pool.len(),
        pool.capacity()
    );

    pool.release(alice);
    pool.release(bob);

    // Two stored instances would have filled a buffer of two slots, so the pool grew.
    println!(
        "After releasing two instances the pool stores {} with a capacity of {}",
        pool.len(),
        pool.capacity()
    );

    // Instances come back in the order they were released, with whatever contents they had.
    // Clearing them is up to the caller.
    let mut recycled = pool.acquire();
    println!("Recycled instance still contains: {recycled}");

    recycled.clear();
    recycled.push_str("Charlie");
    println!("Reused instance now contains: {recycled}");
}
