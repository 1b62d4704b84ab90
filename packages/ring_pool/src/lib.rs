#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! An object pool that recycles instances of a type through a growing ring buffer.
//!
//! This crate provides [`RingPool`], a pool that hands out recycled instances in the order they
//! were returned to it and falls back to a user-supplied factory whenever it has nothing stored.
//! The pool starts with a fixed capacity and doubles it whenever a release would otherwise fill
//! the buffer, so returning an instance to the pool never fails.
//!
//! Two thin wrappers build on the same storage:
//!
//! * [`SequencePool`] - recycles `Vec<T>` instances, handing them out empty but with their
//!   backing allocation intact.
//! * [`LifecyclePool`] - recycles items implementing [`Attach`], attaching a payload when an item
//!   is handed out and detaching it before the item is stored again.
//!
//! # Ownership
//!
//! Instances move by value. The caller owns an instance from [`acquire()`][1] until it is passed
//! to [`release()`][2], after which the pool owns it until the next acquire hands it out again.
//! The pool does not track item identity: it will happily store an instance that was never
//! obtained from it. Stored instances are kept as they were released; only the wrappers reset
//! them, and only in the ways described on each wrapper.
//!
//! # Examples
//!
//! ```rust
//! use new_zealand::nz;
//! use ring_pool::RingPool;
//!
//! let mut pool = RingPool::with_capacity(nz!(4), || String::with_capacity(64));
//!
//! // The pool is empty, so this is served by the factory.
//! let mut greeting = pool.acquire();
//! greeting.push_str("Hello");
//!
//! pool.release(greeting);
//! assert_eq!(pool.len(), 1);
//!
//! // The released instance is handed out again, contents and all.
//! let recycled = pool.acquire();
//! assert_eq!(recycled, "Hello");
//! assert!(pool.is_empty());
//! ```
//!
//! Recycling sequences without reallocating their storage:
//!
//! ```rust
//! use ring_pool::SequencePool;
//!
//! let mut pool = SequencePool::<u32>::new();
//!
//! let mut numbers = pool.create();
//! numbers.extend([1, 2, 3]);
//! pool.release(numbers);
//!
//! let numbers = pool.create();
//! assert!(numbers.is_empty());
//! assert!(numbers.capacity() >= 3);
//! ```
//!
//! [1]: RingPool::acquire
//! [2]: RingPool::release

mod builder;
mod lifecycle_pool;
mod pool;
mod sequence_pool;

pub use builder::*;
pub use lifecycle_pool::*;
pub use pool::*;
pub use sequence_pool::*;
