use std::num::NonZero;

use crate::RingPool;
use crate::pool::DEFAULT_INITIAL_CAPACITY;

/// A [`RingPool`] of `Vec<T>` that hands out empty vectors with their allocation intact.
///
/// The point of pooling vectors is to reuse their backing storage. [`create()`][1] takes a
/// vector from the pool and clears it before returning it, so the caller always starts from an
/// empty vector whose capacity is whatever it grew to during earlier use.
///
/// Stored vectors keep their elements until they are handed out again by [`create()`][1].
///
/// # Example
///
/// ```rust
/// use ring_pool::SequencePool;
///
/// let mut pool = SequencePool::<String>::new();
///
/// let mut names = pool.create();
/// names.push("Alice".to_string());
/// names.push("Bob".to_string());
/// pool.release(names);
///
/// let names = pool.create();
/// assert!(names.is_empty());
/// assert!(names.capacity() >= 2);
/// ```
///
/// [1]: Self::create
#[derive(Debug)]
pub struct SequencePool<T> {
    inner: RingPool<Vec<T>>,
}

impl<T> SequencePool<T> {
    /// Creates a new [`SequencePool`] with the default initial capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates a new [`SequencePool`] with the given initial capacity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use new_zealand::nz;
    /// use ring_pool::SequencePool;
    ///
    /// let pool = SequencePool::<u8>::with_capacity(nz!(4));
    ///
    /// assert_eq!(pool.capacity(), 4);
    /// ```
    #[must_use]
    pub fn with_capacity(initial_capacity: NonZero<usize>) -> Self {
        let factory: fn() -> Vec<T> = Vec::new;

        Self {
            inner: RingPool::with_capacity(initial_capacity, factory),
        }
    }

    /// Takes an empty vector out of the pool, allocating a new one if the pool is empty.
    ///
    /// A recycled vector is cleared before it is returned but keeps its backing storage.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ring_pool::SequencePool;
    ///
    /// let mut pool = SequencePool::<u32>::new();
    ///
    /// let mut numbers = pool.create();
    /// numbers.extend([1, 2, 3]);
    /// let storage = numbers.as_ptr();
    /// pool.release(numbers);
    ///
    /// let numbers = pool.create();
    /// assert!(numbers.is_empty());
    /// assert_eq!(numbers.as_ptr(), storage);
    /// ```
    #[must_use]
    pub fn create(&mut self) -> Vec<T> {
        let mut sequence = self.inner.acquire();
        sequence.clear();
        sequence
    }

    /// Returns a vector to the pool so a later [`create()`][1] can reuse its storage.
    ///
    /// [1]: Self::create
    pub fn release(&mut self, sequence: Vec<T>) {
        self.inner.release(sequence);
    }

    /// Pre-warms the pool so it holds at least `count` vectors.
    ///
    /// This takes `count` vectors out of the pool (allocating any that are missing) and then
    /// returns all of them. Vectors already stored are cycled through rather than duplicated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ring_pool::SequencePool;
    ///
    /// let mut pool = SequencePool::<u64>::new();
    ///
    /// pool.seed(100);
    ///
    /// assert_eq!(pool.len(), 100);
    /// assert!(pool.capacity() > 100);
    /// ```
    pub fn seed(&mut self, count: usize) {
        let acquired = (0..count)
            .map(|_| self.inner.acquire())
            .collect::<Vec<_>>();

        for sequence in acquired {
            self.inner.release(sequence);
        }
    }

    /// The number of vectors the pool can hold before it has to grow.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// The number of vectors currently stored in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the pool has no stored vectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T> Default for SequencePool<T> {
    fn default() -> Self {
        Self::new()
    }
}
