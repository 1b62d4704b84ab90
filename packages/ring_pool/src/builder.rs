use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZero;

use crate::RingPool;
use crate::pool::DEFAULT_INITIAL_CAPACITY;

/// Builder for creating an instance of [`RingPool`].
///
/// You only need to use this builder if you want to customize the pool configuration.
/// The default configuration used by [`RingPool::new()`][1] is sufficient for most use cases.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use ring_pool::RingPool;
///
/// let pool = RingPool::builder(|| vec![0_u8; 4096])
///     .initial_capacity(nz!(64))
///     .build();
///
/// assert_eq!(pool.capacity(), 64);
/// ```
///
/// [1]: RingPool::new
#[must_use]
pub struct RingPoolBuilder<T, F> {
    initial_capacity: NonZero<usize>,
    factory: F,

    _item: PhantomData<T>,
}

impl<T, F> fmt::Debug for RingPoolBuilder<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingPoolBuilder")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("initial_capacity", &self.initial_capacity)
            .finish_non_exhaustive()
    }
}

impl<T, F> RingPoolBuilder<T, F>
where
    F: FnMut() -> T,
{
    pub(crate) fn new(factory: F) -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            factory,
            _item: PhantomData,
        }
    }

    /// Sets the capacity the pool starts with.
    ///
    /// The pool grows as soon as a release would fill every slot, so a pool with an initial
    /// capacity of `n` stores up to `n - 1` instances before it first grows.
    ///
    /// # Examples
    ///
    /// ```
    /// use new_zealand::nz;
    /// use ring_pool::RingPool;
    ///
    /// let pool = RingPool::builder(String::new)
    ///     .initial_capacity(nz!(1))
    ///     .build();
    ///
    /// assert_eq!(pool.capacity(), 1);
    /// ```
    pub fn initial_capacity(mut self, initial_capacity: NonZero<usize>) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Builds the ring pool with the specified configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_pool::RingPool;
    ///
    /// let pool = RingPool::builder(String::new).build();
    ///
    /// assert!(pool.is_empty());
    /// ```
    #[must_use]
    pub fn build(self) -> RingPool<T, F> {
        RingPool::new_inner(self.initial_capacity, self.factory)
    }
}
