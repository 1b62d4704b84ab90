use std::any::type_name;
use std::fmt;
use std::iter;
use std::num::NonZero;

use new_zealand::nz;
use tracing::{debug, trace};

use crate::RingPoolBuilder;

/// Initial capacity used by constructors that do not take an explicit capacity.
pub(crate) const DEFAULT_INITIAL_CAPACITY: NonZero<usize> = nz!(16);

/// An object pool that recycles instances of `T` through a ring buffer that grows on demand.
///
/// Instances are handed out by [`acquire()`][1] and returned by [`release()`][2]. Returned
/// instances are handed out again in the order they were released (first in, first out). When
/// the pool has nothing stored, [`acquire()`][1] constructs a fresh instance via the factory the
/// pool was created with.
///
/// # Resource usage
///
/// The pool starts with the capacity it was created with. Whenever a release would leave the
/// buffer completely full, the capacity doubles, so the number of stored instances is always
/// strictly below [`capacity()`][3]. The capacity never shrinks.
///
/// The pool does not reset or drop stored instances. Whatever state an instance had when it was
/// released is what the next caller of [`acquire()`][1] receives.
///
/// # Caller obligations
///
/// The pool does not track where instances came from. Releasing an instance that was never
/// acquired from this pool simply stores it. If `T` is a shared handle (e.g. `Rc<U>`), releasing
/// two clones of the same handle stores both of them and they may later be handed out to two
/// different callers at once; avoiding that is up to the caller.
///
/// # Thread safety
///
/// The pool has no internal synchronization and all operations take `&mut self`. It can be moved
/// between threads if `T` and the factory can.
///
/// # Example
///
/// ```rust
/// use new_zealand::nz;
/// use ring_pool::RingPool;
///
/// let mut next_id = 0_u32;
/// let mut pool = RingPool::with_capacity(nz!(2), move || {
///     next_id += 1;
///     next_id
/// });
///
/// let first = pool.acquire();
/// assert_eq!(first, 1);
///
/// pool.release(first);
///
/// // Recycled, not constructed.
/// assert_eq!(pool.acquire(), 1);
/// assert_eq!(pool.acquire(), 2);
/// ```
///
/// [1]: Self::acquire
/// [2]: Self::release
/// [3]: Self::capacity
pub struct RingPool<T, F = fn() -> T> {
    /// The ring buffer. Slots in the range from `remove_cursor` (inclusive) to `insert_cursor`
    /// (exclusive), wrapping at the end, hold stored instances; all other slots are `None`.
    ///
    /// The length of this Vec is the capacity of the pool. It only changes when we grow.
    slots: Vec<Option<T>>,

    /// Index of the slot the next release writes to.
    insert_cursor: usize,

    /// Index of the slot the next acquire reads from. Equal to `insert_cursor` if and only if
    /// the pool is empty - we never let the buffer become full, so there is no ambiguity.
    remove_cursor: usize,

    factory: F,
}

impl<T, F> RingPool<T, F>
where
    F: FnMut() -> T,
{
    #[must_use]
    pub(crate) fn new_inner(initial_capacity: NonZero<usize>, factory: F) -> Self {
        Self {
            slots: iter::repeat_with(|| None)
                .take(initial_capacity.get())
                .collect(),
            insert_cursor: 0,
            remove_cursor: 0,
            factory,
        }
    }

    /// Creates a new [`RingPool`] with the default initial capacity.
    ///
    /// The pool starts empty. The factory is called whenever an instance is acquired while the
    /// pool has nothing stored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ring_pool::RingPool;
    ///
    /// let mut pool = RingPool::new(|| Vec::<u8>::with_capacity(1024));
    ///
    /// assert!(pool.is_empty());
    /// assert!(pool.capacity() > 0);
    ///
    /// let buffer = pool.acquire();
    /// assert!(buffer.capacity() >= 1024);
    /// ```
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self::builder(factory).build()
    }

    /// Creates a new [`RingPool`] that can store `initial_capacity - 1` instances before it
    /// needs to grow.
    ///
    /// # Example
    ///
    /// ```rust
    /// use new_zealand::nz;
    /// use ring_pool::RingPool;
    ///
    /// let pool = RingPool::with_capacity(nz!(8), String::new);
    ///
    /// assert_eq!(pool.capacity(), 8);
    /// assert!(pool.is_empty());
    /// ```
    #[must_use]
    pub fn with_capacity(initial_capacity: NonZero<usize>, factory: F) -> Self {
        Self::builder(factory)
            .initial_capacity(initial_capacity)
            .build()
    }

    /// Starts building a new [`RingPool`] that constructs fresh instances with `factory`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use new_zealand::nz;
    /// use ring_pool::RingPool;
    ///
    /// let pool = RingPool::builder(String::new)
    ///     .initial_capacity(nz!(32))
    ///     .build();
    ///
    /// assert_eq!(pool.capacity(), 32);
    /// ```
    pub fn builder(factory: F) -> RingPoolBuilder<T, F> {
        RingPoolBuilder::new(factory)
    }

    /// Takes an instance out of the pool, constructing a new one if the pool is empty.
    ///
    /// Stored instances are handed out in the order they were released. If the pool is empty,
    /// the factory is called and its result is returned without touching the pool's storage.
    /// A panic in the factory propagates to the caller and leaves the pool unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ring_pool::RingPool;
    ///
    /// let mut pool = RingPool::new(|| 0_u64);
    ///
    /// pool.release(10);
    /// pool.release(20);
    ///
    /// assert_eq!(pool.acquire(), 10);
    /// assert_eq!(pool.acquire(), 20);
    ///
    /// // Empty again, so the factory provides the value.
    /// assert_eq!(pool.acquire(), 0);
    /// ```
    #[must_use]
    pub fn acquire(&mut self) -> T {
        if let Some(item) = self.take_stored() {
            return item;
        }

        trace!(
            item_type = type_name::<T>(),
            capacity = self.capacity(),
            "pool is empty, constructing new instance"
        );

        (self.factory)()
    }
}

impl<T, F> RingPool<T, F> {
    /// The number of instances the pool can hold before it has to grow.
    ///
    /// The pool grows as soon as the number of stored instances would reach this value, so at
    /// most `capacity() - 1` instances are ever stored at rest.
    ///
    /// # Example
    ///
    /// ```rust
    /// use new_zealand::nz;
    /// use ring_pool::RingPool;
    ///
    /// let mut pool = RingPool::with_capacity(nz!(2), || 0_u8);
    /// assert_eq!(pool.capacity(), 2);
    ///
    /// pool.release(1);
    /// assert_eq!(pool.capacity(), 2);
    ///
    /// // Storing a second instance would fill the buffer, so it doubles instead.
    /// pool.release(2);
    /// assert_eq!(pool.capacity(), 4);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of instances currently stored in the pool.
    ///
    /// Instances that have been acquired and not yet released are not counted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ring_pool::RingPool;
    ///
    /// let mut pool = RingPool::new(|| 'x');
    /// assert_eq!(pool.len(), 0);
    ///
    /// pool.release('a');
    /// pool.release('b');
    /// assert_eq!(pool.len(), 2);
    ///
    /// _ = pool.acquire();
    /// assert_eq!(pool.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        if self.insert_cursor >= self.remove_cursor {
            self.insert_cursor
                .checked_sub(self.remove_cursor)
                .expect("guarded by comparison above")
        } else {
            // The occupied range wraps around the end of the buffer.
            self.capacity()
                .checked_sub(self.remove_cursor)
                .and_then(|tail| tail.checked_add(self.insert_cursor))
                .expect("both cursors are below capacity, so the wrapped count cannot overflow")
        }
    }

    /// Whether the pool has no stored instances.
    ///
    /// The next [`acquire()`][1] on an empty pool calls the factory.
    ///
    /// [1]: Self::acquire
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insert_cursor == self.remove_cursor
    }

    /// Returns an instance to the pool so a later acquire can hand it out again.
    ///
    /// This never fails. If storing the instance would leave the buffer full, the capacity is
    /// doubled. Growing preserves the first-in-first-out order of the stored instances.
    ///
    /// The pool does not check whether the instance came from this pool.
    ///
    /// # Panics
    ///
    /// Panics if doubling the capacity would overflow `usize`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ring_pool::RingPool;
    ///
    /// let mut pool = RingPool::new(String::new);
    ///
    /// let mut name = pool.acquire();
    /// name.push_str("Alice");
    ///
    /// pool.release(name);
    /// assert_eq!(pool.len(), 1);
    /// ```
    pub fn release(&mut self, item: T) {
        let slot = self
            .slots
            .get_mut(self.insert_cursor)
            .expect("insert cursor is always within the bounds of the buffer");

        debug_assert!(
            slot.is_none(),
            "slot at the insert cursor must be vacant because the buffer is never full"
        );

        *slot = Some(item);
        self.insert_cursor = self.next_index(self.insert_cursor);

        if self.insert_cursor == self.remove_cursor {
            self.grow();
        }
    }

    /// Takes an instance out of the pool, or calls `create` to make one if the pool is empty.
    ///
    /// This is the fallible counterpart of [`acquire()`][1] for instances whose construction
    /// can fail. Any error returned by `create` is returned unchanged, and the pool is left
    /// exactly as it was. The pool's own factory is not called.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::io;
    ///
    /// use ring_pool::RingPool;
    ///
    /// let mut pool = RingPool::new(|| 0_u32);
    ///
    /// let result: Result<u32, io::Error> = pool.try_acquire_with(|| {
    ///     Err(io::Error::other("no more handles"))
    /// });
    /// assert!(result.is_err());
    ///
    /// pool.release(7);
    ///
    /// // A stored instance is available, so `create` is never called.
    /// let result: Result<u32, io::Error> = pool.try_acquire_with(|| unreachable!());
    /// assert_eq!(result.unwrap(), 7);
    /// ```
    ///
    /// [1]: Self::acquire
    pub fn try_acquire_with<E>(
        &mut self,
        create: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if let Some(item) = self.take_stored() {
            return Ok(item);
        }

        trace!(
            item_type = type_name::<T>(),
            capacity = self.capacity(),
            "pool is empty, attempting to construct new instance"
        );

        create()
    }

    fn take_stored(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let item = self
            .slots
            .get_mut(self.remove_cursor)
            .and_then(Option::take)
            .expect("slot at the remove cursor of a non-empty pool is always occupied");

        self.remove_cursor = self.next_index(self.remove_cursor);

        Some(item)
    }

    fn next_index(&self, index: usize) -> usize {
        let next = index
            .checked_add(1)
            .expect("cursors are always below capacity, so this cannot overflow");

        if next == self.capacity() { 0 } else { next }
    }

    /// Doubles the capacity. Called when the last release wrapped the insert cursor onto the
    /// remove cursor, meaning every slot is occupied.
    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .expect("capacity overflow: the pool cannot hold more than usize::MAX instances");

        // The remove cursor can be anywhere in the buffer, so we rotate rather than copy
        // straight across. After this, the oldest stored instance is at index 0.
        self.slots.rotate_left(self.remove_cursor);
        self.slots.resize_with(new_capacity, || None);

        self.remove_cursor = 0;
        self.insert_cursor = old_capacity;

        debug!(
            item_type = type_name::<T>(),
            old_capacity, new_capacity, "pool storage is full, capacity doubled"
        );
    }

    #[cfg(test)]
    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    pub(crate) fn integrity_check(&self) {
        let capacity = self.capacity();

        assert!(capacity > 0, "pool capacity can never be zero");
        assert!(self.insert_cursor < capacity, "insert cursor out of bounds");
        assert!(self.remove_cursor < capacity, "remove cursor out of bounds");
        assert!(self.len() < capacity, "pool buffer must never be full at rest");

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.len(), "occupied slot count disagrees with cursors");

        let mut index = self.remove_cursor;
        while index != self.insert_cursor {
            assert!(
                self.slots.get(index).is_some_and(Option::is_some),
                "slot {index} is between the cursors but vacant"
            );
            index = self.next_index(index);
        }
    }
}

impl<T> Default for RingPool<T>
where
    T: Default,
{
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T, F> fmt::Debug for RingPool<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingPool")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("insert_cursor", &self.insert_cursor)
            .field("remove_cursor", &self.remove_cursor)
            .finish_non_exhaustive()
    }
}
