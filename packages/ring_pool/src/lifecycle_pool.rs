use std::fmt;
use std::num::NonZero;

use crate::RingPool;

/// An item that is bound to some external payload while in use and unbound while pooled.
///
/// [`LifecyclePool`] calls [`attach()`][1] every time it hands the item out and
/// [`detach()`][2] every time the item is returned, before the item is stored. The pool
/// guarantees that the two calls alternate for any item it manages: an item is never attached
/// twice without a detach in between.
///
/// # Example
///
/// ```rust
/// use ring_pool::Attach;
///
/// #[derive(Default)]
/// struct Connection {
///     peer: Option<String>,
/// }
///
/// impl Attach for Connection {
///     type Payload = String;
///
///     fn attach(&mut self, payload: Option<String>) {
///         self.peer = payload;
///     }
///
///     fn detach(&mut self) {
///         self.peer = None;
///     }
/// }
/// ```
///
/// [1]: Self::attach
/// [2]: Self::detach
pub trait Attach {
    /// The value an item is bound to while it is in use.
    type Payload;

    /// Binds the item to `payload`. Called when the item is handed out by the pool.
    fn attach(&mut self, payload: Option<Self::Payload>);

    /// Releases whatever the item was bound to. Called before the item is stored in the pool.
    fn detach(&mut self);
}

/// A [`RingPool`] of items that are attached to a payload while in use.
///
/// [`acquire()`][1] hands out an item (recycled or freshly constructed) after calling
/// [`Attach::attach()`] on it. [`release()`][2] calls [`Attach::detach()`] before storing the
/// item, so no stored item ever still refers to the payload of its previous user.
///
/// A panic in `attach()` or `detach()` propagates to the caller. The item involved is dropped
/// and the pool remains usable.
///
/// # Example
///
/// ```rust
/// use ring_pool::{Attach, LifecyclePool};
///
/// #[derive(Default)]
/// struct Session {
///     user: Option<String>,
/// }
///
/// impl Attach for Session {
///     type Payload = String;
///
///     fn attach(&mut self, payload: Option<String>) {
///         self.user = payload;
///     }
///
///     fn detach(&mut self) {
///         self.user = None;
///     }
/// }
///
/// let mut pool = LifecyclePool::new(Session::default);
///
/// let session = pool.acquire(Some("alice".to_string()));
/// assert_eq!(session.user.as_deref(), Some("alice"));
///
/// pool.release(session);
///
/// let session = pool.acquire(None);
/// assert_eq!(session.user, None);
/// ```
///
/// [1]: Self::acquire
/// [2]: Self::release
pub struct LifecyclePool<T, F = fn() -> T> {
    inner: RingPool<T, F>,
}

impl<T, F> LifecyclePool<T, F>
where
    T: Attach,
    F: FnMut() -> T,
{
    /// Creates a new [`LifecyclePool`] with the default initial capacity.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            inner: RingPool::new(factory),
        }
    }

    /// Creates a new [`LifecyclePool`] with the given initial capacity.
    #[must_use]
    pub fn with_capacity(initial_capacity: NonZero<usize>, factory: F) -> Self {
        Self {
            inner: RingPool::with_capacity(initial_capacity, factory),
        }
    }

    /// Takes an item out of the pool and attaches it to `payload`.
    ///
    /// If the pool is empty, a new item is constructed by the factory and attached.
    #[must_use]
    pub fn acquire(&mut self, payload: Option<T::Payload>) -> T {
        let mut item = self.inner.acquire();
        item.attach(payload);
        item
    }
}

impl<T, F> LifecyclePool<T, F>
where
    T: Attach,
{
    /// Detaches the item and returns it to the pool.
    ///
    /// The item is only stored once `detach()` has returned.
    pub fn release(&mut self, mut item: T) {
        item.detach();
        self.inner.release(item);
    }

    /// The number of items the pool can hold before it has to grow.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// The number of detached items currently stored in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the pool has no stored items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T, F> From<RingPool<T, F>> for LifecyclePool<T, F>
where
    T: Attach,
{
    /// Wraps an existing pool. Items already stored in it are assumed to be detached.
    fn from(inner: RingPool<T, F>) -> Self {
        Self { inner }
    }
}

impl<T, F> fmt::Debug for LifecyclePool<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecyclePool")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(
        clippy::arithmetic_side_effects,
        reason = "we do not need to worry about these things when writing test code"
    )]

    use std::cell::{Cell, RefCell};
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    use new_zealand::nz;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Event {
        Attach { id: u32, payload: Option<&'static str> },
        Detach { id: u32 },
    }

    type Journal = Rc<RefCell<Vec<Event>>>;

    /// Records every lifecycle call in a shared journal and panics if the alternation
    /// between attach and detach is ever broken.
    #[derive(Debug)]
    struct Tracked {
        id: u32,
        payload: Option<&'static str>,
        attached: bool,
        journal: Journal,
    }

    impl Attach for Tracked {
        type Payload = &'static str;

        fn attach(&mut self, payload: Option<&'static str>) {
            assert!(!self.attached, "item {} attached twice", self.id);

            self.attached = true;
            self.payload = payload;
            self.journal.borrow_mut().push(Event::Attach {
                id: self.id,
                payload,
            });
        }

        fn detach(&mut self) {
            assert!(self.attached, "item {} detached while not attached", self.id);

            self.attached = false;
            self.payload = None;
            self.journal
                .borrow_mut()
                .push(Event::Detach { id: self.id });
        }
    }

    fn tracked_pool(
        initial_capacity: NonZero<usize>,
    ) -> (LifecyclePool<Tracked, impl FnMut() -> Tracked>, Journal) {
        let journal = Journal::default();
        let next_id = Cell::new(0);

        let pool = LifecyclePool::with_capacity(initial_capacity, {
            let journal = Rc::clone(&journal);
            move || {
                next_id.set(next_id.get() + 1);
                Tracked {
                    id: next_id.get(),
                    payload: None,
                    attached: false,
                    journal: Rc::clone(&journal),
                }
            }
        });

        (pool, journal)
    }

    #[test]
    fn acquire_attaches_payload() {
        let (mut pool, journal) = tracked_pool(nz!(2));

        let item = pool.acquire(Some("first"));

        assert_eq!(item.payload, Some("first"));
        assert!(item.attached);
        assert_eq!(
            *journal.borrow(),
            vec![Event::Attach {
                id: 1,
                payload: Some("first")
            }]
        );
    }

    #[test]
    fn acquire_without_payload_still_attaches() {
        let (mut pool, journal) = tracked_pool(nz!(2));

        let item = pool.acquire(None);

        assert!(item.attached);
        assert_eq!(item.payload, None);
        assert_eq!(journal.borrow().len(), 1);
    }

    #[test]
    fn release_detaches_before_storing() {
        let (mut pool, journal) = tracked_pool(nz!(2));

        let item = pool.acquire(Some("first"));
        pool.release(item);

        assert_eq!(pool.len(), 1);
        assert_eq!(
            journal.borrow().last(),
            Some(&Event::Detach { id: 1 })
        );

        // Look at the stored item directly: it must already be detached.
        let stored = pool.inner.acquire();
        assert!(!stored.attached);
        assert_eq!(stored.payload, None);
    }

    #[test]
    fn recycled_item_sees_only_new_payload() {
        let (mut pool, journal) = tracked_pool(nz!(2));

        let item = pool.acquire(Some("old owner"));
        pool.release(item);

        let item = pool.acquire(Some("new owner"));

        assert_eq!(item.id, 1);
        assert_eq!(item.payload, Some("new owner"));
        assert_eq!(
            *journal.borrow(),
            vec![
                Event::Attach {
                    id: 1,
                    payload: Some("old owner")
                },
                Event::Detach { id: 1 },
                Event::Attach {
                    id: 1,
                    payload: Some("new owner")
                },
            ]
        );
    }

    #[test]
    fn attach_and_detach_alternate_across_growth() {
        let (mut pool, journal) = tracked_pool(nz!(1));

        for round in 0..5 {
            let items = (0..=round)
                .map(|_| pool.acquire(Some("payload")))
                .collect::<Vec<_>>();

            for item in items {
                pool.release(item);
            }

            pool.inner.integrity_check();
        }

        // Every item must see strictly alternating attach/detach calls, starting with attach.
        for id in 1..=5 {
            let calls = journal
                .borrow()
                .iter()
                .filter(|event| match event {
                    Event::Attach { id: event_id, .. } | Event::Detach { id: event_id } => {
                        *event_id == id
                    }
                })
                .cloned()
                .collect::<Vec<_>>();

            assert!(!calls.is_empty());

            for (index, event) in calls.iter().enumerate() {
                let expect_attach = index % 2 == 0;
                assert_eq!(matches!(event, Event::Attach { .. }), expect_attach);
            }
        }

        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn detach_called_exactly_once_per_release() {
        let (mut pool, journal) = tracked_pool(nz!(4));

        let a = pool.acquire(None);
        let b = pool.acquire(None);
        pool.release(a);
        pool.release(b);

        let detaches = journal
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Detach { .. }))
            .count();

        assert_eq!(detaches, 2);
    }

    #[test]
    fn panicking_detach_drops_item_and_keeps_pool_usable() {
        struct Fragile {
            fail_detach: bool,
        }

        impl Attach for Fragile {
            type Payload = bool;

            fn attach(&mut self, payload: Option<bool>) {
                self.fail_detach = payload.unwrap_or_default();
            }

            fn detach(&mut self) {
                assert!(!self.fail_detach, "detach failed");
            }
        }

        let mut pool = LifecyclePool::with_capacity(nz!(2), || Fragile { fail_detach: false });

        let item = pool.acquire(Some(true));
        let result = catch_unwind(AssertUnwindSafe(|| pool.release(item)));

        assert!(result.is_err());
        assert!(pool.is_empty());
        pool.inner.integrity_check();

        let item = pool.acquire(Some(false));
        pool.release(item);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    #[should_panic(expected = "attach failed")]
    fn panicking_attach_propagates() {
        struct Refusing;

        impl Attach for Refusing {
            type Payload = ();

            fn attach(&mut self, _payload: Option<()>) {
                panic!("attach failed");
            }

            fn detach(&mut self) {}
        }

        let mut pool = LifecyclePool::with_capacity(nz!(2), || Refusing);

        _ = pool.acquire(None);
    }

    #[test]
    fn from_ring_pool_keeps_stored_items() {
        let journal = Journal::default();

        let mut ring = RingPool::with_capacity(nz!(4), {
            let journal = Rc::clone(&journal);
            move || Tracked {
                id: 99,
                payload: None,
                attached: false,
                journal: Rc::clone(&journal),
            }
        });

        let item = ring.acquire();
        ring.release(item);

        let mut pool = LifecyclePool::from(ring);
        assert_eq!(pool.len(), 1);

        let item = pool.acquire(Some("wrapped"));
        assert_eq!(item.id, 99);
        assert_eq!(item.payload, Some("wrapped"));
    }

    #[test]
    fn debug_output_includes_inner_pool() {
        let (pool, _) = tracked_pool(nz!(2));

        let output = format!("{pool:?}");

        assert!(output.contains("LifecyclePool"));
        assert!(output.contains("RingPool"));
    }

    #[test]
    fn thread_mobility() {
        struct Plain;

        impl Attach for Plain {
            type Payload = u32;

            fn attach(&mut self, _payload: Option<u32>) {}

            fn detach(&mut self) {}
        }

        assert_impl_all!(LifecyclePool<Plain>: Send, Sync);
        assert_not_impl_any!(LifecyclePool<Tracked>: Send, Sync);
    }
}
