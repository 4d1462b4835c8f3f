//! FIFO object pool
//!
//! Recycles short-lived objects (score popups) instead of reallocating them.
//! Only touched from the frame loop, so there is no locking.

use std::collections::VecDeque;

/// Queue of inactive objects ready for reuse
#[derive(Debug, Clone)]
pub struct ObjectPool<T> {
    free: VecDeque<T>,
    /// Create a new object when the queue is empty
    pub expandable: bool,
    /// Objects ever created by this pool
    created: usize,
}

impl<T> Default for ObjectPool<T> {
    fn default() -> Self {
        Self {
            free: VecDeque::new(),
            expandable: true,
            created: 0,
        }
    }
}

impl<T> ObjectPool<T> {
    /// Pool pre-filled with `initial_size` objects from `make`
    pub fn with_capacity(
        initial_size: usize,
        expandable: bool,
        mut make: impl FnMut() -> T,
    ) -> Self {
        let mut free = VecDeque::with_capacity(initial_size);
        for _ in 0..initial_size {
            free.push_back(make());
        }
        Self {
            free,
            expandable,
            created: initial_size,
        }
    }

    /// Take the oldest free object, or build one if allowed
    pub fn spawn_with(&mut self, make: impl FnOnce() -> T) -> Option<T> {
        if let Some(item) = self.free.pop_front() {
            return Some(item);
        }
        if self.expandable {
            self.created += 1;
            Some(make())
        } else {
            None
        }
    }

    /// Return an object for reuse
    pub fn despawn(&mut self, item: T) {
        self.free.push_back(item);
    }

    /// Objects currently waiting in the pool
    #[inline]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn created(&self) -> usize {
        self.created
    }
}

impl<T: Default> ObjectPool<T> {
    pub fn spawn(&mut self) -> Option<T> {
        self.spawn_with(T::default)
    }
}
