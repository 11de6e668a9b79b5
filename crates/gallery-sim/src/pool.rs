//! Generic reusable-object pool with generation-checked handles.
//!
//! Every slot keeps its `T` resident for reuse. A slot is either on the free
//! list or checked out, never both. Releasing bumps the slot's generation, so
//! any handle issued before the release goes stale and is rejected.
//!
//! The pool never resets or initializes `T`; callers do that after
//! `acquire` and before `release`.

use std::fmt;

use thiserror::Error;

use gallery_core::types::PoolHandle;

/// Why a release was refused. The pool is left untouched in every case.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("handle {0} points past the end of the pool")]
    UnknownSlot(PoolHandle),
    #[error("handle {0} is stale (slot generation is {1})")]
    StaleHandle(PoolHandle, u32),
    #[error("handle {0} refers to a slot that is already free")]
    AlreadyFree(PoolHandle),
}

struct Slot<T> {
    value: T,
    generation: u32,
    checked_out: bool,
}

pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    /// LIFO free list of slot indices.
    free: Vec<u32>,
    growth: usize,
    active: usize,
    factory: Box<dyn Fn() -> T + Send>,
}

impl<T> Pool<T> {
    /// Create a pool pre-filled with `initial_capacity` entities built by `factory`.
    /// A `growth` of zero is treated as one.
    pub fn new(initial_capacity: usize, growth: usize, factory: impl Fn() -> T + Send + 'static) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(initial_capacity),
            free: Vec::with_capacity(initial_capacity),
            growth: growth.max(1),
            active: 0,
            factory: Box::new(factory),
        };
        pool.grow(initial_capacity);
        pool
    }

    /// Check out a free slot, growing the pool if none is left.
    pub fn acquire(&mut self) -> PoolHandle {
        loop {
            if let Some(index) = self.free.pop() {
                let slot = &mut self.slots[index as usize];
                slot.checked_out = true;
                self.active += 1;
                return PoolHandle::new(index, slot.generation);
            }
            self.grow(self.growth);
        }
    }

    /// Return a slot to the free list.
    pub fn release(&mut self, handle: PoolHandle) -> Result<(), PoolError> {
        let slot = self
            .slots
            .get_mut(handle.index() as usize)
            .ok_or(PoolError::UnknownSlot(handle))?;
        if slot.generation != handle.generation() {
            return Err(PoolError::StaleHandle(handle, slot.generation));
        }
        if !slot.checked_out {
            return Err(PoolError::AlreadyFree(handle));
        }
        slot.checked_out = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.active -= 1;
        Ok(())
    }

    /// Release every checked-out slot. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let handles = self.active_handles();
        let count = handles.len();
        for handle in handles {
            // Handles come straight from the slot table, so release cannot fail.
            let _ = self.release(handle);
        }
        count
    }

    pub fn is_valid(&self, handle: PoolHandle) -> bool {
        self.slots
            .get(handle.index() as usize)
            .is_some_and(|s| s.checked_out && s.generation == handle.generation())
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots
            .get(handle.index() as usize)
            .filter(|s| s.checked_out && s.generation == handle.generation())
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|s| s.checked_out && s.generation == handle.generation())
            .map(|s| &mut s.value)
    }

    /// Number of checked-out slots.
    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total slots ever created.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_handles(&self) -> Vec<PoolHandle> {
        self.iter_active().map(|(h, _)| h).collect()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.checked_out)
            .map(|(i, s)| (PoolHandle::new(i as u32, s.generation), &s.value))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.checked_out)
            .map(|(i, s)| (PoolHandle::new(i as u32, s.generation), &mut s.value))
    }

    /// Every slot is in exactly one of {free list, checked out}, and the
    /// active counter agrees with the slot table.
    pub fn check_invariants(&self) -> bool {
        let mut on_free_list = vec![false; self.slots.len()];
        for &index in &self.free {
            match on_free_list.get_mut(index as usize) {
                Some(seen) if !*seen => *seen = true,
                _ => return false,
            }
        }
        let checked_out = self.slots.iter().filter(|s| s.checked_out).count();
        checked_out == self.active
            && self
                .slots
                .iter()
                .zip(&on_free_list)
                .all(|(slot, &free)| slot.checked_out != free)
    }

    fn grow(&mut self, count: usize) {
        for _ in 0..count {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                value: (self.factory)(),
                generation: 0,
                checked_out: false,
            });
            self.free.push(index);
        }
        // Hand out the lowest new index first.
        let new_start = self.free.len() - count;
        self.free[new_start..].reverse();
    }
}

impl<T: Default + 'static> Pool<T> {
    pub fn with_default(initial_capacity: usize, growth: usize) -> Self {
        Self::new(initial_capacity, growth, T::default)
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &self.slots.len())
            .field("active", &self.active)
            .field("free", &self.free.len())
            .field("growth", &self.growth)
            .finish()
    }
}
