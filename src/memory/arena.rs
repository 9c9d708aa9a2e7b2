//! Allocation pool that tracks every live value so a whole search can be
//! torn down in one call.
//!
//! Values live in stable slots addressed by a [`Handle`]. A separate tracking
//! table lists the live handles; releasing one value scans that table and
//! fills the hole with the last entry, so the table stays dense without
//! preserving order. Slot generations make a released handle stale, so it can
//! never reach a value allocated later in the same slot.

use crate::error::{GpError, Result};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    tracked: Vec<Handle>,
}

impl<T> Arena<T> {
    /// Create an arena whose tracking table has room for `capacity` handles.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut tracked = Vec::new();
        tracked
            .try_reserve_exact(capacity.max(1))
            .map_err(|e| GpError::Allocation(format!("arena tracking table: {}", e)))?;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity.max(1))
            .map_err(|e| GpError::Allocation(format!("arena slots: {}", e)))?;

        Ok(Self {
            slots,
            free: Vec::new(),
            tracked,
        })
    }

    /// Store `value` and start tracking it.
    pub fn allocate(&mut self, value: T) -> Result<Handle> {
        if self.tracked.len() == self.tracked.capacity() {
            let additional = self.tracked.capacity().max(1);
            self.tracked
                .try_reserve_exact(additional)
                .map_err(|e| GpError::Allocation(format!("arena tracking table: {}", e)))?;
            log::debug!("Arena tracking table grown to {} slots", self.tracked.capacity());
        }

        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.value = Some(value);
                Handle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots
                    .try_reserve(1)
                    .map_err(|e| GpError::Allocation(format!("arena slots: {}", e)))?;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                Handle {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };

        self.tracked.push(handle);
        Ok(handle)
    }

    /// Stop tracking `handle` and hand its value back.
    ///
    /// An unknown or already released handle is reported and yields `None`.
    pub fn release(&mut self, handle: Handle) -> Option<T> {
        let Some(position) = self.tracked.iter().position(|h| *h == handle) else {
            log::warn!("Arena release of untracked handle {:?}", handle);
            return None;
        };

        self.tracked.swap_remove(position);
        let slot = &mut self.slots[handle.index];
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        slot.value.take()
    }

    /// Drop every tracked value. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let released = self.tracked.len();
        for handle in self.tracked.drain(..) {
            let slot = &mut self.slots[handle.index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = None;
            self.free.push(handle.index);
        }
        released
    }

    /// Release everything, then the arena itself.
    pub fn teardown(mut self) -> usize {
        self.release_all()
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Current size of the tracking table.
    pub fn capacity(&self) -> usize {
        self.tracked.capacity()
    }

    pub fn handles(&self) -> &[Handle] {
        &self.tracked
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    /// Panics on a stale handle: holding one is a lifetime bug in the caller.
    fn index(&self, handle: Handle) -> &T {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("stale arena handle {:?}", handle),
        }
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut T {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("stale arena handle {:?}", handle),
        }
    }
}
