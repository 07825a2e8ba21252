use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Stable, non-owning reference to a value stored in an [`Arena`].
///
/// A handle carries the generation of the slot it was issued for. Once the value
/// is removed the slot's generation moves on, so stale handles stop resolving
/// instead of pointing at whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational storage with slot recycling.
///
/// Iteration visits occupied slots in index order, which makes every scan
/// deterministic for a given sequence of inserts and removals.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    recycled: VecDeque<u32>, // Free slot indices, reused oldest first
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            recycled: VecDeque::new(),
            len: 0,
        }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            recycled: VecDeque::new(),
            len: 0,
        }
    }

    /// Stores a value, recycling a freed slot when one is available.
    pub fn insert(&mut self, value: T) -> Handle {
        self.len += 1;
        if let Some(index) = self.recycled.pop_front() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            Handle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            Handle::new(index, 0)
        }
    }

    /// Removes the value behind `handle`, invalidating every copy of it.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.recycled.push_back(handle.index);
        self.len -= 1;
        Some(value)
    }

    /// Removes every value matching `predicate` and returns them with their former handles.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<(Handle, T)>
    where
        F: FnMut(Handle, &T) -> bool,
    {
        let doomed: Vec<Handle> = self
            .iter()
            .filter(|(handle, value)| predicate(*handle, *value))
            .map(|(handle, _)| handle)
            .collect();

        doomed
            .into_iter()
            .filter_map(|handle| self.remove(handle).map(|value| (handle, value)))
            .collect()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Iterates over all live values in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Handle::new(idx as u32, slot.generation), value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(idx, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (Handle::new(idx as u32, generation), value))
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.iter().map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_ne!(a, b);
    }

    #[test]
    fn removed_handle_goes_stale() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        assert_eq!(arena.remove(a), Some(1));
        assert!(!arena.contains(a));
        assert_eq!(arena.remove(a), None);

        // The slot is recycled under a new generation
        let b = arena.insert(2);
        assert_eq!(b.index(), a.index());
        assert_eq!(b.generation(), a.generation() + 1);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(b), Some(&2));
    }

    #[test]
    fn iteration_follows_slot_order() {
        let mut arena = Arena::new();
        let handles: Vec<Handle> = (0..4).map(|i| arena.insert(i)).collect();
        arena.remove(handles[1]);

        let values: Vec<i32> = arena.values().copied().collect();
        assert_eq!(values, vec![0, 2, 3]);
    }

    #[test]
    fn remove_where_returns_removed_values() {
        let mut arena = Arena::new();
        for i in 0..6 {
            arena.insert(i);
        }

        let removed = arena.remove_where(|_, value| value % 2 == 0);
        let removed_values: Vec<i32> = removed.iter().map(|(_, v)| *v).collect();

        assert_eq!(removed_values, vec![0, 2, 4]);
        assert_eq!(arena.len(), 3);
        assert!(removed.iter().all(|(handle, _)| !arena.contains(*handle)));
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let mut arena = Arena::new();
        let a = arena.insert(10.0_f32);
        for (_, value) in arena.iter_mut() {
            *value += 1.0;
        }
        assert_eq!(arena.get(a), Some(&11.0));
    }
}
