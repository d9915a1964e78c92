#![forbid(unsafe_code)]

use std::fmt;

/// Packed bijection between element ids and dense positions.
///
/// Live ids sit at positions `[0, count)`; free ids fill the rest of the
/// capacity. Deleting swaps the victim with the last live position, so both
/// `add` and `delete` are O(1) and the most recently deleted id is the next
/// one handed out.
///
/// `id` and `position` index straight into the backing arrays: passing a
/// value outside the current capacity panics and is the caller's
/// responsibility. `exists` and `delete` tolerate out-of-range ids.
#[derive(Clone, Default)]
pub struct ElementList {
    count: usize,
    id_to_position: Vec<u32>,
    position_to_id: Vec<u32>,
}

impl ElementList {
    /// Creates a list with `capacity` free ids and no live elements.
    ///
    /// Panics if `capacity` exceeds the `u32` id space.
    pub fn new(capacity: usize) -> Self {
        check_id_space(capacity);
        let identity: Vec<u32> = (0..capacity as u32).collect();
        Self {
            count: 0,
            id_to_position: identity.clone(),
            position_to_id: identity,
        }
    }

    /// Number of live ids.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of ids (live or free) the list can address.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.id_to_position.len()
    }

    /// Grows to `capacity`; returns false when no growth was needed.
    pub fn set_capacity(&mut self, capacity: usize) -> bool {
        self.set_capacity_with(capacity, |_| {})
    }

    /// Grows to `capacity`, calling `on_grow` with the new capacity once the
    /// arrays have been extended. Smaller or equal capacities are a no-op and
    /// do not call the hook.
    pub fn set_capacity_with(&mut self, capacity: usize, on_grow: impl FnOnce(usize)) -> bool {
        if capacity <= self.capacity() {
            return false;
        }
        self.grow(capacity);
        on_grow(capacity);
        true
    }

    fn grow(&mut self, capacity: usize) {
        check_id_space(capacity);
        let start = self.capacity() as u32;
        let end = capacity as u32;
        self.id_to_position.extend(start..end);
        self.position_to_id.extend(start..end);
    }

    /// Makes the next free id live and returns it, doubling capacity first if
    /// every id is in use.
    pub fn add(&mut self) -> u32 {
        self.add_with(|_| {})
    }

    /// Like [`ElementList::add`], calling `on_grow` with the new capacity if
    /// the add had to grow the list. The hook runs before the id is returned,
    /// so dependents are sized for it by the time the caller sees it.
    pub fn add_with(&mut self, on_grow: impl FnOnce(usize)) -> u32 {
        if self.count == self.capacity() {
            let capacity = (self.count * 2).max(1);
            self.grow(capacity);
            on_grow(capacity);
        }
        let id = self.position_to_id[self.count];
        self.count += 1;
        id
    }

    /// Makes a specific free id live. Returns false if it was already live.
    pub fn add_with_id(&mut self, id: u32) -> bool {
        let position = self.id_to_position[id as usize] as usize;
        if position < self.count {
            return false;
        }
        let next_position = self.count;
        if next_position != position {
            let next_id = self.position_to_id[next_position];
            self.position_to_id[position] = next_id;
            self.id_to_position[next_id as usize] = position as u32;
            self.position_to_id[next_position] = id;
            self.id_to_position[id as usize] = next_position as u32;
        }
        self.count += 1;
        true
    }

    /// True if `id` is currently live.
    #[inline]
    pub fn exists(&self, id: u32) -> bool {
        self.id_to_position
            .get(id as usize)
            .map_or(false, |&position| (position as usize) < self.count)
    }

    /// The id stored at `position`.
    #[inline]
    pub fn id(&self, position: usize) -> u32 {
        self.position_to_id[position]
    }

    /// The position currently held by `id`.
    #[inline]
    pub fn position(&self, id: u32) -> usize {
        self.id_to_position[id as usize] as usize
    }

    /// Live ids in position order.
    #[inline]
    pub fn ids(&self) -> &[u32] {
        &self.position_to_id[..self.count]
    }

    /// Releases `id`, moving the last live id into its position. Returns
    /// false if `id` was not live.
    pub fn delete(&mut self, id: u32) -> bool {
        if !self.exists(id) {
            return false;
        }
        let position = self.id_to_position[id as usize] as usize;
        let last_position = self.count - 1;
        if last_position != position {
            let last_id = self.position_to_id[last_position];
            self.position_to_id[position] = last_id;
            self.id_to_position[last_id as usize] = position as u32;
            self.id_to_position[id as usize] = last_position as u32;
            self.position_to_id[last_position] = id;
        }
        self.count -= 1;
        true
    }
}

#[inline]
fn check_id_space(capacity: usize) {
    assert!(
        capacity <= u32::MAX as usize,
        "element capacity {capacity} exceeds u32 ids"
    );
}

impl fmt::Debug for ElementList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementList")
            .field("count", &self.count)
            .field("ids", &self.position_to_id)
            .field("positions", &self.id_to_position)
            .finish()
    }
}
