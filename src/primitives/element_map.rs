#![forbid(unsafe_code)]

const NONE: u32 = u32::MAX;

#[inline]
fn some(id: u32) -> Option<u32> {
    (id != NONE).then_some(id)
}

/// One-to-many map from parent ids to child ids.
///
/// Each parent heads an intrusive doubly linked list threaded through flat
/// `next`/`previous` arrays indexed by child id. Children are pushed at the
/// head, so iteration yields the most recently added child first.
///
/// A child may belong to at most one parent at a time and the map does not
/// record which: callers pass the parent back in on removal.
#[derive(Clone, Debug, Default)]
pub struct ElementMap {
    child_count: Vec<u32>,
    first_child: Vec<u32>,
    next_child: Vec<u32>,
    previous_child: Vec<u32>,
}

impl ElementMap {
    /// Creates a map addressing `parent_capacity` parents and
    /// `child_capacity` children, all parents empty.
    pub fn new(parent_capacity: usize, child_capacity: usize) -> Self {
        Self {
            child_count: vec![0; parent_capacity],
            first_child: vec![NONE; parent_capacity],
            next_child: vec![NONE; child_capacity],
            previous_child: vec![NONE; child_capacity],
        }
    }

    /// Number of addressable parents.
    pub fn parent_capacity(&self) -> usize {
        self.child_count.len()
    }

    /// Number of addressable children.
    pub fn child_capacity(&self) -> usize {
        self.next_child.len()
    }

    /// Extends the parent arrays; new parents start empty. Never shrinks.
    pub fn set_parent_capacity(&mut self, capacity: usize) {
        if capacity > self.child_count.len() {
            self.child_count.resize(capacity, 0);
            self.first_child.resize(capacity, NONE);
        }
    }

    /// Extends the child arrays. Never shrinks.
    pub fn set_child_capacity(&mut self, capacity: usize) {
        if capacity > self.next_child.len() {
            self.next_child.resize(capacity, NONE);
            self.previous_child.resize(capacity, NONE);
        }
    }

    /// Pushes `child` onto the head of `parent`'s list.
    ///
    /// `child` must not currently belong to any parent.
    pub fn add_child(&mut self, parent: u32, child: u32) {
        let (p, c) = (parent as usize, child as usize);
        let first = self.first_child[p];
        if first != NONE {
            self.previous_child[first as usize] = child;
        }
        self.next_child[c] = first;
        self.previous_child[c] = NONE;
        self.first_child[p] = child;
        self.child_count[p] += 1;
    }

    /// Splices `child` out of `parent`'s list.
    ///
    /// `child` must currently belong to `parent`.
    pub fn delete_child(&mut self, parent: u32, child: u32) {
        let (p, c) = (parent as usize, child as usize);
        debug_assert!(self.child_count[p] > 0, "delete_child on empty parent {parent}");
        let next = self.next_child[c];
        let previous = self.previous_child[c];

        if next != NONE {
            self.previous_child[next as usize] = previous;
        }
        if previous == NONE {
            debug_assert_eq!(self.first_child[p], child, "child {child} is not under parent {parent}");
            self.first_child[p] = next;
        } else {
            self.next_child[previous as usize] = next;
        }

        self.next_child[c] = NONE;
        self.previous_child[c] = NONE;
        self.child_count[p] -= 1;
    }

    /// Number of children under `parent`.
    #[inline]
    pub fn child_count(&self, parent: u32) -> usize {
        self.child_count[parent as usize] as usize
    }

    /// Most recently added child of `parent`.
    #[inline]
    pub fn first_child(&self, parent: u32) -> Option<u32> {
        some(self.first_child[parent as usize])
    }

    /// The child added to the same parent just before `child`.
    #[inline]
    pub fn next_child(&self, child: u32) -> Option<u32> {
        some(self.next_child[child as usize])
    }

    /// Iterates `parent`'s children, newest first.
    pub fn children(&self, parent: u32) -> Children<'_> {
        Children {
            map: self,
            next: self.first_child(parent),
        }
    }
}

/// Iterator over one parent's children.
pub struct Children<'a> {
    map: &'a ElementMap,
    next: Option<u32>,
}

impl Iterator for Children<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.map.next_child(current);
        Some(current)
    }
}
