#![forbid(unsafe_code)]

use tracing::debug;

const NONE: u32 = u32::MAX;

const A_MULTIPLIER: u32 = 302_167;
const B_MULTIPLIER: u32 = 101_839;

/// Source of the `(a, b)` key for each id stored in an [`ElementPairMap`].
///
/// The map never copies keys; it reads them back through this trait whenever
/// it hashes or compares an entry, so the owner must keep the key of every
/// stored id unchanged until the id is removed.
pub trait PairKeys {
    /// Returns the key pair recorded for `id`.
    fn pair(&self, id: u32) -> (u32, u32);
}

impl PairKeys for (&[u32], &[u32]) {
    #[inline]
    fn pair(&self, id: u32) -> (u32, u32) {
        (self.0[id as usize], self.1[id as usize])
    }
}

/// Back-pointer of a chained entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Previous {
    /// The entry heads this bucket's chain.
    Head(u32),
    /// The entry follows this id.
    After(u32),
}

/// Chained hash index from an `(a, b)` pair to the id that owns it.
///
/// Keys live outside the map (see [`PairKeys`]); the map only threads ids
/// through per-bucket doubly linked chains. The bucket count is always a
/// power of two and growing it re-hashes every stored entry.
#[derive(Clone, Debug)]
pub struct ElementPairMap {
    buckets: Vec<u32>,
    next_ids: Vec<u32>,
    previous_ids: Vec<Previous>,
    len: usize,
}

#[inline]
fn hash(a: u32, b: u32) -> u32 {
    a.wrapping_mul(A_MULTIPLIER)
        .wrapping_add(b.wrapping_mul(B_MULTIPLIER))
}

impl ElementPairMap {
    /// Creates an empty map with at least `bucket_count` buckets, able to
    /// hold ids below `id_capacity`.
    pub fn new(bucket_count: usize, id_capacity: usize) -> Self {
        Self {
            buckets: vec![NONE; bucket_count.max(1).next_power_of_two()],
            next_ids: vec![NONE; id_capacity],
            previous_ids: vec![Previous::Head(0); id_capacity],
            len: 0,
        }
    }

    /// Number of stored ids.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Largest id this map can hold, plus one.
    pub fn id_capacity(&self) -> usize {
        self.next_ids.len()
    }

    /// Extends the per-id chain arrays. Never shrinks.
    pub fn set_id_capacity(&mut self, capacity: usize) {
        if capacity > self.next_ids.len() {
            self.next_ids.resize(capacity, NONE);
            self.previous_ids.resize(capacity, Previous::Head(0));
        }
    }

    /// Grows the bucket array to the next power of two at or above
    /// `bucket_count` and re-links every stored id under the new mask.
    pub fn set_bucket_count<K: PairKeys + ?Sized>(&mut self, bucket_count: usize, keys: &K) {
        if bucket_count <= self.buckets.len() {
            return;
        }
        let this = &*self;
        let ids: Vec<u32> = (0..this.buckets.len()).flat_map(|b| this.chain(b)).collect();
        let previous = self.buckets.len();
        self.buckets.clear();
        self.buckets.resize(bucket_count.next_power_of_two(), NONE);
        for &id in &ids {
            self.link(id, keys);
        }
        debug!(
            from = previous,
            to = self.buckets.len(),
            entries = ids.len(),
            "pair_map.rehash"
        );
    }

    #[inline]
    fn bucket_of(&self, a: u32, b: u32) -> usize {
        (hash(a, b) as usize) & (self.buckets.len() - 1)
    }

    fn link<K: PairKeys + ?Sized>(&mut self, id: u32, keys: &K) {
        let (a, b) = keys.pair(id);
        let bucket = self.bucket_of(a, b);
        let first = self.buckets[bucket];
        if first != NONE {
            self.previous_ids[first as usize] = Previous::After(id);
        }
        self.next_ids[id as usize] = first;
        self.previous_ids[id as usize] = Previous::Head(bucket as u32);
        self.buckets[bucket] = id;
    }

    /// Indexes `id` under the key currently reported for it by `keys`.
    ///
    /// `id` must not already be stored and the key must not already map to
    /// another id.
    pub fn add_value<K: PairKeys + ?Sized>(&mut self, id: u32, keys: &K) {
        self.link(id, keys);
        self.len += 1;
    }

    /// Removes a stored `id` from its chain.
    pub fn delete_value(&mut self, id: u32) {
        let previous = self.previous_ids[id as usize];
        let next = self.next_ids[id as usize];
        match previous {
            Previous::Head(bucket) => self.buckets[bucket as usize] = next,
            Previous::After(before) => self.next_ids[before as usize] = next,
        }
        if next != NONE {
            self.previous_ids[next as usize] = previous;
        }
        self.next_ids[id as usize] = NONE;
        self.len -= 1;
    }

    /// Returns the id stored under `(a, b)`, if any.
    pub fn get_value<K: PairKeys + ?Sized>(&self, a: u32, b: u32, keys: &K) -> Option<u32> {
        let mut id = self.buckets[self.bucket_of(a, b)];
        while id != NONE {
            if keys.pair(id) == (a, b) {
                return Some(id);
            }
            id = self.next_ids[id as usize];
        }
        None
    }

    fn chain(&self, bucket: usize) -> impl Iterator<Item = u32> + '_ {
        let mut id = self.buckets[bucket];
        std::iter::from_fn(move || {
            if id == NONE {
                return None;
            }
            let current = id;
            id = self.next_ids[current as usize];
            Some(current)
        })
    }

    /// Expected number of comparisons for a successful lookup of a
    /// uniformly chosen stored key. Returns 0 for an empty map.
    pub fn average_search_length(&self) -> f64 {
        let mut count = 0usize;
        let mut search_count = 0usize;
        for bucket in 0..self.buckets.len() {
            let size = self.chain(bucket).count();
            count += size;
            search_count += size * size;
        }
        if count == 0 {
            return 0.0;
        }
        search_count as f64 / count as f64
    }

    /// Histogram of chain lengths: entry `n` counts the buckets holding
    /// exactly `n` ids.
    pub fn bucket_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = Vec::new();
        for bucket in 0..self.buckets.len() {
            let size = self.chain(bucket).count();
            if sizes.len() <= size {
                sizes.resize(size + 1, 0);
            }
            sizes[size] += 1;
        }
        sizes
    }
}
