//! Flat-array building blocks the graph is composed from.
//!
//! None of these structures know about nodes or links; they operate on raw
//! `u32` ids and leave capacity policy to their owner.

/// Packed id/position bijection with delete-by-swap.
///
/// Live ids occupy positions `[0, count)`; growth doubles capacity.
pub mod element_list;

/// Parent to children adjacency over intrusive linked lists.
pub mod element_map;

/// Chained hash index from an `(a, b)` pair to an id.
pub mod pair_map;

pub use element_list::ElementList;
pub use element_map::ElementMap;
pub use pair_map::{ElementPairMap, PairKeys};
