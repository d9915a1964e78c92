#![forbid(unsafe_code)]

//! Element identifiers and the small enums that key graph structure.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the id as an array index.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                $name(value)
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

element_id!(
    /// Identifier of a graph vertex.
    NodeId
);
element_id!(
    /// Identifier of the undirected container between one unordered node pair.
    LinkId
);
element_id!(
    /// Identifier of a directed or flat relation within a link.
    EdgeId
);
element_id!(
    /// Identifier of one instance of an edge's relation.
    TransactionId
);
element_id!(
    /// Identifier of a named per-element value column.
    AttributeId
);

/// Attachment point of a link at one of its nodes.
///
/// `link * 2` addresses the low-node end and `link * 2 + 1` the high-node end.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct LinkEnd(pub u32);

impl LinkEnd {
    /// The end of `link` attached to its low node.
    #[inline]
    pub const fn low(link: LinkId) -> Self {
        LinkEnd(link.0 * 2)
    }

    /// The end of `link` attached to its high node.
    #[inline]
    pub const fn high(link: LinkId) -> Self {
        LinkEnd(link.0 * 2 + 1)
    }

    /// The link this end belongs to.
    #[inline]
    pub const fn link(self) -> LinkId {
        LinkId(self.0 >> 1)
    }

    /// True for the low-node end.
    #[inline]
    pub const fn is_low(self) -> bool {
        self.0 & 1 == 0
    }

    /// True for the high-node end.
    #[inline]
    pub const fn is_high(self) -> bool {
        self.0 & 1 == 1
    }

    /// The other end of the same link.
    #[inline]
    pub const fn opposite(self) -> Self {
        LinkEnd(self.0 ^ 1)
    }
}

impl fmt::Display for LinkEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = if self.is_low() { "low" } else { "high" };
        write!(f, "{}:{side}", self.link())
    }
}

/// The kinds of element a graph stores.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Graph vertices.
    Node = 0,
    /// Node-pair containers.
    Link = 1,
    /// Directed or flat relations.
    Edge = 2,
    /// Relation instances.
    Transaction = 3,
    /// Attribute columns (attributed graphs only).
    Attribute = 4,
}

impl ElementType {
    /// The four element types owned by the base graph, in hierarchy order.
    pub const GRAPH: [ElementType; 4] = [
        ElementType::Node,
        ElementType::Link,
        ElementType::Edge,
        ElementType::Transaction,
    ];

    /// Returns the dense index of this type.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps a dense index back to its type.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ElementType::Node),
            1 => Some(ElementType::Link),
            2 => Some(ElementType::Edge),
            3 => Some(ElementType::Transaction),
            4 => Some(ElementType::Attribute),
            _ => None,
        }
    }

    /// Lower-case name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            ElementType::Node => "node",
            ElementType::Link => "link",
            ElementType::Edge => "edge",
            ElementType::Transaction => "transaction",
            ElementType::Attribute => "attribute",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction slot of an edge within its link.
///
/// UPHILL runs from the low node to the high node, DOWNHILL from high to low
/// and FLAT is undirected (reported with the low node as source).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Low node to high node.
    Uphill = 0,
    /// High node to low node.
    Downhill = 1,
    /// Undirected.
    Flat = 2,
}

impl Direction {
    /// All three slots in slot order.
    pub const ALL: [Direction; 3] = [Direction::Uphill, Direction::Downhill, Direction::Flat];

    /// Slot index within the link.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps a slot index back to its direction.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Direction::Uphill),
            1 => Some(Direction::Downhill),
            2 => Some(Direction::Flat),
            _ => None,
        }
    }

    /// The category bit this slot sets when seen from the low-node end.
    #[inline]
    pub const fn category_bit(self) -> u8 {
        1 << (self as u8)
    }

    /// The direction as seen from the other end of the link.
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Uphill => Direction::Downhill,
            Direction::Downhill => Direction::Uphill,
            Direction::Flat => Direction::Flat,
        }
    }
}

/// 3-bit mask describing which edge directions a link carries, from the point
/// of view of one of its ends.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct LinkCategory(u8);

impl LinkCategory {
    /// No edges.
    pub const NONE: LinkCategory = LinkCategory(0);
    /// An edge leaves this end.
    pub const OUTGOING: LinkCategory = LinkCategory(1);
    /// An edge arrives at this end.
    pub const INCOMING: LinkCategory = LinkCategory(2);
    /// A flat edge is present.
    pub const UNDIRECTED: LinkCategory = LinkCategory(4);
    /// Number of distinct masks; the width of a node's adjacency buckets.
    pub const COUNT: u32 = 8;

    /// The mask seen from the other end: OUTGOING and INCOMING swap.
    const SWAPS: [u8; 8] = [0, 2, 1, 3, 4, 6, 5, 7];

    /// Builds a category from raw bits; anything above bit 2 is dropped.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        LinkCategory(bits & 0b111)
    }

    /// Raw mask bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns this mask as seen from the opposite end of the link.
    #[inline]
    pub const fn swapped(self) -> Self {
        LinkCategory(Self::SWAPS[self.0 as usize])
    }

    /// True when every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: LinkCategory) -> bool {
        self.0 & other.0 == other.0
    }

    /// Iterates all eight masks.
    pub fn all() -> impl Iterator<Item = LinkCategory> {
        (0..Self::COUNT as u8).map(LinkCategory)
    }
}

impl std::ops::BitOr for LinkCategory {
    type Output = LinkCategory;

    fn bitor(self, rhs: Self) -> Self::Output {
        LinkCategory(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_end_addressing() {
        let link = LinkId(7);
        assert_eq!(LinkEnd::low(link).0, 14);
        assert_eq!(LinkEnd::high(link).0, 15);
        assert_eq!(LinkEnd::high(link).link(), link);
        assert!(LinkEnd::low(link).is_low());
        assert!(LinkEnd::high(link).is_high());
        assert_eq!(LinkEnd::low(link).opposite(), LinkEnd::high(link));
    }

    #[test]
    fn category_swap_exchanges_outgoing_and_incoming() {
        assert_eq!(LinkCategory::OUTGOING.swapped(), LinkCategory::INCOMING);
        assert_eq!(LinkCategory::INCOMING.swapped(), LinkCategory::OUTGOING);
        assert_eq!(LinkCategory::UNDIRECTED.swapped(), LinkCategory::UNDIRECTED);
        let both = LinkCategory::OUTGOING | LinkCategory::INCOMING;
        assert_eq!(both.swapped(), both);
        for category in LinkCategory::all() {
            assert_eq!(category.swapped().swapped(), category);
        }
    }

    #[test]
    fn direction_bits_line_up_with_categories() {
        assert_eq!(Direction::Uphill.category_bit(), LinkCategory::OUTGOING.bits());
        assert_eq!(Direction::Downhill.category_bit(), LinkCategory::INCOMING.bits());
        assert_eq!(Direction::Flat.category_bit(), LinkCategory::UNDIRECTED.bits());
        assert_eq!(Direction::from_index(1), Some(Direction::Downhill));
        assert_eq!(Direction::from_index(3), None);
    }
}
