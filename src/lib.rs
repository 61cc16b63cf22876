//! # ebtree
//!
//! An ordered intrusive radix tree over fixed-width integer keys
//! (`u32`/`i32`/`u64`/`i64`), in the style of the elastic binary trees
//! used by event schedulers and timer wheels.
//!
//! Entries are *cells*: dual-role records that act both as an internal
//! node and as a leaf of the same tree. Cells live in an [`Arena`] and are
//! addressed by copyable [`CellId`] handles; inserting a cell splices its
//! two halves into the link structure in place, so the tree itself never
//! allocates. Because the shape is dictated purely by key bits:
//!
//! - insert, remove and lookup are O(log N) with depth bounded by the key
//!   width, with no rebalancing rotations ever;
//! - in-order stepping (`next`/`prev`) is cheap and allocation-free via
//!   parent back-links;
//! - equal keys are kept in insertion order in a duplicate group, or
//!   refused entirely on a unique tree.
//!
//! Several trees can share one arena, so a cell removed from one tree can
//! be rekeyed and reinserted into another.
//!
//! ## Example
//!
//! ```rust
//! use ebtree::Arena;
//!
//! let mut arena: Arena<u32, &str> = Arena::new();
//! let tree = arena.new_root();
//!
//! let ten = arena.alloc(10, "ten");
//! let three = arena.alloc(3, "three");
//! arena.insert(tree, ten);
//! arena.insert(tree, three);
//!
//! let first = arena.first(tree).unwrap();
//! assert_eq!(arena.key(first), 3);
//! assert_eq!(*arena.value(first), "three");
//!
//! let ge = arena.lookup_ge(tree, 4).unwrap();
//! assert_eq!(arena.key(ge), 10);
//!
//! arena.remove(three);
//! assert_eq!(arena.lookup(tree, 3), None);
//! ```
//!
//! The structure is single-threaded by design: operations never block and
//! never suspend, and callers wanting shared access wrap the arena in
//! their own lock.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod arena;
mod check;
mod insert;
mod key;
mod link;
mod lookup;
mod remove;
mod walk;

pub use arena::{Arena, CellId, Root};
pub use key::{Bits, Key};
pub use walk::Iter;


#[cfg(test)]
mod proptests;
