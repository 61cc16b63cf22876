//! Keyed lookups: exact, least-upper-bound, greatest-lower-bound.
//!
//! All three share the insert-style descent. Exact lookup can bail out as
//! soon as the search key disagrees with a node above its split bit. The
//! bound lookups cannot: on divergence the answer is either an extreme
//! leaf of the subtree they stopped at (when the whole subtree sits on the
//! right side of the bound) or the in-order neighbour of that subtree,
//! reached by climbing the parent back-links like `next`/`prev` do.

use crate::arena::{Arena, CellId, Root};
use crate::key::{Bits, Key};
use crate::link::{LEFT, RIGHT};

impl<K: Key, V> Arena<K, V> {
    /// Find a cell holding exactly `key`; the first-inserted duplicate if
    /// the key occurs more than once. `None` when the key is absent.
    pub fn lookup(&self, root: Root, key: K) -> Option<CellId> {
        let x = key.to_bits();
        let mut troot = self.roots[root.0 as usize].top;
        if troot.is_none() {
            return None;
        }
        loop {
            if troot.is_leaf() {
                let leaf = troot.idx();
                if self.bits(leaf) == x {
                    return Some(CellId(leaf));
                }
                return None;
            }
            let node = troot.idx();
            let bit = self.cell(node).bit;
            let diff = self.bits(node).xor(x);
            if diff.is_zero() {
                if bit < 0 {
                    // Top of the key's duplicate group: its first entry is
                    // the leftmost leaf.
                    let left = self.cell(node).branches[LEFT];
                    return Some(CellId(self.walk_down(left, LEFT)));
                }
                // This cell's own leaf is the first entry for the key: any
                // duplicates were spliced in at its original leaf position,
                // leaving it leftmost in the group.
                return Some(CellId(node));
            }
            if bit < 0 || diff.diverges_above(bit as u32) {
                return None;
            }
            troot = self.cell(node).branches[x.branch(bit as u32)];
        }
    }

    /// Find the cell with the smallest key `>= key` (ties: the first
    /// duplicate), or `None` when every key is smaller.
    pub fn lookup_ge(&self, root: Root, key: K) -> Option<CellId> {
        let x = key.to_bits();
        let mut troot = self.roots[root.0 as usize].top;
        if troot.is_none() {
            return None;
        }
        let climb = loop {
            if troot.is_leaf() {
                let leaf = troot.idx();
                if self.bits(leaf) >= x {
                    return Some(CellId(leaf));
                }
                break self.cell(leaf).leaf_up;
            }
            let node = troot.idx();
            let bit = self.cell(node).bit;
            if bit < 0 {
                // Duplicate group: all its keys are equal, so either the
                // whole group qualifies (take its first entry) or none of
                // it does (take the next leaf in order).
                if self.bits(node) >= x {
                    let left = self.cell(node).branches[LEFT];
                    return Some(CellId(self.walk_down(left, LEFT)));
                }
                break self.cell(node).node_up;
            }
            let diff = self.bits(node).xor(x);
            if diff.diverges_above(bit as u32) {
                // The subtree shares no more bits with the search key: it
                // sits entirely above or entirely below it.
                if self.bits(node) > x {
                    let left = self.cell(node).branches[LEFT];
                    return Some(CellId(self.walk_down(left, LEFT)));
                }
                break self.cell(node).node_up;
            }
            troot = self.cell(node).branches[x.branch(bit as u32)];
        };
        self.next_from(climb)
    }

    /// Find the cell with the largest key `<= key` (ties: the last
    /// duplicate), or `None` when every key is larger.
    pub fn lookup_le(&self, root: Root, key: K) -> Option<CellId> {
        let x = key.to_bits();
        let mut troot = self.roots[root.0 as usize].top;
        if troot.is_none() {
            return None;
        }
        let climb = loop {
            if troot.is_leaf() {
                let leaf = troot.idx();
                if self.bits(leaf) <= x {
                    return Some(CellId(leaf));
                }
                break self.cell(leaf).leaf_up;
            }
            let node = troot.idx();
            let bit = self.cell(node).bit;
            if bit < 0 {
                if self.bits(node) <= x {
                    let right = self.cell(node).branches[RIGHT];
                    return Some(CellId(self.walk_down(right, RIGHT)));
                }
                break self.cell(node).node_up;
            }
            let diff = self.bits(node).xor(x);
            if diff.diverges_above(bit as u32) {
                if self.bits(node) < x {
                    let right = self.cell(node).branches[RIGHT];
                    return Some(CellId(self.walk_down(right, RIGHT)));
                }
                break self.cell(node).node_up;
            }
            troot = self.cell(node).branches[x.branch(bit as u32)];
        };
        self.prev_from(climb)
    }
}
