//! Insertion.
//!
//! A descent walks the split bits of the search key until it either lands
//! on a leaf, or meets a node whose key disagrees with the search key above
//! that node's split bit (no more common bits), or meets the root of a
//! duplicate group. The new cell's node half is then spliced in at the stop
//! position: its two branches are the displaced half and its own leaf,
//! ordered by key, and its split bit is the highest bit on which the two
//! keys differ. No rebalancing ever happens; the split bits alone dictate
//! the shape.

use crate::arena::{Arena, CellId, Root};
use crate::key::{Bits, Key};
use crate::link::{Link, Up, LEFT, RIGHT};

impl<K: Key, V> Arena<K, V> {
    /// Insert a detached cell into a tree, keyed by the cell's stamped key.
    ///
    /// Returns the cell now standing for that key: `id` itself, or the
    /// incumbent cell when the tree was created with
    /// [`Arena::new_unique_root`] and the key is already present (the tree
    /// is left untouched in that case; compare ids to detect it).
    ///
    /// Duplicate keys in a non-unique tree are kept in insertion order.
    pub fn insert(&mut self, root: Root, id: CellId) -> CellId {
        let new = id.0;
        let newbits = self.bits(new);
        debug_assert!(!self.is_linked(id), "inserting a linked cell");

        let mut troot = self.roots[root.0 as usize].top;
        if troot.is_none() {
            // First cell of this tree: it hangs off the root as a lone
            // leaf and its node half stays unused.
            self.roots[root.0 as usize].top = Link::leaf(new);
            let slot = self.cell_mut(new);
            slot.leaf_up = Up::root(root.0);
            slot.node_up = Up::NONE;
            return id;
        }

        // Descend. `troot` is the link we are about to follow and
        // `parent_pos` the slot holding it, so the splice below can rewire
        // the parent without walking back up.
        let mut parent_pos = Up::root(root.0);
        let (old, at_leaf) = loop {
            if troot.is_leaf() {
                break (troot.idx(), true);
            }
            let oi = troot.idx();
            let obit = self.cell(oi).bit;
            if obit < 0 || self.bits(oi).xor(newbits).diverges_above(obit as u32) {
                // Duplicate-group root, or no more common bits: the new
                // cell must be spliced above this node half.
                break (oi, false);
            }
            let side = newbits.branch(obit as u32);
            parent_pos = Up::cell(oi, side);
            troot = self.cell(oi).branches[side];
        };

        let oldbits = self.bits(old);
        let diff = newbits.xor(oldbits);

        if diff.is_zero() {
            if self.roots[root.0 as usize].unique {
                return CellId(old);
            }
            if !at_leaf {
                // A duplicate group already exists below this stop.
                return self.append_dup(old, new);
            }
            // First duplicate of this key: fall through and build the
            // two-leaf group, rooted at split bit -1.
        }

        let bit = if diff.is_zero() {
            -1
        } else {
            diff.highest_bit() as i32
        };

        // Splice: the displaced half keeps its key-order side below the new
        // node half; an equal or greater key hangs the new leaf on the
        // right, which is what keeps duplicates in insertion order.
        let displaced = troot;
        let new_on_right = newbits >= oldbits;
        {
            let slot = self.cell_mut(new);
            slot.bit = bit;
            slot.node_up = parent_pos;
            if new_on_right {
                slot.branches = [displaced, Link::leaf(new)];
                slot.leaf_up = Up::cell(new, RIGHT);
            } else {
                slot.branches = [Link::leaf(new), displaced];
                slot.leaf_up = Up::cell(new, LEFT);
            }
        }
        let displaced_up = if new_on_right {
            Up::cell(new, LEFT)
        } else {
            Up::cell(new, RIGHT)
        };
        if at_leaf {
            self.cell_mut(old).leaf_up = displaced_up;
        } else {
            self.cell_mut(old).node_up = displaced_up;
        }
        self.set_parent_link(parent_pos, Link::node(new));
        id
    }

    /// Append `new` to the duplicate group rooted at `sub`'s node half.
    ///
    /// The group is a spine: each node's left branch leads to older cells,
    /// the right branch to newer ones, and split bits decrease from -1 at
    /// the root. Walking the right spine finds the in-order last leaf; the
    /// new cell displaces it there and re-hangs it as its own left child.
    fn append_dup(&mut self, sub: u32, new: u32) -> CellId {
        let mut head = sub;
        let mut last = self.cell(head).branches[RIGHT];
        while !last.is_leaf() {
            head = last.idx();
            last = self.cell(head).branches[RIGHT];
        }

        let tail = last.idx();
        debug_assert_eq!(self.cell(tail).leaf_up, Up::cell(head, RIGHT));

        let bit = self.cell(head).bit - 1;
        let slot = self.cell_mut(new);
        slot.bit = bit;
        slot.node_up = Up::cell(head, RIGHT);
        slot.branches = [last, Link::leaf(new)];
        slot.leaf_up = Up::cell(new, RIGHT);

        self.cell_mut(tail).leaf_up = Up::cell(new, LEFT);
        self.cell_mut(head).branches[RIGHT] = Link::node(new);
        CellId(new)
    }
}
