//! Removal.
//!
//! Removing a cell unlinks its leaf half and collapses the parent node
//! half it hung from: the sibling branch is promoted into the parent's
//! position. That leaves the parent cell's node half spare, which matters
//! when the removed cell's own node half is still wired in somewhere above
//! its leaf: the spare half then takes over that role wholesale (branches,
//! split bit, parent link), so the removed cell leaves the tree completely
//! while the shape around it is preserved.

use crate::arena::{Arena, CellId};
use crate::key::Key;
use crate::link::{Link, Up, LEFT, RIGHT};

impl<K: Key, V> Arena<K, V> {
    /// Detach a cell from the tree it is linked into.
    ///
    /// A cell that is not linked anywhere is left alone. The detached
    /// cell's slot stays allocated: it can be rekeyed with
    /// [`Arena::set_key`] and reinserted into any tree of this arena, or
    /// returned with [`Arena::free`].
    pub fn remove(&mut self, id: CellId) {
        let victim = id.0;
        let leaf_up = self.cell(victim).leaf_up;
        if leaf_up.is_none() {
            return;
        }
        if leaf_up.is_root() {
            // Lone leaf hanging directly off the root.
            self.roots[leaf_up.idx() as usize].top = Link::NONE;
            self.clear_links(victim);
            return;
        }

        let parent = leaf_up.idx();
        let pside = leaf_up.side();
        let grand = self.cell(parent).node_up;
        let sibling = self.cell(parent).branches[1 - pside];

        // Promote the sibling into the parent node half's position.
        self.set_parent_link(grand, sibling);
        if sibling.is_leaf() {
            self.cell_mut(sibling.idx()).leaf_up = grand;
        } else {
            self.cell_mut(sibling.idx()).node_up = grand;
            let pbit = self.cell(parent).bit;
            if pbit < 0 {
                // Inside a duplicate group the promoted spine node inherits
                // the vanished level, keeping the group root at bit -1.
                self.cell_mut(sibling.idx()).bit = pbit;
            }
        }

        // The parent cell's node half is now spare. When the parent is the
        // removed cell itself (its two leaves met on its own node half)
        // this also clears our node_up, and there is nothing left to do.
        self.cell_mut(parent).node_up = Up::NONE;

        let node_up = self.cell(victim).node_up;
        if !node_up.is_none() {
            // Our node half is still wired in above: hand its role to the
            // spare half. The parent sits below our node half, so its key
            // is a valid bit source for the split position it takes over.
            let spare = parent;
            let branches = self.cell(victim).branches;
            let bit = self.cell(victim).bit;
            {
                let slot = self.cell_mut(spare);
                slot.branches = branches;
                slot.bit = bit;
                slot.node_up = node_up;
            }
            self.set_parent_link(node_up, Link::node(spare));
            for side in [LEFT, RIGHT] {
                let child = branches[side];
                if child.is_leaf() {
                    self.cell_mut(child.idx()).leaf_up = Up::cell(spare, side);
                } else {
                    self.cell_mut(child.idx()).node_up = Up::cell(spare, side);
                }
            }
        }

        self.clear_links(victim);
    }
}
