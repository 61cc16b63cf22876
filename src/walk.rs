//! Ordered traversal.
//!
//! `first`/`last` ride the extreme branches down to a leaf. `next`/`prev`
//! use the parent back-links: climb while the current position is on the
//! far side, step across, then ride the near branches down. The duplicate
//! aware variants differ only in where they stop climbing: `next_dup`
//! stays below the duplicate-group boundary (split bit still negative),
//! `next_unique` climbs over it so a whole group reads as one key.

use crate::arena::{Arena, CellId, Root};
use crate::key::Key;
use crate::link::{Link, Up, LEFT, RIGHT};

impl<K: Key, V> Arena<K, V> {
    /// Ride `side` branches from `link` down to a leaf.
    pub(crate) fn walk_down(&self, mut link: Link, side: usize) -> u32 {
        while !link.is_leaf() {
            link = self.cell(link.idx()).branches[side];
        }
        link.idx()
    }

    /// The cell with the smallest key, or `None` on an empty tree.
    pub fn first(&self, root: Root) -> Option<CellId> {
        let top = self.roots[root.0 as usize].top;
        if top.is_none() {
            return None;
        }
        Some(CellId(self.walk_down(top, LEFT)))
    }

    /// The cell with the largest key, or `None` on an empty tree.
    pub fn last(&self, root: Root) -> Option<CellId> {
        let top = self.roots[root.0 as usize].top;
        if top.is_none() {
            return None;
        }
        Some(CellId(self.walk_down(top, RIGHT)))
    }

    /// In-order successor of the position `pos`.
    pub(crate) fn next_from(&self, mut pos: Up) -> Option<CellId> {
        loop {
            if pos.is_root() {
                return None;
            }
            if pos.side() == LEFT {
                let across = self.cell(pos.idx()).branches[RIGHT];
                return Some(CellId(self.walk_down(across, LEFT)));
            }
            pos = self.cell(pos.idx()).node_up;
        }
    }

    /// In-order predecessor of the position `pos`.
    pub(crate) fn prev_from(&self, mut pos: Up) -> Option<CellId> {
        loop {
            if pos.is_root() {
                return None;
            }
            if pos.side() == RIGHT {
                let across = self.cell(pos.idx()).branches[LEFT];
                return Some(CellId(self.walk_down(across, RIGHT)));
            }
            pos = self.cell(pos.idx()).node_up;
        }
    }

    /// The next cell in key order (equal keys in insertion order), or
    /// `None` past the last one.
    pub fn next(&self, id: CellId) -> Option<CellId> {
        let pos = self.cell(id.0).leaf_up;
        if pos.is_none() {
            return None;
        }
        self.next_from(pos)
    }

    /// The previous cell in key order, or `None` before the first one.
    pub fn prev(&self, id: CellId) -> Option<CellId> {
        let pos = self.cell(id.0).leaf_up;
        if pos.is_none() {
            return None;
        }
        self.prev_from(pos)
    }

    /// The next cell holding the same key, or `None` at the end of the
    /// duplicate group.
    pub fn next_dup(&self, id: CellId) -> Option<CellId> {
        let mut pos = self.cell(id.0).leaf_up;
        if pos.is_none() {
            return None;
        }
        loop {
            if pos.is_root() {
                return None;
            }
            let parent = pos.idx();
            if self.cell(parent).bit >= 0 {
                // Crossed out of the duplicate group (or never was in one).
                return None;
            }
            if pos.side() == LEFT {
                let across = self.cell(parent).branches[RIGHT];
                return Some(CellId(self.walk_down(across, LEFT)));
            }
            pos = self.cell(parent).node_up;
        }
    }

    /// The previous cell holding the same key, or `None` at the start of
    /// the duplicate group.
    pub fn prev_dup(&self, id: CellId) -> Option<CellId> {
        let mut pos = self.cell(id.0).leaf_up;
        if pos.is_none() {
            return None;
        }
        loop {
            if pos.is_root() {
                return None;
            }
            let parent = pos.idx();
            if self.cell(parent).bit >= 0 {
                return None;
            }
            if pos.side() == RIGHT {
                let across = self.cell(parent).branches[LEFT];
                return Some(CellId(self.walk_down(across, RIGHT)));
            }
            pos = self.cell(parent).node_up;
        }
    }

    /// The first cell of the next strictly-greater key, skipping the rest
    /// of the current duplicate group.
    pub fn next_unique(&self, id: CellId) -> Option<CellId> {
        let mut pos = self.cell(id.0).leaf_up;
        if pos.is_none() {
            return None;
        }
        loop {
            if pos.is_root() {
                return None;
            }
            let parent = pos.idx();
            if pos.side() == LEFT && self.cell(parent).bit >= 0 {
                let across = self.cell(parent).branches[RIGHT];
                return Some(CellId(self.walk_down(across, LEFT)));
            }
            pos = self.cell(parent).node_up;
        }
    }

    /// The last cell of the previous strictly-smaller key, skipping the
    /// rest of the current duplicate group.
    pub fn prev_unique(&self, id: CellId) -> Option<CellId> {
        let mut pos = self.cell(id.0).leaf_up;
        if pos.is_none() {
            return None;
        }
        loop {
            if pos.is_root() {
                return None;
            }
            let parent = pos.idx();
            if pos.side() == RIGHT && self.cell(parent).bit >= 0 {
                let across = self.cell(parent).branches[LEFT];
                return Some(CellId(self.walk_down(across, RIGHT)));
            }
            pos = self.cell(parent).node_up;
        }
    }

    /// Iterate one tree in key order (equal keys in insertion order).
    pub fn iter(&self, root: Root) -> Iter<'_, K, V> {
        Iter {
            arena: self,
            next: self.first(root),
        }
    }
}

/// In-order iterator over the cells of one tree.
///
/// Yields [`CellId`]s; use [`Arena::key`]/[`Arena::value`] on them. The
/// iterator borrows the arena, so the tree cannot change underneath it.
pub struct Iter<'a, K: Key, V> {
    arena: &'a Arena<K, V>,
    next: Option<CellId>,
}

impl<K: Key, V> Iterator for Iter<'_, K, V> {
    type Item = CellId;

    fn next(&mut self) -> Option<CellId> {
        let cur = self.next?;
        self.next = self.arena.next(cur);
        Some(cur)
    }
}

/// Keys of one tree in traversal order. Test helper.
#[cfg(test)]
pub(crate) fn collect_keys<K: Key, V>(arena: &Arena<K, V>, root: Root) -> Vec<K> {
    arena.iter(root).map(|id| arena.key(id)).collect()
}
