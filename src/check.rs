//! Whole-tree integrity validation.
//!
//! Test support: walks one tree and verifies the structural rules the
//! operations rely on, returning the leaf count on success so callers can
//! also account for completeness. Used by the module tests and the
//! model-based suite after mutations; not meant for hot paths.

use crate::arena::{Arena, CellId, Root};
use crate::key::{Bits, Key};
use crate::link::{Link, Up, LEFT, RIGHT};

/// Rules verified by [`Arena::check_tree`]:
///
/// 1. every node's split bit strictly decreases downward;
/// 2. below a node with split bit `b >= 0`, every leaf key agrees with the
///    node's key above `b` and carries `b = 0` on the left, `1` on the
///    right (the radix rule);
/// 3. a duplicate group is rooted at split bit exactly -1 and all leaf
///    keys inside it are equal; no nonnegative split bit appears inside;
/// 4. every linked half's back-link addresses the slot that points at it;
/// 5. traversal from `first` visits exactly the counted leaves, keys
///    non-decreasing.
impl<K: Key, V> Arena<K, V> {
    /// Validate one tree, returning its leaf count.
    pub fn check_tree(&self, root: Root) -> Result<usize, String> {
        let top = self.roots[root.0 as usize].top;
        if top.is_none() {
            return Ok(0);
        }
        let mut path = Vec::new();
        let count = self.check_branch(top, Up::root(root.0), i32::MAX, None, &mut path)?;

        // Re-walk via first/next: same population, non-decreasing keys.
        let mut walked = 0;
        let mut prev: Option<K::Bits> = None;
        let mut cur = self.first(root);
        while let Some(id) = cur {
            walked += 1;
            if walked > count {
                return Err("traversal visits more leaves than the tree holds".into());
            }
            let bits = self.bits(id.0);
            if let Some(p) = prev {
                if p > bits {
                    return Err(format!("traversal went backwards at {id:?}"));
                }
            }
            prev = Some(bits);
            cur = self.next(id);
        }
        if walked != count {
            return Err(format!("traversal saw {walked} of {count} leaves"));
        }
        Ok(count)
    }

    /// Check the sub-tree behind `link`, expected to hang at `expect_up`.
    ///
    /// `max_bit` is the parent's split bit; `dup` carries the group key
    /// once a negative split bit has been crossed. `path` accumulates
    /// `(node bits, split bit, side)` for the radix rule at the leaves.
    fn check_branch(
        &self,
        link: Link,
        expect_up: Up,
        max_bit: i32,
        dup: Option<K::Bits>,
        path: &mut Vec<(K::Bits, u32, usize)>,
    ) -> Result<usize, String> {
        if link.is_none() {
            return Err("dangling branch inside the tree".into());
        }
        let idx = link.idx();
        let slot = self.cell(idx);

        if link.is_leaf() {
            if slot.leaf_up != expect_up {
                return Err(format!("leaf {idx}: back-link does not match its position"));
            }
            let bits = self.bits(idx);
            if let Some(key) = dup {
                if bits != key {
                    return Err(format!("leaf {idx}: key differs inside a duplicate group"));
                }
            }
            for &(nbits, bit, side) in path.iter() {
                if bits.xor(nbits).diverges_above(bit) {
                    return Err(format!("leaf {idx}: disagrees above an ancestor split bit"));
                }
                if bits.branch(bit) != side {
                    return Err(format!("leaf {idx}: on the wrong side of ancestor bit {bit}"));
                }
            }
            return Ok(1);
        }

        if slot.node_up != expect_up {
            return Err(format!("node {idx}: back-link does not match its position"));
        }
        let bit = slot.bit;
        if bit >= max_bit {
            return Err(format!("node {idx}: split bit {bit} not below parent {max_bit}"));
        }
        if dup.is_some() && bit >= 0 {
            return Err(format!("node {idx}: split node inside a duplicate group"));
        }
        if dup.is_none() && bit < 0 && bit != -1 {
            return Err(format!("node {idx}: duplicate group rooted at {bit}, not -1"));
        }

        let dup = if bit < 0 {
            Some(dup.unwrap_or_else(|| self.bits(idx)))
        } else {
            None
        };

        let mut leaves = 0;
        for side in [LEFT, RIGHT] {
            if bit >= 0 {
                path.push((self.bits(idx), bit as u32, side));
            }
            leaves += self.check_branch(
                slot.branches[side],
                Up::cell(idx, side),
                bit,
                dup,
                path,
            )?;
            if bit >= 0 {
                path.pop();
            }
        }
        Ok(leaves)
    }

    /// Validate the detached state of a cell: both halves unlinked.
    ///
    /// Companion to [`Arena::check_tree`] for asserting that a removed
    /// cell really left the tree behind.
    pub fn check_detached(&self, id: CellId) -> Result<(), String> {
        let slot = self.cell(id.0);
        if !slot.leaf_up.is_none() || !slot.node_up.is_none() {
            return Err(format!("{id:?}: detached cell still carries back-links"));
        }
        Ok(())
    }
}
