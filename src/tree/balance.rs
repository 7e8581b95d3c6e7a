//! Heights, rotations and the upward rebalancing walk.

use std::cmp;

use super::{AvlTree, Link, NodePtr};

impl<T> AvlTree<T> {
    /// Height of a subtree; absent subtrees count as 0.
    pub(super) fn link_height(link: Link<T>) -> usize {
        match link {
            None => 0,
            Some(node_ptr) => unsafe { node_ptr.as_ref().height },
        }
    }

    /// Left subtree height minus right subtree height.
    pub(super) fn balance_factor(node_ptr: NodePtr<T>) -> isize {
        let node = unsafe { node_ptr.as_ref() };
        Self::link_height(node.left) as isize - Self::link_height(node.right) as isize
    }

    fn adjust_height(mut node_ptr: NodePtr<T>) {
        let node = unsafe { node_ptr.as_mut() };
        node.height = 1 + cmp::max(Self::link_height(node.left), Self::link_height(node.right));
    }

    //   N            R
    //  / \          / \
    // a   R   ->   N   c
    //    / \      / \
    //   b   c    a   b
    fn rotate_left(&mut self, mut node_ptr: NodePtr<T>) -> NodePtr<T> {
        unsafe {
            let Some(mut right_ptr) = node_ptr.as_ref().right else {
                return node_ptr;
            };
            let parent = node_ptr.as_ref().parent;

            let inner = right_ptr.as_ref().left;
            node_ptr.as_mut().right = inner;
            if let Some(mut inner_ptr) = inner {
                inner_ptr.as_mut().parent = Some(node_ptr);
            }

            self.replace_child(parent, node_ptr, Some(right_ptr));
            right_ptr.as_mut().parent = parent;

            right_ptr.as_mut().left = Some(node_ptr);
            node_ptr.as_mut().parent = Some(right_ptr);

            Self::adjust_height(node_ptr);
            Self::adjust_height(right_ptr);
            tracing::trace!(height = right_ptr.as_ref().height, "rotated left");
            right_ptr
        }
    }

    //     N        L
    //    / \      / \
    //   L   c -> a   N
    //  / \          / \
    // a   b        b   c
    fn rotate_right(&mut self, mut node_ptr: NodePtr<T>) -> NodePtr<T> {
        unsafe {
            let Some(mut left_ptr) = node_ptr.as_ref().left else {
                return node_ptr;
            };
            let parent = node_ptr.as_ref().parent;

            let inner = left_ptr.as_ref().right;
            node_ptr.as_mut().left = inner;
            if let Some(mut inner_ptr) = inner {
                inner_ptr.as_mut().parent = Some(node_ptr);
            }

            self.replace_child(parent, node_ptr, Some(left_ptr));
            left_ptr.as_mut().parent = parent;

            left_ptr.as_mut().right = Some(node_ptr);
            node_ptr.as_mut().parent = Some(left_ptr);

            Self::adjust_height(node_ptr);
            Self::adjust_height(left_ptr);
            tracing::trace!(height = left_ptr.as_ref().height, "rotated right");
            left_ptr
        }
    }

    /// Restores the AVL condition at the given node and adjusts its height.
    /// Balance must not exceed +2 or -2, which always holds after a single update.
    /// Returns the root of the subtree that now takes the node's place.
    fn rebalance_node(&mut self, node_ptr: NodePtr<T>) -> NodePtr<T> {
        let balance = Self::balance_factor(node_ptr);
        debug_assert!((-2..=2).contains(&balance));
        let node = unsafe { node_ptr.as_ref() };
        if balance > 1 {
            // Left heavy, left child leaning right needs a double rotation
            if let Some(left_ptr) = node.left {
                if Self::balance_factor(left_ptr) < 0 {
                    tracing::trace!(balance, "left-right case");
                    self.rotate_left(left_ptr);
                }
            }
            self.rotate_right(node_ptr)
        } else if balance < -1 {
            // Right heavy, right child leaning left needs a double rotation
            if let Some(right_ptr) = node.right {
                if Self::balance_factor(right_ptr) > 0 {
                    tracing::trace!(balance, "right-left case");
                    self.rotate_right(right_ptr);
                }
            }
            self.rotate_left(node_ptr)
        } else {
            Self::adjust_height(node_ptr);
            node_ptr
        }
    }

    /// Rebalances nodes starting from the given position up to the root node.
    /// Stops early once a subtree ends up with the height it had before the edit,
    /// since nothing above it can have changed.
    pub(super) fn rebalance(&mut self, start_from: Link<T>) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let old_height = unsafe { node_ptr.as_ref().height };
            let subtree_ptr = self.rebalance_node(node_ptr);
            let subtree = unsafe { subtree_ptr.as_ref() };
            if subtree.height == old_height {
                break;
            }
            current = subtree.parent;
        }
    }
}
