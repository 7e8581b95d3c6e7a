//! Depth-first traversal over parent links, and everything built on it.

use std::fmt;

use super::{AvlTree, NodePtr};

/// The point at which a node is handed to a walk callback.
pub(super) enum Visit {
    /// Before its left subtree.
    Pre,
    /// Between its subtrees.
    In,
    /// After its right subtree.
    Post,
}

// Where the walk arrived at the current node from.
enum Came {
    Down,
    FromLeft,
    FromRight,
}

impl<T> AvlTree<T> {
    /// Calls `visit` three times for every node, in pre, in and post order
    /// positions. Uses no stack; a node is never touched again after its
    /// `Post` visit, so the callback may free it there.
    pub(super) fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(Visit, NodePtr<T>),
    {
        let Some(mut node_ptr) = self.root else {
            return;
        };
        let mut came = Came::Down;
        loop {
            match came {
                Came::Down => {
                    visit(Visit::Pre, node_ptr);
                    match unsafe { node_ptr.as_ref().left } {
                        Some(left_ptr) => node_ptr = left_ptr,
                        None => came = Came::FromLeft,
                    }
                }
                Came::FromLeft => {
                    visit(Visit::In, node_ptr);
                    match unsafe { node_ptr.as_ref().right } {
                        Some(right_ptr) => {
                            node_ptr = right_ptr;
                            came = Came::Down;
                        }
                        None => came = Came::FromRight,
                    }
                }
                Came::FromRight => {
                    let parent = unsafe { node_ptr.as_ref().parent };
                    let Some(parent_ptr) = parent else {
                        visit(Visit::Post, node_ptr);
                        break;
                    };
                    came = if unsafe { parent_ptr.as_ref().left } == Some(node_ptr) {
                        Came::FromLeft
                    } else {
                        Came::FromRight
                    };
                    visit(Visit::Post, node_ptr);
                    node_ptr = parent_ptr;
                }
            }
        }
    }

    /// Calls `f` with every value in ascending order.
    pub fn traverse_in_order<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a T),
    {
        self.walk(|visit, node_ptr| {
            if let Visit::In = visit {
                f(&unsafe { &*node_ptr.as_ptr() }.value);
            }
        });
    }

    /// Prints all values in ascending order, separated by spaces, to stdout.
    pub fn print(&self)
    where
        T: fmt::Display,
    {
        println!("{self}");
    }

    fn values(&self) -> Vec<&T> {
        let mut values = Vec::with_capacity(self.len());
        self.traverse_in_order(|value| values.push(value));
        values
    }
}

impl<T: fmt::Display> fmt::Display for AvlTree<T> {
    /// Writes the values in ascending order, separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = Ok(());
        let mut separator = "";
        self.traverse_in_order(|value| {
            if result.is_ok() {
                result = write!(f, "{separator}{value}");
                separator = " ";
            }
        });
        result
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut set = f.debug_set();
        self.traverse_in_order(|value| {
            set.entry(value);
        });
        set.finish()
    }
}

impl<T: PartialEq> PartialEq for AvlTree<T> {
    /// Trees are equal when they hold equal values, whatever their shape.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.values() == other.values()
    }
}

impl<T: Eq> Eq for AvlTree<T> {}
