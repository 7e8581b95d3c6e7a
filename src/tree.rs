//! An ordered set implemented with a parent-linked AVL tree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

mod balance;
mod walk;

use walk::Visit;

/// An ordered set of unique values implemented with an AVL tree.
///
/// Every node links back to its parent so that heights and balance can be
/// restored by walking upward from an edited position.
///
/// ```
/// use avl_set::AvlTree;
/// let mut tree = AvlTree::from(['a', 'b', 'c', 'd']);
/// assert!(tree.remove(&'d'));
/// assert!(!tree.contains(&'d'));
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.to_string(), "a b c");
/// ```
pub struct AvlTree<T> {
    root: Link<T>,
    num_nodes: usize,
    marker: PhantomData<Box<Node<T>>>,
}

struct Node<T> {
    value: T,
    // Owning links
    left: Link<T>,
    right: Link<T>,
    // Non-owning back link, never freed through
    parent: Link<T>,
    height: usize,
}

type NodePtr<T> = NonNull<Node<T>>;
type Link<T> = Option<NodePtr<T>>;

// Nodes are reachable only through the tree that owns them.
unsafe impl<T: Send> Send for AvlTree<T> {}
unsafe impl<T: Sync> Sync for AvlTree<T> {}

impl<T> AvlTree<T> {
    /// Creates an empty tree.
    /// No memory is allocated until the first value is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
            marker: PhantomData,
        }
    }

    /// Returns true if the tree contains no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of values in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    /// An empty tree has height 0, a single value has height 1.
    pub fn height(&self) -> usize {
        Self::link_height(self.root)
    }

    /// Clears the tree, deallocating all nodes.
    pub fn clear(&mut self) {
        self.walk(|visit, node_ptr| {
            if let Visit::Post = visit {
                // Children are always visited before their parent.
                drop(unsafe { Node::destroy(node_ptr) });
            }
        });
        self.root = None;
        self.num_nodes = 0;
    }

    /// Exchanges the contents of two trees without touching any node.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.root, &mut other.root);
        mem::swap(&mut self.num_nodes, &mut other.num_nodes);
    }

    /// Returns the smallest value in the tree.
    pub fn first(&self) -> Option<&T> {
        let mut node_ptr = self.root?;
        while let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
            node_ptr = left_ptr;
        }
        Some(&unsafe { &*node_ptr.as_ptr() }.value)
    }

    /// Returns the largest value in the tree.
    pub fn last(&self) -> Option<&T> {
        let mut node_ptr = self.root?;
        while let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
            node_ptr = right_ptr;
        }
        Some(&unsafe { &*node_ptr.as_ptr() }.value)
    }

    /// Points the parent's link (or the root) that refers to `old` at `new`.
    fn replace_child(&mut self, parent: Link<T>, old: NodePtr<T>, new: Link<T>) {
        match parent {
            None => self.root = new,
            Some(mut parent_ptr) => unsafe {
                if parent_ptr.as_ref().left == Some(old) {
                    parent_ptr.as_mut().left = new;
                } else {
                    debug_assert!(parent_ptr.as_ref().right == Some(old));
                    parent_ptr.as_mut().right = new;
                }
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn preorder_shape(&self) -> Vec<(&T, usize, isize)> {
        let mut shape = Vec::with_capacity(self.num_nodes);
        self.walk(|visit, node_ptr| {
            if let Visit::Pre = visit {
                let node = unsafe { &*node_ptr.as_ptr() };
                shape.push((&node.value, node.height, Self::balance_factor(node_ptr)));
            }
        });
        shape
    }
}

impl<T: Ord> AvlTree<T> {
    /// Creates a tree holding a single value.
    pub fn from_value(value: T) -> Self {
        let mut tree = Self::new();
        tree.insert(value);
        tree
    }

    /// Returns a reference to the value in the tree that is equal to the given value.
    ///
    /// The value may be any borrowed form of the tree's value type, but the ordering
    /// on the borrowed form *must* match the ordering on the value type.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node_ptr = self.find(value)?;
        Some(&unsafe { &*node_ptr.as_ptr() }.value)
    }

    /// Returns true if the tree contains a value equal to the given value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(value).is_some()
    }

    /// Inserts a value into the tree.
    /// Returns false, leaving the tree untouched, if an equal value was already present.
    pub fn insert(&mut self, value: T) -> bool {
        let mut parent: Link<T> = None;
        let mut current = self.root;
        let mut ordering = Ordering::Equal;
        while let Some(node_ptr) = current {
            ordering = value.cmp(&unsafe { node_ptr.as_ref() }.value);
            parent = current;
            current = match ordering {
                Ordering::Equal => return false,
                Ordering::Less => unsafe { node_ptr.as_ref().left },
                Ordering::Greater => unsafe { node_ptr.as_ref().right },
            };
        }

        let node_ptr = Node::create(parent, value);
        match parent {
            None => self.root = Some(node_ptr),
            Some(mut parent_ptr) => unsafe {
                if ordering == Ordering::Less {
                    parent_ptr.as_mut().left = Some(node_ptr);
                } else {
                    parent_ptr.as_mut().right = Some(node_ptr);
                }
            },
        }
        self.num_nodes += 1;
        self.rebalance(parent);
        true
    }

    /// Removes a value from the tree.
    /// Returns whether the value was previously in the tree.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes a value from the tree and returns it, if present.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node_ptr = self.find(value)?;
        debug_assert!(self.num_nodes >= 1);
        let unlinked_ptr = self.unlink_node(node_ptr);
        self.num_nodes -= 1;
        Some(unsafe { Node::destroy(unlinked_ptr) })
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        unsafe {
            // Check root link
            if let Some(root_ptr) = self.root {
                assert!(root_ptr.as_ref().parent.is_none());
            }

            // Check tree nodes
            let mut num_nodes = 0;
            self.walk(|visit, node_ptr| {
                if let Visit::Pre = visit {
                    let node = node_ptr.as_ref();
                    let mut left_height = 0;
                    let mut right_height = 0;

                    if let Some(left_ptr) = node.left {
                        assert!(left_ptr.as_ref().parent == Some(node_ptr));
                        assert!(left_ptr.as_ref().value < node.value);
                        left_height = left_ptr.as_ref().height;
                    }

                    if let Some(right_ptr) = node.right {
                        assert!(right_ptr.as_ref().parent == Some(node_ptr));
                        assert!(right_ptr.as_ref().value > node.value);
                        right_height = right_ptr.as_ref().height;
                    }

                    assert_eq!(node.height, 1 + left_height.max(right_height));

                    // AVL condition
                    assert!(left_height <= right_height + 1);
                    assert!(right_height <= left_height + 1);

                    num_nodes += 1;
                }
            });
            assert_eq!(num_nodes, self.num_nodes);
        }

        // Local ordering is not enough, whole sequence must ascend
        let mut previous: Option<&T> = None;
        self.traverse_in_order(|value| {
            if let Some(previous) = previous {
                assert!(previous < value);
            }
            previous = Some(value);
        });
    }

    fn find<Q>(&self, value: &Q) -> Link<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(node_ptr) = current {
            current = unsafe {
                match value.cmp(node_ptr.as_ref().value.borrow()) {
                    Ordering::Equal => break,
                    Ordering::Less => node_ptr.as_ref().left,
                    Ordering::Greater => node_ptr.as_ref().right,
                }
            };
        }
        current
    }

    /// Detaches the node holding the value of `node_ptr` from the tree and
    /// rebalances upward. Returns the detached node, which carries that value.
    ///
    /// A node with two children keeps its place: its value trades places with
    /// the in-order successor and the successor's node is detached instead.
    fn unlink_node(&mut self, mut node_ptr: NodePtr<T>) -> NodePtr<T> {
        unsafe {
            let mut unlinked_ptr = node_ptr;
            if let (Some(_), Some(right_ptr)) = (node_ptr.as_ref().left, node_ptr.as_ref().right) {
                let mut successor_ptr = right_ptr;
                while let Some(left_ptr) = successor_ptr.as_ref().left {
                    successor_ptr = left_ptr;
                }
                tracing::trace!(
                    height = node_ptr.as_ref().height,
                    "removing inner node, moving successor value into its place"
                );
                mem::swap(&mut node_ptr.as_mut().value, &mut successor_ptr.as_mut().value);
                unlinked_ptr = successor_ptr;
            }

            // At most one child left, splice it into the unlinked position
            debug_assert!(unlinked_ptr.as_ref().left.is_none() || unlinked_ptr.as_ref().right.is_none());
            let child = unlinked_ptr.as_ref().left.or(unlinked_ptr.as_ref().right);
            let parent = unlinked_ptr.as_ref().parent;
            if let Some(mut child_ptr) = child {
                child_ptr.as_mut().parent = parent;
            }
            self.replace_child(parent, unlinked_ptr, child);

            // Everything above the unlinked position might be out of balance now
            self.rebalance(parent);
            unlinked_ptr
        }
    }
}

impl<T> Drop for AvlTree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for AvlTree<T> {
    /// Creates an empty tree.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for AvlTree<T> {
    /// Copies every node; the copy shares nothing with `self`.
    fn clone(&self) -> Self {
        let mut tree = Self::new();
        if let Some(root_ptr) = self.root {
            unsafe {
                let copy_ptr = Node::create(None, root_ptr.as_ref().value.clone());
                // Link first so a panicking clone() leaves nothing behind
                tree.root = Some(copy_ptr);
                Node::clone_children(root_ptr, copy_ptr);
            }
        }
        tree.num_nodes = self.num_nodes;
        tree
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlTree<T> {
    /// Inserts the values in array order.
    fn from(values: [T; N]) -> Self {
        Self::from_iter(values)
    }
}

impl<T: Ord> Extend<T> for AvlTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |value| {
            self.insert(value);
        });
    }
}

impl<'a, T> Extend<&'a T> for AvlTree<T>
where
    T: Ord + Copy + 'a,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> Node<T> {
    fn create(parent: Link<T>, value: T) -> NodePtr<T> {
        let boxed = Box::new(Node {
            value,
            left: None,
            right: None,
            parent,
            height: 1,
        });
        NonNull::from(Box::leak(boxed))
    }

    /// Frees the node and hands back its value.
    unsafe fn destroy(node_ptr: NodePtr<T>) -> T {
        Box::from_raw(node_ptr.as_ptr()).value
    }
}

impl<T: Clone> Node<T> {
    /// Copies the subtrees below `src_ptr` underneath `dst_ptr`.
    /// Recursion depth is bounded by the tree height.
    unsafe fn clone_children(src_ptr: NodePtr<T>, mut dst_ptr: NodePtr<T>) {
        dst_ptr.as_mut().height = src_ptr.as_ref().height;
        if let Some(left_ptr) = src_ptr.as_ref().left {
            let copy_ptr = Node::create(Some(dst_ptr), left_ptr.as_ref().value.clone());
            dst_ptr.as_mut().left = Some(copy_ptr);
            Self::clone_children(left_ptr, copy_ptr);
        }
        if let Some(right_ptr) = src_ptr.as_ref().right {
            let copy_ptr = Node::create(Some(dst_ptr), right_ptr.as_ref().value.clone());
            dst_ptr.as_mut().right = Some(copy_ptr);
            Self::clone_children(right_ptr, copy_ptr);
        }
    }
}
