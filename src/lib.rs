//! An ordered set implemented with an AVL tree.
//!
//! ```
//! use avl_set::AvlTree;
//! let mut tree = AvlTree::new();
//! for value in 1..=7 {
//!     tree.insert(value);
//! }
//! assert_eq!(tree.height(), 3);
//! assert!(tree.contains(&4));
//! tree.remove(&4);
//! assert_eq!(tree.to_string(), "1 2 3 5 6 7");
//! ```

mod tree;
pub use tree::AvlTree;
