//! An ordered container built on an unbalanced Binary Search Tree (BST) with parent pointers.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a value and
//! will sometimes have child `Node`s. The invariants of this BST are:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree have a value that
//!    is less than its own value.
//! 2. For every `Node`, none of the `Node`s in its right subtree have a value
//!    that is less than its own value. Equal values therefore live to the right,
//!    which lets the tree hold duplicates.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching takes `O(height)` (where `height` is the longest path from the root
//! `Node` to a leaf `Node`). This tree does nothing to limit its height, so inserting
//! sorted values gives a height of `N`. BSTs naturally support sorted iteration
//! by visiting the left subtree, then the subtree root, then the right subtree.
//!
//! Every `Node` also points back at its parent. That lets [`Node::predecessor`] and
//! [`Node::successor`] find a value's neighbours without keeping a stack, and the
//! tree's [`Iter`] walks the whole tree in sorted order the same way.
//!
//! "Less" is decided by a [`Compare`] ordering chosen when the tree is built. By
//! default that's [`Natural`], which uses the values' own `<`.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
pub mod order;
pub mod tree;

pub use error::NotFound;
pub use order::{Compare, Natural};
pub use tree::{Iter, Node, Tree};
