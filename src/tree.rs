//! An unbalanced BST with parent pointers. Each node owns its two children and keeps a
//! non-owning pointer to its parent so that predecessor and successor queries can walk upwards
//! without a stack.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::Tree;
//!
//! let mut tree: Tree<i32> = [5, 3, 8, 1, 4, 7, 9].iter().copied().collect();
//! assert_eq!(tree.to_vec(), vec![1, 3, 4, 5, 7, 8, 9]);
//!
//! // Neighbours in sorted order.
//! assert_eq!(tree.predecessor(&4), Some(&3));
//! assert_eq!(tree.successor(&4), Some(&5));
//! assert_eq!(tree.predecessor(&1), None);
//!
//! // Removing a node with two children promotes its in-order successor.
//! assert_eq!(tree.remove(&5), Ok(6));
//! assert_eq!(tree.root().map(|n| *n.value()), Some(7));
//! assert_eq!(tree.to_vec(), vec![1, 3, 4, 7, 8, 9]);
//! ```

use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use log::{debug, trace};

use crate::error::NotFound;
use crate::order::{Compare, Natural};

/// A mutable Binary Search Tree ordered by `C`. Values that compare "less" than a node go to
/// its left, everything else (including equal values) goes to its right, so the tree happily
/// stores duplicates.
///
/// The tree never rebalances. Inserting already sorted values builds a tree that is really a
/// linked list.
///
/// **Note** Lookups use `T`'s `PartialEq` while placement uses `C`. If `C` disagrees with
/// `PartialEq` lookups can miss stored values. See [`crate::order`].
pub struct Tree<T, C = Natural> {
    // A `Link` instead of an `Option<Box<Node>>` so that moving the `Tree` doesn't move the root
    // and break its children's parent pointers.
    root: Link<T>,
    len: usize,
    order: C,
    _owns: PhantomData<Box<Node<T>>>,
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree` ordered by `T`'s own `<`.
    pub fn new() -> Self {
        Self::with_order(Natural)
    }
}

impl<T, C> Tree<T, C> {
    /// Generates a new, empty `Tree` ordered by `order`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::with_order(|a: &i32, b: &i32| a > b);
    /// tree.insert(1);
    /// tree.insert(3);
    /// tree.insert(2);
    ///
    /// assert_eq!(tree.to_vec(), vec![3, 2, 1]);
    /// ```
    pub fn with_order(order: C) -> Self {
        Self {
            root: Link(None),
            len: 0,
            order,
            _owns: PhantomData,
        }
    }

    /// Builds a tree by inserting each of `elements` in turn. The shape of the resulting tree
    /// depends on the order of `elements`, its contents do not.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let tree = Tree::from_elements(vec![10, 2, 33], |a: &u32, b: &u32| a.to_string() < b.to_string());
    ///
    /// assert_eq!(tree.len(), 3);
    /// assert_eq!(tree.to_vec(), vec![10, 2, 33]);
    /// ```
    pub fn from_elements<I>(elements: I, order: C) -> Self
    where
        I: IntoIterator<Item = T>,
        C: Compare<T>,
    {
        let mut tree = Self::with_order(order);
        for element in elements {
            tree.insert(element);
        }
        tree
    }

    /// The number of values stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The ordering this tree was built with.
    pub fn order(&self) -> &C {
        &self.order
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.node()
    }

    /// The smallest value in the tree.
    pub fn min(&self) -> Option<&T> {
        self.root().map(|root| root.leftmost_descendant().value())
    }

    /// The largest value in the tree. With duplicates, this is the last one inserted.
    pub fn max(&self) -> Option<&T> {
        self.root().map(|root| root.rightmost_descendant().value())
    }

    /// Inserts `value` and returns how many values the tree holds afterwards. Equal values are
    /// all kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert_eq!(tree.insert(5), 1);
    /// assert_eq!(tree.insert(5), 2);
    /// assert_eq!(tree.to_vec(), vec![5, 5]);
    /// ```
    pub fn insert(&mut self, value: T) -> usize
    where
        C: Compare<T>,
    {
        let mut new_node = Node::new_boxed(value);

        let Some(mut current) = self.root.0 else {
            self.root = Link::leak(new_node);
            self.len = 1;
            trace!("inserted root");
            return self.len;
        };

        let mut depth = 1;
        loop {
            // SAFETY: Every link reachable from the root points to a live node owned by this
            // tree. We hold `&mut self` so nothing else can be looking at it.
            let node = unsafe { &mut *current.as_ptr() };
            let slot = if self.order.less(&new_node.value, &node.value) {
                &mut node.left
            } else {
                &mut node.right
            };

            if let Some(child) = slot.0 {
                current = child;
                depth += 1;
            } else {
                new_node.parent = Link(Some(current));
                *slot = Link::leak(new_node);
                break;
            }
        }

        self.len += 1;
        trace!("inserted at depth {}, len is now {}", depth, self.len);
        self.len
    }

    /// Finds a node whose value equals `value`. With duplicates, this is the one closest to the
    /// root.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let tree: Tree<_> = vec![2, 1, 3].into_iter().collect();
    ///
    /// let node = tree.search(&1).unwrap();
    /// assert_eq!(node.value(), &1);
    /// assert_eq!(node.parent().map(|p| *p.value()), Some(2));
    /// assert!(tree.search(&42).is_none());
    /// ```
    pub fn search(&self, value: &T) -> Option<&Node<T>>
    where
        T: PartialEq,
        C: Compare<T>,
    {
        // SAFETY: The pointer came from a link reachable from the root. The returned reference
        // borrows `self` so the node can't be freed while it's alive.
        self.find(value).map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// Whether some stored value equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
        C: Compare<T>,
    {
        self.find(value).is_some()
    }

    /// Removes one value equal to `value` and returns how many values are left. If there is no
    /// such value the tree is untouched and [`NotFound`] is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{NotFound, Tree};
    ///
    /// let mut tree: Tree<_> = vec![5, 5].into_iter().collect();
    ///
    /// assert_eq!(tree.remove(&5), Ok(1));
    /// assert_eq!(tree.remove(&5), Ok(0));
    /// assert_eq!(tree.remove(&5), Err(NotFound));
    /// ```
    pub fn remove(&mut self, value: &T) -> Result<usize, NotFound>
    where
        T: PartialEq,
        C: Compare<T>,
    {
        match self.take(value) {
            Some(_) => Ok(self.len),
            None => Err(NotFound),
        }
    }

    /// Removes one value equal to `value` and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::with_order(|a: &(i32, char), b: &(i32, char)| a.0 < b.0);
    /// tree.insert((1, 'a'));
    ///
    /// assert_eq!(tree.take(&(1, 'a')), Some((1, 'a')));
    /// assert_eq!(tree.take(&(1, 'a')), None);
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T>
    where
        T: PartialEq,
        C: Compare<T>,
    {
        let Some(target) = self.find(value) else {
            debug!("remove found nothing to remove in a tree of {} values", self.len);
            return None;
        };

        // SAFETY: `target` is a live node of this tree and we hold `&mut self`. The successor
        // is a different node (it lives in `target`'s right subtree) so the two mutable
        // references don't alias.
        let detached = unsafe {
            let node = &mut *target.as_ptr();
            match (node.left.0, node.right.0) {
                (Some(_), Some(right)) => {
                    trace!("removing node with two children, promoting its successor");
                    let mut successor = Node::leftmost(right);
                    std::mem::swap(&mut node.value, &mut successor.as_mut().value);
                    successor
                }
                _ => target,
            }
        };

        // SAFETY: `detached` is either `target` with at most one child or the leftmost node of
        // `target`'s right subtree which has no left child by definition.
        let removed = unsafe { self.unlink(detached) };
        self.len -= 1;
        Some(removed.value)
    }

    /// All values in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let tree: Tree<_> = vec![3, 1, 2].into_iter().collect();
    ///
    /// assert_eq!(tree.to_vec(), vec![1, 2, 3]);
    /// ```
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Iterates over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            front: self.root().map(Node::leftmost_descendant),
            back: self.root().map(Node::rightmost_descendant),
            remaining: self.len,
        }
    }

    /// The value right before `value` in sorted order.
    ///
    /// Returns `None` both when `value` isn't in the tree and when it is the smallest value. Use
    /// [`Tree::search`] followed by [`Node::predecessor`] to tell the two apart.
    pub fn predecessor(&self, value: &T) -> Option<&T>
    where
        T: PartialEq,
        C: Compare<T>,
    {
        self.search(value)?.predecessor().map(Node::value)
    }

    /// The value right after `value` in sorted order.
    ///
    /// Returns `None` both when `value` isn't in the tree and when it is the largest value. Use
    /// [`Tree::search`] followed by [`Node::successor`] to tell the two apart.
    pub fn successor(&self, value: &T) -> Option<&T>
    where
        T: PartialEq,
        C: Compare<T>,
    {
        self.search(value)?.successor().map(Node::value)
    }

    /// Removes every value, keeping the ordering.
    pub fn clear(&mut self) {
        let mut pending: Vec<NonNull<Node<T>>> = self.root.take().0.into_iter().collect();
        self.len = 0;

        while let Some(ptr) = pending.pop() {
            // SAFETY: Every node is reachable through exactly one child link (or the root link)
            // so it's pushed and freed exactly once. The root link was cleared above so nothing
            // can reach these nodes afterwards.
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            pending.extend(node.left.0);
            pending.extend(node.right.0);
        }
    }

    fn find(&self, value: &T) -> Option<NonNull<Node<T>>>
    where
        T: PartialEq,
        C: Compare<T>,
    {
        let mut current = self.root.0;
        while let Some(ptr) = current {
            // SAFETY: Every link reachable from the root points to a live node owned by this
            // tree.
            let node = unsafe { ptr.as_ref() };
            if *value == node.value {
                return Some(ptr);
            }
            current = if self.order.less(value, &node.value) {
                node.left.0
            } else {
                node.right.0
            };
        }
        None
    }

    /// Splices `node` out of the tree by handing its slot to its only child and returns it.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this tree with at most one child. The caller gets back the
    /// only owner of the node.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> Box<Node<T>> {
        let mut boxed = Box::from_raw(node.as_ptr());
        debug_assert!(boxed.left.0.is_none() || boxed.right.0.is_none());

        let mut child = if boxed.left.0.is_some() {
            boxed.left.take()
        } else {
            boxed.right.take()
        };
        let parent = boxed.parent.take();

        if let Some(child) = child.node_mut() {
            child.parent = parent;
        }

        match parent.0 {
            None => self.root = child,
            Some(mut parent) => {
                let parent = parent.as_mut();
                if parent.left.0 == Some(node) {
                    parent.left = child;
                } else {
                    debug_assert_eq!(parent.right.0, Some(node));
                    parent.right = child;
                }
            }
        }

        boxed
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Drop for Tree<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, C> Clone for Tree<T, C>
where
    T: Clone,
    C: Clone,
{
    /// Copies the tree node for node so the clone has exactly the same shape.
    fn clone(&self) -> Self {
        let mut tree = Self::with_order(self.order.clone());
        let Some(root) = self.root() else {
            return tree;
        };

        let new_root = Node::leak(root.value.clone());
        // Linked before copying the rest so a panicking `T::clone` leaves nothing leaked.
        tree.root = Link(Some(new_root));

        let mut pending = vec![(root, new_root)];
        while let Some((source, copy)) = pending.pop() {
            // SAFETY: `copy` was allocated above or in an earlier iteration and is only
            // reachable from `tree`, which nobody else can see yet.
            let copy_node = unsafe { &mut *copy.as_ptr() };

            if let Some(left) = source.left() {
                let mut new_left = Node::leak(left.value.clone());
                // SAFETY: Freshly allocated and distinct from `copy`.
                unsafe { new_left.as_mut().parent = Link(Some(copy)) };
                copy_node.left = Link(Some(new_left));
                pending.push((left, new_left));
            }
            if let Some(right) = source.right() {
                let mut new_right = Node::leak(right.value.clone());
                // SAFETY: Freshly allocated and distinct from `copy`.
                unsafe { new_right.as_mut().parent = Link(Some(copy)) };
                copy_node.right = Link(Some(new_right));
                pending.push((right, new_right));
            }
        }

        tree.len = self.len;
        tree
    }
}

impl<T, C> fmt::Debug for Tree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("values", &DebugValues(self.iter()))
            .finish()
    }
}

/// Lists a tree's values in order. Walking successor links keeps this from recursing down
/// degenerate trees.
struct DebugValues<'a, T>(Iter<'a, T>);

impl<'a, T> fmt::Debug for DebugValues<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.clone()).finish()
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: PartialOrd,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_elements(iter, Natural)
    }
}

impl<T, C> Extend<T> for Tree<T, C>
where
    C: Compare<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a Tree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct Link<T>(Option<NonNull<Node<T>>>);

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<T> Copy for Link<T> {}

impl<T> Link<T> {
    fn leak(node: Box<Node<T>>) -> Self {
        Self(Some(NonNull::from(Box::leak(node))))
    }

    fn node(&self) -> Option<&Node<T>> {
        // SAFETY: If the link is not `None` then it points to a live `Node` owned by the tree
        // this link belongs to. Shared access to the link means shared access to the tree, so
        // nothing can mutate or free the node while the returned reference lives.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn node_mut(&mut self) -> Option<&mut Node<T>> {
        // SAFETY: As in `node`, plus callers only reach a link mutably through `&mut Tree` or a
        // node they already own uniquely.
        unsafe { self.0.as_mut().map(|ptr| ptr.as_mut()) }
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }
}

/// One value in a [`Tree`] along with its place in the tree. Nodes are only ever handed out by
/// shared reference, so you can walk around the tree but not change it.
pub struct Node<T> {
    value: T,
    parent: Link<T>,
    left: Link<T>,
    right: Link<T>,
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    /// Only shows the neighbouring values, never whole subtrees.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("parent", &self.parent().map(Node::value))
            .field("left", &self.left().map(Node::value))
            .field("right", &self.right().map(Node::value))
            .finish()
    }
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Node {
            value,
            parent: Link(None),
            left: Link(None),
            right: Link(None),
        })
    }

    fn leak(value: T) -> NonNull<Self> {
        NonNull::from(Box::leak(Self::new_boxed(value)))
    }

    /// Follows left links down from `ptr` as far as they go.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live node.
    unsafe fn leftmost(mut ptr: NonNull<Self>) -> NonNull<Self> {
        while let Some(left) = (*ptr.as_ptr()).left.0 {
            ptr = left;
        }
        ptr
    }

    /// The stored value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The node this one hangs off, or `None` for the root.
    pub fn parent(&self) -> Option<&Self> {
        self.parent.node()
    }

    /// The root of the left subtree. Everything in it is less than this node's value.
    pub fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    /// The root of the right subtree. Nothing in it is less than this node's value.
    pub fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.0.is_none() && self.right.0.is_none()
    }

    /// The smallest node of the subtree rooted here, found by following left links. Returns
    /// `self` when there is no left child.
    pub fn leftmost_descendant(&self) -> &Self {
        let mut current = self;
        while let Some(left) = current.left() {
            current = left;
        }
        current
    }

    /// The largest node of the subtree rooted here, found by following right links. Returns
    /// `self` when there is no right child.
    pub fn rightmost_descendant(&self) -> &Self {
        let mut current = self;
        while let Some(right) = current.right() {
            current = right;
        }
        current
    }

    /// The node right before this one in sorted order, or `None` if this node holds the
    /// smallest value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let tree: Tree<_> = vec![5, 3, 8, 4].into_iter().collect();
    ///
    /// let four = tree.search(&4).unwrap();
    /// assert_eq!(four.predecessor().map(|n| *n.value()), Some(3));
    /// assert_eq!(four.successor().map(|n| *n.value()), Some(5));
    /// ```
    pub fn predecessor(&self) -> Option<&Self> {
        if let Some(left) = self.left() {
            return Some(left.rightmost_descendant());
        }

        // Climb while we're a left child. The first time we step up from a right child, that
        // parent is the one.
        let mut current = self;
        while let Some(parent) = current.parent() {
            if parent.right().map_or(false, |right| ptr::eq(right, current)) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// The node right after this one in sorted order, or `None` if this node holds the largest
    /// value.
    pub fn successor(&self) -> Option<&Self> {
        if let Some(right) = self.right() {
            return Some(right.leftmost_descendant());
        }

        let mut current = self;
        while let Some(parent) = current.parent() {
            if parent.left().map_or(false, |left| ptr::eq(left, current)) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }
}

/// An in-order iterator over the values of a [`Tree`], created by [`Tree::iter`].
///
/// It walks successor links, so it needs no stack no matter how deep the tree is.
pub struct Iter<'a, T> {
    front: Option<&'a Node<T>>,
    back: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        self.front = node.successor();
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        self.back = node.predecessor();
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
