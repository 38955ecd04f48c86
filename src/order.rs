//! Orderings used to place values in a [`Tree`][crate::Tree].
//!
//! An ordering is a strict "less than" predicate. Anything implementing [`Compare`] can be
//! handed to a tree at construction and is used for every comparison after that.
//!
//! **Note** A tree looks values up with `PartialEq` and places them with the ordering, so the
//! two must agree: `a == b` must imply that neither `less(a, b)` nor `less(b, a)` holds. Nothing
//! checks this. An ordering that disagrees with equality makes `search`, `remove` and friends
//! miss values that are in the tree.

/// A strict ordering over `T`.
///
/// Implemented by [`Natural`] and by every `Fn(&T, &T) -> bool` closure.
///
/// # Examples
///
/// ```
/// use ordered_tree::{Compare, Natural};
///
/// assert!(Natural.less(&1, &2));
///
/// let descending = |a: &i32, b: &i32| a > b;
/// assert!(descending.less(&2, &1));
/// ```
pub trait Compare<T: ?Sized> {
    /// Returns `true` if `a` sorts strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;
}

impl<T, F> Compare<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> bool,
{
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// The ordering given by `T`'s own `<`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T> Compare<T> for Natural
where
    T: PartialOrd + ?Sized,
{
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}
