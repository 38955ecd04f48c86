use thiserror::Error;

/// Returned by [`Tree::remove`][crate::Tree::remove] when no stored value equals the one
/// being removed. The tree is left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Error)]
#[error("value not found in tree")]
pub struct NotFound;
