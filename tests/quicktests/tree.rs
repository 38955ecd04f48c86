use ordered_tree::{NotFound, Tree};

use std::collections::HashSet;

use quickcheck_macros::quickcheck;

use crate::Op;

/// Applies a set of operations to a tree and to a plain `Vec` acting as a multiset.
/// Returns how many inserts and removes succeeded so the count can be checked.
fn do_ops<T>(ops: &[Op<T>], tree: &mut Tree<T>, model: &mut Vec<T>) -> (usize, usize)
where
    T: PartialOrd + Clone,
{
    let mut inserted = 0;
    let mut removed = 0;
    for op in ops {
        match op {
            Op::Insert(value) => {
                tree.insert(value.clone());
                model.push(value.clone());
                inserted += 1;
            }
            Op::Remove(value) => {
                if tree.remove(value).is_ok() {
                    let pos = model
                        .iter()
                        .position(|x| x == value)
                        .expect("tree removed a value the model doesn't have");
                    model.swap_remove(pos);
                    removed += 1;
                }
            }
        }
    }

    (inserted, removed)
}

#[quickcheck]
fn stays_sorted(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut model = Vec::new();

    do_ops(&ops, &mut tree, &mut model);
    model.sort_unstable();

    tree.to_vec() == model
}

#[quickcheck]
fn len_counts_successful_operations(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut model = Vec::new();

    let (inserted, removed) = do_ops(&ops, &mut tree, &mut model);

    tree.len() == inserted - removed && tree.len() == tree.iter().count()
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let len = tree.len();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none() && tree.remove(x) == Err(NotFound) && tree.len() == len)
}

#[quickcheck]
fn insert_then_remove(xs: Vec<i8>, x: i8) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let before = tree.to_vec();

    tree.insert(x);
    let found = tree.search(&x).map(|n| *n.value()) == Some(x);
    let removed = tree.remove(&x) == Ok(xs.len());
    let still_there = tree.search(&x).is_some() == xs.contains(&x);

    found && removed && still_there && tree.to_vec() == before
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while tree.remove(delete).is_ok() {}
    }

    let mut still_present = xs;
    still_present.retain(|x| !deletes.contains(x));

    deletes.iter().all(|x| tree.search(x).is_none())
        && still_present.iter().all(|x| tree.search(x).is_some())
        && tree.len() == still_present.len()
}

#[quickcheck]
fn predecessor_successor_duality(xs: Vec<i16>) -> bool {
    let mut seen = HashSet::new();
    let xs: Vec<i16> = xs.into_iter().filter(|x| seen.insert(*x)).collect();
    let tree: Tree<_> = xs.iter().copied().collect();

    xs.iter().all(|x| {
        let back_from_predecessor = tree
            .predecessor(x)
            .map_or(true, |p| tree.successor(p) == Some(x));
        let back_from_successor = tree
            .successor(x)
            .map_or(true, |s| tree.predecessor(s) == Some(x));
        back_from_predecessor && back_from_successor
    })
}

#[quickcheck]
fn extremes_have_no_outer_neighbour(xs: Vec<i8>) -> bool {
    // With duplicates the largest value's successor is another copy of itself.
    let mut seen = HashSet::new();
    let xs: Vec<i8> = xs.into_iter().filter(|x| seen.insert(*x)).collect();
    let tree: Tree<_> = xs.iter().copied().collect();

    match (tree.min(), tree.max()) {
        (Some(min), Some(max)) => {
            tree.predecessor(min).is_none()
                && tree.successor(max).is_none()
                && Some(min) == xs.iter().min()
                && Some(max) == xs.iter().max()
        }
        (None, None) => xs.is_empty(),
        _ => false,
    }
}

#[quickcheck]
fn custom_order_sorts_descending(xs: Vec<i8>) -> bool {
    let tree = Tree::from_elements(xs.clone(), |a: &i8, b: &i8| a > b);
    let mut expected = xs;
    expected.sort_unstable_by(|a, b| b.cmp(a));

    tree.to_vec() == expected
}

#[quickcheck]
fn clone_is_independent(xs: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let copy = tree.clone();
    for x in &xs {
        tree.remove(x).expect("value was inserted");
    }

    tree.is_empty() && copy.len() == xs.len() && copy.iter().rev().count() == xs.len()
}

#[test]
fn scenario_duplicates() {
    let mut tree: Tree<_> = vec![5, 5, 5].into_iter().collect();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.to_vec(), vec![5, 5, 5]);
    assert_eq!(tree.remove(&5), Ok(2));
    assert_eq!(tree.remove(&5), Ok(1));
    assert_eq!(tree.remove(&5), Ok(0));
    assert_eq!(tree.remove(&5), Err(NotFound));
}
