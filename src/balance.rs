//! Even distribution of items across sublists.
//!
//! Used by the grouping algorithms: round-robin dealing for initial group
//! formation, smallest-first top-up when crossover leaves students
//! unassigned, and a rebalancing pass that restores the "no two groups
//! differ in size by more than one" invariant.

/// Deals `items` round-robin across `bins` sublists.
///
/// Resulting sizes differ by at most one; the first `len % bins` sublists
/// receive the extra items. Returns no sublists when `bins` is zero.
pub fn distribute_evenly<T>(items: Vec<T>, bins: usize) -> Vec<Vec<T>> {
    if bins == 0 {
        return Vec::new();
    }
    let mut out: Vec<Vec<T>> = (0..bins).map(|_| Vec::new()).collect();
    for (i, item) in items.into_iter().enumerate() {
        out[i % bins].push(item);
    }
    out
}

/// Deals additional `items` onto existing sublists, smallest-first.
///
/// Each item goes to the currently smallest sublist, so sizes stay as even
/// as the starting state allows. No-op when `sublists` is empty.
pub fn distribute_into<T>(items: Vec<T>, sublists: &mut [Vec<T>]) {
    if sublists.is_empty() {
        return;
    }
    for item in items {
        let smallest = sublists
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.len())
            .map(|(i, _)| i)
            .expect("sublists is non-empty");
        sublists[smallest].push(item);
    }
}

/// Moves single elements from the largest sublist to the smallest until no
/// two sublists differ in size by two or more.
///
/// Each move strictly shrinks the largest-minus-smallest spread (or the
/// number of sublists at the extremes), so the loop terminates for
/// arbitrary inputs.
pub fn rebalance<T>(sublists: &mut [Vec<T>]) {
    if sublists.len() < 2 {
        return;
    }
    loop {
        let largest = sublists
            .iter()
            .enumerate()
            .max_by_key(|(_, s)| s.len())
            .map(|(i, _)| i)
            .expect("at least two sublists");
        let smallest = sublists
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.len())
            .map(|(i, _)| i)
            .expect("at least two sublists");
        if sublists[largest].len() < sublists[smallest].len() + 2 {
            break;
        }
        let moved = sublists[largest].pop().expect("largest sublist is non-empty");
        sublists[smallest].push(moved);
    }
}
