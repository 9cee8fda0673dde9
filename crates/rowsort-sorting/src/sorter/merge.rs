//! Stable bottom-up merge sort over index permutations
//!
//! Custom `compare_fn` callbacks are not guaranteed to be a total order,
//! which `slice::sort_by` may reject with a panic. This merge sort accepts
//! any comparator, is stable, and always returns a permutation.

use std::cmp::Ordering;

/// Reorder `order` so that `compare` is non-decreasing, keeping ties in
/// their current relative order
pub(crate) fn stable_sort_by<F>(order: &mut Vec<usize>, mut compare: F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    let len = order.len();
    if len < 2 {
        return;
    }

    let mut scratch = order.clone();
    let mut width = 1;
    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            merge(
                &order[start..mid],
                &order[mid..end],
                &mut scratch[start..end],
                &mut compare,
            );
            start = end;
        }
        std::mem::swap(order, &mut scratch);
        width *= 2;
    }
}

fn merge<F>(left: &[usize], right: &[usize], out: &mut [usize], compare: &mut F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        // Take from the right run only when strictly smaller
        let take_right = match (left.get(i), right.get(j)) {
            (Some(&l), Some(&r)) => compare(r, l) == Ordering::Less,
            (None, Some(_)) => true,
            _ => false,
        };
        if take_right {
            *slot = right[j];
            j += 1;
        } else {
            *slot = left[i];
            i += 1;
        }
    }
}
