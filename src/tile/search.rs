//! Search over record arrays sorted by a key
//!
//! Signs and access restrictions are sorted by edge ordinal, departures by
//! line id. None of them carries an index, so a lookup binary searches for any
//! record with the key, walks back to the first record of the run of equal
//! keys, then forward to its end.

use std::cmp::Ordering;
use std::ops::Range;

/// Ordinal range of the records whose key equals `target`, in array order.
///
/// `key_at` is only called with ordinals below `count`. The array is trusted
/// to be sorted; an unsorted array gives an arbitrary (but in-bounds) answer.
pub(crate) fn equal_range<K, F>(count: u32, target: K, key_at: F) -> Option<Range<u32>>
where
    K: Ord,
    F: Fn(u32) -> K,
{
    let mut low = 0;
    let mut high = count;
    let mut found = None;
    while low < high {
        let mid = low + (high - low) / 2;
        match key_at(mid).cmp(&target) {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => {
                found = Some(mid);
                break;
            }
        }
    }
    let hit = found?;

    let mut start = hit;
    while start > 0 && key_at(start - 1) == target {
        start -= 1;
    }
    let mut end = hit + 1;
    while end < count && key_at(end) == target {
        end += 1;
    }
    Some(start..end)
}
