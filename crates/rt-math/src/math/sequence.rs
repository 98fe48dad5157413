//! Integer sequence helpers.

/// Length of the longest run of consecutive integers present in `levels`.
///
/// Duplicates are ignored and order does not matter. An empty input has a
/// run length of zero.
pub fn longest_consecutive_run(levels: &[u32]) -> usize {
    let mut sorted = levels.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let Some((&first, rest)) = sorted.split_first() else {
        return 0;
    };

    let mut best = 1;
    let mut current = 1;
    let mut prev = first;
    for &level in rest {
        if prev.checked_add(1) == Some(level) {
            current += 1;
        } else {
            current = 1;
        }
        best = best.max(current);
        prev = level;
    }
    best
}
