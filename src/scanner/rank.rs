use std::cmp::Reverse;

/// Sort largest first. Equal sizes keep their original order.
pub fn rank_by_size<T, F>(items: &mut [T], size: F)
where
    F: Fn(&T) -> u64,
{
    // sort_by_key is stable
    items.sort_by_key(|item| Reverse(size(item)));
}
