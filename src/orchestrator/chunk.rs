//! Batch chunking (spec §4.7): split a track's entries into fixed-size
//! batches for translation, and bisect a batch that a backend reports a
//! shape mismatch on.

/// Half-open `[start, end)` index ranges covering `0..total` in chunks of
/// at most `batch_size`.
pub fn chunk_ranges(total: usize, batch_size: usize) -> Vec<(usize, usize)> {
    if batch_size == 0 || total == 0 {
        return Vec::new();
    }
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + batch_size).min(total);
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Split a range in half, used to retry a shape-mismatched batch as two
/// smaller ones (spec §4.7 "shape-mismatch bisection"). Returns `None`
/// once the range can no longer be split (a single entry).
pub fn bisect(range: (usize, usize)) -> Option<((usize, usize), (usize, usize))> {
    let (start, end) = range;
    if end - start < 2 {
        return None;
    }
    let mid = start + (end - start) / 2;
    Some(((start, mid), (mid, end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_ranges_covers_every_index_without_overlap() {
        let ranges = chunk_ranges(23, 10);
        assert_eq!(ranges, vec![(0, 10), (10, 20), (20, 23)]);
    }

    #[test]
    fn chunk_ranges_empty_for_zero_total() {
        assert_eq!(chunk_ranges(0, 10), Vec::new());
    }

    #[test]
    fn bisect_splits_evenly_and_stops_at_one() {
        let (a, b) = bisect((0, 10)).unwrap();
        assert_eq!(a, (0, 5));
        assert_eq!(b, (5, 10));
        assert!(bisect((0, 1)).is_none());
    }
}
