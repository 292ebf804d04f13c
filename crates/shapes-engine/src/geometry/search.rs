/// Returns the index of the table entry numerically closest to `key`.
///
/// `table` must be monotonic (ascending or descending). The lookup is a
/// binary search followed by a comparison of the two bracketing entries;
/// ties resolve to the lower index. Keys beyond either end clamp to that
/// end. Returns `None` for an empty table or a NaN key.
pub fn nearest_index(table: &[f32], key: f32) -> Option<usize> {
    let (&first, &last) = (table.first()?, table.last()?);
    if key.is_nan() {
        return None;
    }

    let descending = last < first;
    let upper = table.partition_point(|&v| if descending { v > key } else { v < key });

    if upper == 0 {
        return Some(0);
    }
    if upper == table.len() {
        return Some(table.len() - 1);
    }

    let below = upper - 1;
    let d_below = (table[below] - key).abs();
    let d_upper = (table[upper] - key).abs();
    Some(if d_upper < d_below { upper } else { below })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_hits_on_ascending_table() {
        let t = [0.0, 1.0, 2.0, 3.0];
        for (i, &v) in t.iter().enumerate() {
            assert_eq!(nearest_index(&t, v), Some(i));
        }
    }

    #[test]
    fn closer_neighbor_wins_on_descending_table() {
        let t = [1.1, 0.0, -1.1];
        assert_eq!(nearest_index(&t, 0.9), Some(0));
        assert_eq!(nearest_index(&t, 0.2), Some(1));
        assert_eq!(nearest_index(&t, -0.6), Some(2));
        assert_eq!(nearest_index(&t, 0.0), Some(1));
    }

    #[test]
    fn ties_resolve_to_lower_index() {
        assert_eq!(nearest_index(&[0.0, 2.0], 1.0), Some(0));
        assert_eq!(nearest_index(&[2.0, 0.0], 1.0), Some(0));
    }

    #[test]
    fn out_of_range_keys_clamp() {
        let t = [3.0, 2.0, 1.0];
        assert_eq!(nearest_index(&t, 10.0), Some(0));
        assert_eq!(nearest_index(&t, -10.0), Some(2));
    }

    #[test]
    fn empty_table_and_nan_have_no_match() {
        assert_eq!(nearest_index(&[], 1.0), None);
        assert_eq!(nearest_index(&[1.0], f32::NAN), None);
        assert_eq!(nearest_index(&[1.0], 5.0), Some(0));
    }
}
