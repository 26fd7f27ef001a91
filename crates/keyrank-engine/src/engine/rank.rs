//! Stable descending ranking with optional top-N truncation.

use std::cmp::Ordering;

/// An entry of a ranked result.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranked<T> {
    /// 1-based position in the result.
    pub rank: usize,
    pub item: T,
}

/// Sort `items` by `key` descending, keep the first `top_n`, and number them.
///
/// The sort is stable: items with equal keys keep their input order. Ranks
/// are assigned after truncation and always form `1..=len`.
pub fn rank_by<T, F>(mut items: Vec<T>, top_n: Option<usize>, key: F) -> Vec<Ranked<T>>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    if let Some(n) = top_n {
        items.truncate(n);
    }
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| Ranked {
            rank: idx + 1,
            item,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_descending() {
        let ranked = rank_by(vec![1.0, 3.0, 2.0], None, |v| *v);
        let values: Vec<f64> = ranked.iter().map(|r| r.item).collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = vec![("a", 5.0), ("b", 7.0), ("c", 5.0), ("d", 5.0)];
        let ranked = rank_by(items, None, |(_, v)| *v);
        let names: Vec<&str> = ranked.iter().map(|r| r.item.0).collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_signed_zero_ties_keep_input_order() {
        let items = vec![("a", -0.0), ("b", 0.0), ("c", -0.0)];
        let ranked = rank_by(items, None, |(_, v)| *v);
        let names: Vec<&str> = ranked.iter().map(|r| r.item.0).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_top_n_larger_than_input() {
        let ranked = rank_by(vec![1.0, 2.0, 3.0], Some(5), |v| *v);
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_top_n_truncates_before_ranking() {
        let ranked = rank_by(vec![4.0, 9.0, 1.0, 7.0], Some(2), |v| *v);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], Ranked { rank: 1, item: 9.0 });
        assert_eq!(ranked[1], Ranked { rank: 2, item: 7.0 });
    }

    #[test]
    fn test_empty_input() {
        let ranked: Vec<Ranked<f64>> = rank_by(Vec::new(), Some(10), |v| *v);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_negative_scores_rank_last() {
        let ranked = rank_by(vec![-2.0, 0.0, 3.5], None, |v| *v);
        assert_eq!(ranked.last().map(|r| r.item), Some(-2.0));
    }
}
