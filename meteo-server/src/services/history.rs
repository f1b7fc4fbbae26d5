use std::collections::VecDeque;
use std::collections::vec_deque::Iter;

/// Default number of values retained per sensor channel.
pub const HIST_LEN: usize = 50;

/// Fixed-capacity FIFO: once full, every push evicts the oldest value.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }

        self.items.push_back(value);
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }

    /// The newest `count` values, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &T> {
        self.items.iter().skip(self.items.len().saturating_sub(count))
    }
}

impl<T> Default for BoundedHistory<T> {
    fn default() -> Self {
        Self::new(HIST_LEN)
    }
}

impl<'a, T> IntoIterator for &'a BoundedHistory<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Right-aligns histories of unequal length so that equal indices mean equal arrival
/// position counted from the newest value. Shorter histories are left-padded with
/// `fill`. Alignment is positional only: two values at the same index did not
/// necessarily arrive at the same time.
pub fn to_aligned_series<T, U, F>(histories: &[&BoundedHistory<T>], fill: U, project: F) -> (Vec<Vec<U>>, usize)
where
    U: Clone,
    F: Fn(&T) -> U,
{
    let length = histories.iter().map(|history| history.len()).max().unwrap_or(0);

    let series = histories
        .iter()
        .map(|history| {
            let mut aligned = vec![fill.clone(); length - history.len()];
            aligned.extend(history.iter().map(&project));
            aligned
        })
        .collect();

    (series, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(values: &[i32]) -> BoundedHistory<i32> {
        let mut history = BoundedHistory::default();
        values.iter().for_each(|value| history.push(*value));
        history
    }

    #[test]
    fn test_keeps_last_values_in_arrival_order() {
        let mut history = BoundedHistory::new(50);

        for value in 0..60 {
            history.push(value);
        }

        assert_eq!(history.len(), 50);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), (10..60).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_capacity_keeps_latest_value() {
        let mut history = BoundedHistory::new(0);
        history.push(1);
        history.push(2);

        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_recent_values() {
        let history = history_of(&[1, 2, 3, 4, 5]);

        assert_eq!(history.recent(2).copied().collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(history.recent(10).count(), 5);
    }

    #[test]
    fn test_aligned_series_left_pads_shorter_histories() {
        let short = history_of(&[1, 2, 3]);
        let long = history_of(&[10, 20, 30, 40, 50]);
        let other = history_of(&[5, 4, 3, 2, 1]);

        let (series, length) = to_aligned_series(&[&short, &long, &other], None, |v| Some(*v));

        assert_eq!(length, 5);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|s| s.len() == 5));
        assert_eq!(series[0], vec![None, None, Some(1), Some(2), Some(3)]);
        assert_eq!(series[1][0], Some(10));
    }

    #[test]
    fn test_aligned_series_of_empty_histories() {
        let empty: BoundedHistory<i32> = BoundedHistory::default();

        let (series, length) = to_aligned_series(&[&empty, &empty], 0, |v| *v);

        assert_eq!(length, 0);
        assert_eq!(series, vec![Vec::<i32>::new(), Vec::new()]);
    }
}
