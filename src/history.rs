//! Bounded, newest-first lists shared by the bot and the web front end.

use std::collections::VecDeque;

/// Fixed-capacity list kept newest first.
///
/// Pushing past capacity evicts the oldest entry. Used for per-session
/// history, the team-radio translation feed and the bot's transcript cache.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);

        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert as newest, evicting the oldest entry when full.
    pub fn push(&mut self, value: T) {
        if self.items.len() >= self.capacity {
            let _ = self.items.pop_back();
        }
        self.items.push_front(value);
    }

    /// Insert as newest after removing any entry matching `same`.
    pub fn push_unique(&mut self, value: T, same: impl Fn(&T, &T) -> bool) {
        if let Some(pos) = self.items.iter().position(|item| same(item, &value)) {
            let _ = self.items.remove(pos);
        }
        self.push(value);
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| pred(item))
    }

    /// Remove and return the newest entry matching `pred`.
    pub fn take(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let pos = self.items.iter().position(|item| pred(item))?;
        self.items.remove(pos)
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// Entries from newest to oldest.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut history = BoundedHistory::new(3);
        for i in 1..=5 {
            history.push(i);
        }
        assert_eq!(history.to_vec(), vec![5, 4, 3]);
    }

    #[test]
    fn test_push_unique_moves_to_front() {
        let mut history = BoundedHistory::new(3);
        history.push(("a", 1));
        history.push(("b", 2));
        history.push_unique(("a", 3), |x, y| x.0 == y.0);

        assert_eq!(history.to_vec(), vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_find() {
        let mut history = BoundedHistory::new(2);
        history.push("x");
        history.push("y");
        assert_eq!(history.find(|v| *v == "x"), Some(&"x"));
        assert_eq!(history.find(|v| *v == "z"), None);
    }

    #[test]
    fn test_take_removes_entry() {
        let mut history = BoundedHistory::new(3);
        history.push(1);
        history.push(2);
        assert_eq!(history.take(|v| *v == 1), Some(1));
        assert_eq!(history.take(|v| *v == 1), None);
        assert_eq!(history.to_vec(), vec![2]);
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_rejected() {
        let _ = BoundedHistory::<u8>::new(0);
    }
}
