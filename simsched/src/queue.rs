use std::collections::BTreeMap;
use std::time::Duration;

/// An opaque handle identifying one live entry in an [`EventQueue`].
///
/// A key is valid from [`insert`](EventQueue::insert) until the entry it
/// refers to is removed, either by [`remove`](EventQueue::remove) or by
/// [`pop_first`](EventQueue::pop_first). Sequence numbers are never reused,
/// so a stale key can never alias a later entry; using one simply finds
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    when: Duration,
    seq: u64,
}

impl EventKey {
    /// Returns the logical time the referenced entry was scheduled at.
    #[must_use]
    pub fn when(&self) -> Duration {
        self.when
    }
}

/// An ordered multiset of values keyed by logical time.
///
/// Entries are ordered by `(when, insertion sequence)`, so enumeration is
/// always non-decreasing in time and entries with equal times come out in
/// insertion order. Both insertion and removal anywhere in the ordering are
/// O(log n).
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use simsched::EventQueue;
/// let mut queue = EventQueue::default();
/// queue.insert(Duration::from_secs(2), "b");
/// let key = queue.insert(Duration::from_secs(1), "a");
///
/// assert_eq!(queue.peek(), Some((Duration::from_secs(1), &"a")));
/// assert_eq!(queue.remove(key), Some("a"));
/// assert_eq!(queue.pop_first(), Some((Duration::from_secs(2), "b")));
/// assert!(queue.is_empty());
/// ```
#[derive(Debug)]
pub struct EventQueue<T> {
    entries: BTreeMap<EventKey, T>,
    next_seq: u64,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> EventQueue<T> {
    /// Inserts `value` at time `when`, returning the key of the new entry.
    ///
    /// Entries inserted at an already occupied time sort after the existing
    /// ones.
    pub fn insert(&mut self, when: Duration, value: T) -> EventKey {
        let key = EventKey {
            when,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.entries.insert(key, value);
        key
    }

    /// Returns the earliest entry without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<(Duration, &T)> {
        self.entries.iter().next().map(|(key, value)| (key.when, value))
    }

    /// Returns the time of the earliest entry, or `None` if the queue is
    /// empty.
    #[must_use]
    pub fn next_time(&self) -> Option<Duration> {
        self.entries.keys().next().map(|key| key.when)
    }

    /// Removes and returns the earliest entry.
    pub fn pop_first(&mut self) -> Option<(Duration, T)> {
        let key = *self.entries.keys().next()?;
        self.entries.remove(&key).map(|value| (key.when, value))
    }

    /// Removes the entry referenced by `key`, wherever it sits in the
    /// ordering.
    ///
    /// Returns `None` if the key no longer refers to a live entry.
    pub fn remove(&mut self, key: EventKey) -> Option<T> {
        self.entries.remove(&key)
    }

    /// Returns `true` if the queue holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_orders_by_time() {
        let mut queue = EventQueue::default();
        queue.insert(Duration::from_secs(10), "a");
        queue.insert(Duration::from_secs(5), "b");
        queue.insert(Duration::from_secs(20), "c");

        assert_eq!(queue.pop_first(), Some((Duration::from_secs(5), "b")));
        assert_eq!(queue.pop_first(), Some((Duration::from_secs(10), "a")));
        assert_eq!(queue.pop_first(), Some((Duration::from_secs(20), "c")));
        assert_eq!(queue.pop_first(), None);
    }

    #[test]
    fn test_equal_times_keep_insertion_order() {
        let mut queue = EventQueue::default();
        queue.insert(Duration::from_secs(5), "first");
        queue.insert(Duration::from_secs(5), "second");
        queue.insert(Duration::from_secs(5), "third");

        assert_eq!(queue.pop_first(), Some((Duration::from_secs(5), "first")));
        assert_eq!(queue.pop_first(), Some((Duration::from_secs(5), "second")));
        assert_eq!(queue.pop_first(), Some((Duration::from_secs(5), "third")));
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut queue = EventQueue::default();
        assert_eq!(queue.peek(), None);
        assert_eq!(queue.next_time(), None);

        queue.insert(Duration::from_secs(2), 7);
        assert_eq!(queue.peek(), Some((Duration::from_secs(2), &7)));
        assert_eq!(queue.next_time(), Some(Duration::from_secs(2)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_remove_by_key() {
        let mut queue = EventQueue::default();
        let a = queue.insert(Duration::from_secs(1), "a");
        let b = queue.insert(Duration::from_secs(1), "b");
        queue.insert(Duration::from_secs(2), "c");

        assert_eq!(queue.remove(b), Some("b"));
        assert_eq!(queue.remove(b), None);
        assert_eq!(queue.remove(a), Some("a"));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_first(), Some((Duration::from_secs(2), "c")));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_stale_key_never_aliases_new_entry() {
        let mut queue = EventQueue::default();
        let key = queue.insert(Duration::from_secs(1), "old");
        assert_eq!(queue.remove(key), Some("old"));

        // A later entry at the same time gets a fresh sequence number.
        queue.insert(Duration::from_secs(1), "new");
        assert_eq!(queue.remove(key), None);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_key_reports_scheduled_time() {
        let mut queue = EventQueue::default();
        let key = queue.insert(Duration::from_secs(9), ());
        assert_eq!(key.when(), Duration::from_secs(9));
    }
}
