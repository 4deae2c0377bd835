/// Delayed one-shot events ordered by expiry time.
///
/// Entries are kept sorted by `(due, seq)`, so equal due times dispatch in
/// the order they were scheduled. The queue only hands events back; the
/// owner applies them, which lets an applied event schedule new entries
/// without those entries joining the batch being dispatched.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    due: u64,
    seq: u64,
    event: T,
}

#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        TimerQueue {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to fire `delay` ms after `now`.
    pub fn schedule(&mut self, now: u64, delay: u64, event: T) -> TimerHandle {
        let due = now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        let at = self
            .entries
            .partition_point(|e| (e.due, e.seq) <= (due, seq));
        self.entries.insert(at, Entry { due, seq, event });
        TimerHandle(seq)
    }

    /// Pop every entry due at or before `now`, earliest first.
    pub fn dispatch_due(&mut self, now: u64) -> Vec<T> {
        let split = self.entries.partition_point(|e| e.due <= now);
        self.entries.drain(..split).map(|e| e.event).collect()
    }

    /// Pop everything regardless of due time, most recently scheduled first.
    pub fn flush_all(&mut self) -> Vec<T> {
        let mut drained: Vec<Entry<T>> = self.entries.drain(..).collect();
        drained.sort_by(|a, b| b.seq.cmp(&a.seq));
        drained.into_iter().map(|e| e.event).collect()
    }

    /// Drop a pending entry. Returns false if it already fired or was never
    /// scheduled here.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.entries.iter().position(|e| e.seq == handle.0) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn next_due(&self) -> Option<u64> {
        self.entries.first().map(|e| e.due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handles of pending entries matching `pred`, in dispatch order.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Vec<TimerHandle> {
        self.entries
            .iter()
            .filter(|e| pred(&e.event))
            .map(|e| TimerHandle(e.seq))
            .collect()
    }
}
