use geometry_cometry::timers::TimerQueue;

#[test]
fn dispatch_due_returns_expired_in_time_order() {
    let mut q = TimerQueue::new();
    q.schedule(0, 300, 'a');
    q.schedule(0, 100, 'b');
    q.schedule(0, 200, 'c');

    assert_eq!(q.dispatch_due(250), vec!['b', 'c']);
    assert_eq!(q.len(), 1);
    assert_eq!(q.next_due(), Some(300));
}

#[test]
fn due_time_is_inclusive() {
    let mut q = TimerQueue::new();
    q.schedule(50, 50, 1);
    assert!(q.dispatch_due(99).is_empty());
    assert_eq!(q.dispatch_due(100), vec![1]);
    assert!(q.is_empty());
}

#[test]
fn equal_due_times_keep_schedule_order() {
    let mut q = TimerQueue::new();
    for n in 1..=4 {
        q.schedule(10, 90, n);
    }
    assert_eq!(q.dispatch_due(100), vec![1, 2, 3, 4]);
}

#[test]
fn flush_all_is_most_recent_first() {
    let mut q = TimerQueue::new();
    q.schedule(0, 500, "first");
    q.schedule(0, 100, "second");
    q.schedule(0, 300, "third");

    assert_eq!(q.flush_all(), vec!["third", "second", "first"]);
    assert!(q.is_empty());
    assert_eq!(q.next_due(), None);
}

#[test]
fn cancel_removes_only_pending_entries() {
    let mut q = TimerQueue::new();
    let keep = q.schedule(0, 100, "keep");
    let drop = q.schedule(0, 100, "drop");

    assert!(q.cancel(drop));
    assert!(!q.cancel(drop));
    assert_eq!(q.dispatch_due(100), vec!["keep"]);
    // Already fired.
    assert!(!q.cancel(keep));
}

#[test]
fn find_matches_pending_events() {
    let mut q = TimerQueue::new();
    q.schedule(0, 10, 1);
    q.schedule(0, 20, 2);
    q.schedule(0, 30, 1);
    let ones = q.find(|n| *n == 1);
    assert_eq!(ones.len(), 2);
    for handle in ones {
        assert!(q.cancel(handle));
    }
    assert_eq!(q.flush_all(), vec![2]);
}

#[test]
fn scheduling_from_a_dispatched_batch_waits_for_next_call() {
    let mut q = TimerQueue::new();
    q.schedule(0, 100, 0u32);
    for n in q.dispatch_due(100) {
        // Zero delay: due right now, but not part of this batch.
        q.schedule(100, 0, n + 1);
    }
    assert_eq!(q.len(), 1);
    assert_eq!(q.dispatch_due(100), vec![1]);
}
