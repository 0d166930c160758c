//! Drain coordination for in-flight enrichment tasks.
//!
//! The coordinator tracks the count of outstanding background tasks — the
//! only state shared across them — and lets the host process block at
//! shutdown until the count reaches zero or a deadline elapses. Tasks
//! still running past the deadline are abandoned; their eventual
//! persistence write may or may not land (the accepted at-most-once
//! window).

use std::{
  sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use tokio::sync::Notify;

/// Counting coordinator for outstanding enrichment tasks.
///
/// Cheap to clone; all clones share one counter.
#[derive(Clone, Default)]
pub struct DrainCoordinator {
  inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
  outstanding: AtomicUsize,
  drained:     Notify,
}

impl DrainCoordinator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register one task. The returned guard deregisters on drop, so a
  /// panicking task still completes its registration.
  pub fn register(&self) -> DrainGuard {
    self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
    DrainGuard { inner: Arc::clone(&self.inner) }
  }

  /// The number of tasks currently registered.
  pub fn outstanding(&self) -> usize {
    self.inner.outstanding.load(Ordering::Acquire)
  }

  /// Block until the counter reaches zero or `deadline` elapses. Returns
  /// `true` if fully drained, `false` if tasks were abandoned.
  pub async fn wait_for_drain(&self, deadline: Duration) -> bool {
    tokio::time::timeout(deadline, async {
      loop {
        // `notify_waiters` only wakes futures that are already
        // registered, which `Notified` does on first poll, not on
        // creation. Register via `enable` before loading the counter so
        // a guard dropped between the load and the await still wakes us.
        let drained = self.inner.drained.notified();
        tokio::pin!(drained);
        drained.as_mut().enable();
        if self.inner.outstanding.load(Ordering::Acquire) == 0 {
          return;
        }
        drained.await;
      }
    })
    .await
    .is_ok()
  }
}

/// Live registration of one enrichment task.
pub struct DrainGuard {
  inner: Arc<Inner>,
}

impl Drop for DrainGuard {
  fn drop(&mut self) {
    if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
      self.inner.drained.notify_waiters();
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn drains_immediately_with_no_tasks() {
    let drain = DrainCoordinator::new();
    assert!(drain.wait_for_drain(Duration::from_millis(1)).await);
    assert_eq!(drain.outstanding(), 0);
  }

  #[tokio::test]
  async fn deadline_elapses_while_tasks_are_outstanding() {
    let drain = DrainCoordinator::new();
    let _g1 = drain.register();
    let _g2 = drain.register();
    let _g3 = drain.register();

    assert!(!drain.wait_for_drain(Duration::from_millis(20)).await);
    assert_eq!(drain.outstanding(), 3);
  }

  #[tokio::test]
  async fn drains_once_all_guards_drop() {
    let drain = DrainCoordinator::new();

    for _ in 0..4 {
      let guard = drain.register();
      tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(guard);
      });
    }

    assert!(drain.wait_for_drain(Duration::from_secs(5)).await);
    assert_eq!(drain.outstanding(), 0);
  }

  // Exercises the window between the waiter's counter load and its first
  // poll of the notification: the last guard dropping inside that window
  // must still wake the waiter rather than leaving it parked until the
  // deadline.
  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn concurrent_final_drop_always_wakes_the_waiter() {
    for _ in 0..200 {
      let drain = DrainCoordinator::new();
      let guard = drain.register();

      let dropper = tokio::spawn(async move {
        drop(guard);
      });

      assert!(drain.wait_for_drain(Duration::from_secs(5)).await);
      dropper.await.unwrap();
      assert_eq!(drain.outstanding(), 0);
    }
  }

  #[tokio::test]
  async fn guard_dropped_by_a_panicking_task_still_deregisters() {
    let drain = DrainCoordinator::new();

    let guard = drain.register();
    let handle = tokio::spawn(async move {
      let _guard = guard;
      panic!("task failure");
    });
    assert!(handle.await.is_err());

    assert!(drain.wait_for_drain(Duration::from_secs(1)).await);
  }
}
