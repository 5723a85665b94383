// Debounce utilities built on cancellable tokio timers
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Owns at most one delayed task. Scheduling a new task aborts the pending one.
#[derive(Debug, Default)]
pub struct CancellableTimer {
    pending: Option<JoinHandle<()>>,
}

impl CancellableTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay` unless cancelled or replaced first.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        }));
    }

    /// Abort the pending task. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CancellableTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Publishes a value only after `delay` has passed without a newer one.
///
/// Clearing is not delayed: `push(None)` cancels any pending value and
/// empties the output at once. Subscribers observe the settled value through
/// a `watch` channel.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    timer: CancellableTimer,
    generation: Arc<AtomicU64>,
    /// Last generation that was published or cleared.
    settled: Arc<AtomicU64>,
    output: Arc<watch::Sender<Option<T>>>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            delay,
            timer: CancellableTimer::new(),
            generation: Arc::new(AtomicU64::new(0)),
            settled: Arc::new(AtomicU64::new(0)),
            output: Arc::new(tx),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.output.subscribe()
    }

    /// The currently published value.
    pub fn current(&self) -> Option<T> {
        self.output.borrow().clone()
    }

    /// Whether a pushed value is still waiting to be published.
    pub fn is_pending(&self) -> bool {
        self.generation.load(Ordering::SeqCst) != self.settled.load(Ordering::SeqCst)
    }

    pub fn push(&mut self, value: Option<T>) {
        match value {
            Some(value) => self.schedule(value),
            None => self.clear(),
        }
    }

    pub fn clear(&mut self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.settled.store(generation, Ordering::SeqCst);
        self.timer.cancel();
        self.output.send_if_modified(|current| current.take().is_some());
    }

    fn schedule(&mut self, value: T) {
        // A timer that already fired but lost the race with a newer push or
        // clear must not publish its stale value.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.generation);
        let settled = Arc::clone(&self.settled);
        let output = Arc::clone(&self.output);

        self.timer.schedule(self.delay, move || {
            output.send_if_modified(|current| {
                if latest.load(Ordering::SeqCst) != generation {
                    return false;
                }
                // Stored before receivers are notified.
                settled.store(generation, Ordering::SeqCst);
                *current = Some(value);
                true
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use tokio::time::sleep;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let mut timer = CancellableTimer::new();
        timer.schedule(ms(50), move || flag.store(true, Ordering::SeqCst));

        assert!(timer.is_pending());
        sleep(ms(49)).await;
        assert!(!fired.load(Ordering::SeqCst));
        sleep(ms(2)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_cancel() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let mut timer = CancellableTimer::new();
        timer.schedule(ms(50), move || flag.store(true, Ordering::SeqCst));

        assert!(timer.cancel());
        assert!(!timer.cancel());
        sleep(ms(100)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_reschedule_replaces_pending() {
        let count = Arc::new(AtomicU64::new(0));
        let mut timer = CancellableTimer::new();
        for _ in 0..3 {
            let count = Arc::clone(&count);
            timer.schedule(ms(50), move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
            sleep(ms(10)).await;
        }
        sleep(ms(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_cancels() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        {
            let mut timer = CancellableTimer::new();
            timer.schedule(ms(50), move || flag.store(true, Ordering::SeqCst));
        }
        sleep(ms(100)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_published_after_quiescence() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);
        debouncer.push(Some(1));

        assert_eq!(debouncer.current(), None);
        sleep(ms(49)).await;
        assert_eq!(debouncer.current(), None);
        sleep(ms(2)).await;
        assert_eq!(debouncer.current(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_pushes_coalesce_to_last() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);
        let mut rx = debouncer.subscribe();

        for value in 1..=5 {
            debouncer.push(Some(value));
            sleep(ms(20)).await;
            assert_eq!(debouncer.current(), None);
        }

        sleep(ms(31)).await;
        assert_eq!(debouncer.current(), Some(5));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Some(5));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_is_immediate() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);
        debouncer.push(Some("a"));
        sleep(ms(60)).await;
        assert_eq!(debouncer.current(), Some("a"));

        debouncer.push(None);
        assert_eq!(debouncer.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_pending_value() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);
        debouncer.push(Some(7));
        sleep(ms(10)).await;
        debouncer.clear();
        assert!(!debouncer.is_pending());

        sleep(ms(100)).await;
        assert_eq!(debouncer.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_until_published() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);
        assert!(!debouncer.is_pending());

        debouncer.push(Some(3));
        assert!(debouncer.is_pending());
        sleep(ms(20)).await;
        debouncer.push(Some(4));
        assert!(debouncer.is_pending());

        let mut rx = debouncer.subscribe();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(4));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_on_empty_does_not_notify() {
        let mut debouncer: Debouncer<u8> = Debouncer::new(DEFAULT_DEBOUNCE);
        let rx = debouncer.subscribe();
        debouncer.clear();
        assert!(!rx.has_changed().unwrap());
    }
}
