use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    pending: bool,
    handle: Option<JoinHandle<()>>,
}

/// Cancellable single-shot timer. Each `call` supersedes the previous one,
/// so only the action armed last runs, `delay` after it was armed.
///
/// `call` spawns onto the current tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
}

/// Claims the slot for generation `gen`. False when a later `call` or a
/// `cancel` has superseded it; the pending flag then belongs to that caller.
fn settle(slot: &Mutex<Slot>, gen: u64) -> bool {
    let mut slot = slot.lock();
    if slot.generation != gen {
        return false;
    }
    slot.pending = false;
    slot.handle = None;
    true
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, slot: Arc::new(Mutex::new(Slot::default())) }
    }

    pub fn delay(&self) -> Duration { self.delay }

    pub fn call<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        slot.pending = true;
        let gen = slot.generation;

        let shared = Arc::clone(&self.slot);
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if settle(&shared, gen) {
                action();
            }
        });

        if let Some(prev) = slot.handle.replace(task) {
            prev.abort();
        }
    }

    pub fn cancel(&self) {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        slot.pending = false;
        if let Some(prev) = slot.handle.take() {
            prev.abort();
        }
    }

    pub fn is_pending(&self) -> bool { self.slot.lock().pending }
}

impl Drop for Debouncer {
    fn drop(&mut self) { self.cancel(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{advance, sleep};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        (hits, move || {
            let h = Arc::clone(&h);
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }) as Box<dyn FnOnce() + Send>
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiet_period() {
        let d = Debouncer::new(Duration::from_millis(300));
        let (hits, action) = counter();

        for _ in 0..5 {
            d.call(action());
            sleep(Duration::from_millis(100)).await;
        }
        assert!(d.is_pending());
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        // last call was 100ms ago
        sleep(Duration::from_millis(199)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!d.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_calls_each_fire() {
        let d = Debouncer::new(Duration::from_millis(300));
        let (hits, action) = counter();

        d.call(action());
        sleep(Duration::from_millis(350)).await;
        d.call(action());
        sleep(Duration::from_millis(350)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_action() {
        let d = Debouncer::new(Duration::from_millis(300));
        let (hits, action) = counter();

        d.call(action());
        d.cancel();
        assert!(!d.is_pending());
        advance(Duration::from_secs(1)).await;
        sleep(Duration::from_millis(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_cannot_clear_newer_call() {
        let d = Debouncer::new(Duration::from_millis(300));
        let (hits, action) = counter();

        d.call(action());
        let stale = d.slot.lock().generation;
        d.call(action());
        let current = d.slot.lock().generation;

        // the first timer woke up just as the second call landed
        assert!(!settle(&d.slot, stale));
        assert!(d.is_pending());

        assert_eq!(current, stale + 1);

        sleep(Duration::from_millis(301)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!d.is_pending());
    }
}
