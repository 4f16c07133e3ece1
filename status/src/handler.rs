//! One `StatusEventHandler` per status channel (speech, utterance, spinner).
//! Each owns a bounded work queue drained by a dedicated task, and an
//! independent reset timer: if no new event arrives within the handler's
//! timeout, a reset action fires automatically.

use log::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

const QUEUE_CAPACITY: usize = 100;

pub type StatusAction = Arc<dyn Fn(&str, &serde_json::Value) + Send + Sync>;
pub type ResetAction = Arc<dyn Fn() + Send + Sync>;

struct Job {
    event_name: String,
    data: serde_json::Value,
    /// Reset timeout to arm after this job runs. `None` leaves the existing
    /// timer untouched.
    timeout: Option<Duration>,
    /// How long the worker sleeps before picking up the next job, so a
    /// status stays visible for roughly the time it takes to read/say it.
    persistence: Duration,
}

#[derive(Clone)]
pub struct StatusEventHandler {
    sender: mpsc::Sender<Job>,
    generation: Arc<AtomicU64>,
}

impl StatusEventHandler {
    pub fn spawn(default_timeout: Duration, action: StatusAction, reset_action: ResetAction) -> Self {
        let (sender, mut receiver) = mpsc::channel::<Job>(QUEUE_CAPACITY);
        let generation = Arc::new(AtomicU64::new(0));
        let worker_generation = Arc::clone(&generation);

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                action(&job.event_name, &job.data);
                let timeout = job.timeout.unwrap_or(default_timeout);
                arm_reset_timer(&worker_generation, timeout, Arc::clone(&reset_action));
                sleep(job.persistence).await;
            }
        });

        Self { sender, generation }
    }

    /// Queue an event for this handler. Drops (and logs) if the queue is
    /// saturated rather than blocking the caller.
    pub fn enqueue(&self, event_name: impl Into<String>, data: serde_json::Value, timeout: Option<Duration>, persistence: Duration) {
        let job = Job {
            event_name: event_name.into(),
            data,
            timeout,
            persistence,
        };
        if self.sender.try_send(job).is_err() {
            warn!("status handler queue full, dropping event");
        }
    }

    /// Re-arm the reset timer directly, without going through the job queue
    /// (used for spinner timeout adjustments that don't carry a new event).
    pub fn reset_timer(&self, timeout: Duration, reset_action: ResetAction) {
        arm_reset_timer(&self.generation, timeout, reset_action);
    }
}

fn arm_reset_timer(generation: &Arc<AtomicU64>, timeout: Duration, reset_action: ResetAction) {
    let my_generation = generation.fetch_add(1, Ordering::SeqCst) + 1;
    let generation = Arc::clone(generation);
    tokio::spawn(async move {
        sleep(timeout).await;
        // Only fire if nothing re-armed the timer while we slept.
        if generation.load(Ordering::SeqCst) == my_generation {
            reset_action();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[tokio::test]
    async fn reset_fires_after_timeout_without_new_events() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = Arc::clone(&fired);
        let handler = StatusEventHandler::spawn(
            Duration::from_millis(20),
            Arc::new(|_, _| {}),
            Arc::new(move || fired_clone.store(true, Ordering::SeqCst)),
        );
        handler.enqueue("wakeword", serde_json::json!({}), None, Duration::from_millis(0));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn new_event_supersedes_pending_reset() {
        let fire_count = Arc::new(AtomicU64::new(0));
        let count_clone = Arc::clone(&fire_count);
        let handler = StatusEventHandler::spawn(
            Duration::from_millis(30),
            Arc::new(|_, _| {}),
            Arc::new(move || {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        handler.enqueue("a", serde_json::json!({}), None, Duration::from_millis(0));
        tokio::time::sleep(Duration::from_millis(10)).await;
        handler.enqueue("b", serde_json::json!({}), None, Duration::from_millis(0));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fire_count.load(Ordering::SeqCst), 1);
    }
}
