//! Bounded-queue, single-worker decorator giving any [`Agent`] its own
//! independent execution context

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex as PlMutex;

use super::agent::Agent;
use super::message::Message;
use super::topic::AgentHandle;

/// Recommended bound for `close()`'s drain wait.
const CLOSE_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Minimum queue capacity regardless of input count.
const MIN_CAPACITY: usize = 10;

/// Capacity multiplier per input topic.
const CAPACITY_PER_INPUT: usize = 5;

/// Capacity policy used by the configuration loader: `max(10, 5 * input_count)`.
pub fn capacity_for_input_count(input_count: usize) -> usize {
    MIN_CAPACITY.max(CAPACITY_PER_INPUT * input_count)
}

enum WorkItem {
    Message(String, Message),
    Stop,
}

/// Decorates an agent with a bounded FIFO work queue and a single dedicated
/// worker thread that serialises delivery into the inner agent.
///
/// States: *running* (initial — worker started in the constructor),
/// *stopping* (after `close()` signals the worker), *stopped* (worker has
/// exited, queue drained). `on_message` enqueues and blocks the caller when
/// the queue is full, providing backpressure toward publishers. `reset()`
/// runs on the caller's thread directly — the inner agent lives behind a
/// lock shared with the worker, so a reset racing with an in-flight
/// `on_message` call is serialised but not otherwise ordered with respect
/// to the queue; callers needing atomicity must externally quiesce.
pub struct ParallelAgent {
    name: String,
    sender: Sender<WorkItem>,
    worker: StdMutex<Option<std::thread::JoinHandle<()>>>,
    stopping: AtomicBool,
    inner: Arc<PlMutex<Box<dyn Agent>>>,
}

impl ParallelAgent {
    /// Wrap `inner` with a bounded queue of the given `capacity` and start
    /// its dedicated worker thread.
    pub fn new(inner: Box<dyn Agent>, capacity: usize) -> Arc<Self> {
        let name = inner.name().to_string();
        let capacity = capacity.max(1);
        let (tx, rx): (Sender<WorkItem>, Receiver<WorkItem>) = channel::bounded(capacity);
        let inner = Arc::new(PlMutex::new(inner));

        let worker_inner = inner.clone();
        let handle = std::thread::spawn(move || Self::run_worker(rx, worker_inner));

        Arc::new(Self {
            name,
            sender: tx,
            worker: StdMutex::new(Some(handle)),
            stopping: AtomicBool::new(false),
            inner,
        })
    }

    fn run_worker(rx: Receiver<WorkItem>, inner: Arc<PlMutex<Box<dyn Agent>>>) {
        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(WorkItem::Message(topic, msg)) => {
                    inner.lock().on_message(&topic, &msg);
                }
                Ok(WorkItem::Stop) => break,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    /// Sets *stopping*, signals the worker, waits up to [`CLOSE_DRAIN_TIMEOUT`]
    /// for it to drain the queue and exit, then closes the inner agent.
    pub fn close(&self) {
        if self.stopping.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.sender.send(WorkItem::Stop);

        let handle = self.worker.lock().unwrap().take();
        if let Some(handle) = handle {
            let (done_tx, done_rx) = channel::bounded::<()>(1);
            std::thread::spawn(move || {
                let _ = handle.join();
                let _ = done_tx.send(());
            });
            if done_rx.recv_timeout(CLOSE_DRAIN_TIMEOUT).is_err() {
                tracing::warn!(
                    agent = %self.name,
                    "ParallelAgent close did not drain within the recommended bound"
                );
            }
        }
        self.inner.lock().close();
    }
}

impl AgentHandle for ParallelAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&self) {
        self.inner.lock().reset();
    }

    fn on_message(&self, topic_name: &str, message: &Message) {
        if self.stopping.load(Ordering::SeqCst) {
            return;
        }
        // Blocking send provides the spec's backpressure guarantee: the
        // caller blocks until space frees up in the bounded queue.
        let _ = self
            .sender
            .send(WorkItem::Message(topic_name.to_string(), message.clone()));
    }

    fn close(&self) {
        ParallelAgent::close(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operators::IncAgent;
    use std::sync::Mutex;

    fn inc_agent() -> (Box<dyn Agent>, Arc<Mutex<Vec<(String, f64)>>>) {
        let log: Arc<Mutex<Vec<(String, f64)>>> = Arc::new(Mutex::new(Vec::new()));
        let log2 = log.clone();
        let publish = Box::new(move |topic: &str, msg: Message| {
            log2.lock().unwrap().push((topic.to_string(), msg.num()));
        });
        let agent = IncAgent::new(&["X".to_string()], &["Y".to_string()], publish);
        (Box::new(agent), log)
    }

    #[test]
    fn capacity_policy_matches_spec() {
        assert_eq!(capacity_for_input_count(0), 10);
        assert_eq!(capacity_for_input_count(1), 10);
        assert_eq!(capacity_for_input_count(3), 15);
        assert_eq!(capacity_for_input_count(10), 50);
    }

    #[test]
    fn delivers_messages_in_order_and_closes_cleanly() {
        let (inner, log) = inc_agent();
        let wrapped = ParallelAgent::new(inner, capacity_for_input_count(1));
        let handle: Arc<dyn AgentHandle> = wrapped.clone();

        for n in 0..5 {
            handle.on_message("X", &Message::from_num(n as f64));
        }
        handle.close();

        let seen = log.lock().unwrap();
        let values: Vec<f64> = seen.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn capacity_of_one_still_serialises() {
        let (inner, log) = inc_agent();
        let wrapped = ParallelAgent::new(inner, 1);
        let handle: Arc<dyn AgentHandle> = wrapped.clone();

        for n in 0..3 {
            handle.on_message("X", &Message::from_num(n as f64));
        }
        handle.close();

        let values: Vec<f64> = log.lock().unwrap().iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn double_close_is_idempotent() {
        let (inner, _log) = inc_agent();
        let wrapped = ParallelAgent::new(inner, 10);
        wrapped.close();
        wrapped.close();
    }
}
