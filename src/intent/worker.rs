//! Intent worker pool
//!
//! Independent workers pulling intents off the shared channel in
//! parallel. No ordering exists across distinct keys; per-key safety
//! comes entirely from the idempotency gate and the version-checked
//! ledger commit.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::channel::IntentReceiver;
use super::consumer::IntentConsumer;

pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` consumer tasks over the receiver
    pub fn spawn(consumer: Arc<IntentConsumer>, receiver: IntentReceiver, workers: usize) -> Self {
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..workers)
            .map(|worker_id| {
                let consumer = consumer.clone();
                let receiver = receiver.clone();

                tokio::spawn(async move {
                    info!(worker_id, "Intent worker started");
                    loop {
                        // Hold the lock only while waiting for the next
                        // intent, never while processing one.
                        let intent = { receiver.lock().await.recv().await };
                        let Some(intent) = intent else { break };

                        match consumer.process(&intent).await {
                            Ok(outcome) => {
                                debug!(worker_id, key = %intent.key, %outcome, "Intent resolved");
                            }
                            Err(e) => {
                                error!(
                                    worker_id,
                                    key = %intent.key,
                                    error = %e,
                                    "Intent processing failed - awaiting redelivery"
                                );
                            }
                        }
                    }
                    info!(worker_id, "Intent worker stopped");
                })
            })
            .collect();

        Self { handles }
    }

    /// Wait for all workers to drain and exit (channel closed)
    pub async fn join(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}
