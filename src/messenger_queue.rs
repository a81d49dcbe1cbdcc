//! Round-robin drain of every session's messenger.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use tracing::{error, info};

use crate::messenger::Messenger;

/// Fairness scheduler: each tick takes up to `batch_size` messengers from the
/// front of the rotation, moves them to the back, and lets each apply one
/// queued update.
pub struct MessengerQueue {
    rotation: Mutex<VecDeque<Arc<Messenger>>>,
    batch_size: usize,
    period: Duration,
    stopped: AtomicBool,
}

impl MessengerQueue {
    pub fn new(batch_size: usize, period_ms: u64) -> Self {
        Self {
            rotation: Mutex::new(VecDeque::new()),
            batch_size: batch_size.max(1),
            period: Duration::from_millis(period_ms),
            stopped: AtomicBool::new(false),
        }
    }

    /// Add a messenger to the back of the rotation. Known chats are ignored.
    pub fn register(&self, messenger: Arc<Messenger>) {
        let mut rotation = self.rotation.lock().unwrap_or_else(|e| e.into_inner());
        if rotation.iter().any(|m| m.chat_id() == messenger.chat_id()) {
            return;
        }
        rotation.push_back(messenger);
    }

    pub fn messenger_count(&self) -> usize {
        self.rotation.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Chat ids in rotation order.
    pub fn order(&self) -> Vec<i64> {
        self.rotation
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|m| m.chat_id())
            .collect()
    }

    /// Run one round. Returns how many messengers applied an update.
    pub async fn tick(&self) -> usize {
        let batch: Vec<Arc<Messenger>> = {
            let mut rotation = self.rotation.lock().unwrap_or_else(|e| e.into_inner());
            let take = rotation.len().min(self.batch_size);
            let mut batch = Vec::with_capacity(take);
            for _ in 0..take {
                if let Some(m) = rotation.pop_front() {
                    rotation.push_back(m.clone());
                    batch.push(m);
                }
            }
            batch
        };

        let results = join_all(batch.iter().map(|m| m.process_message())).await;

        let mut applied = 0;
        for (messenger, result) in batch.iter().zip(results) {
            match result {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(e) => error!("messenger for chat {} failed: {e}", messenger.chat_id()),
            }
        }
        applied
    }

    /// Tick until [`stop`](Self::stop) is called.
    pub async fn run(self: Arc<Self>) {
        info!(
            "messenger queue started (batch {}, period {:?})",
            self.batch_size, self.period
        );
        while !self.stopped.load(Ordering::Relaxed) {
            self.tick().await;
            tokio::time::sleep(self.period).await;
        }
        info!("messenger queue stopped");
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }
}
