use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

/// Windows are pruned once this many callers are tracked.
const PRUNE_THRESHOLD: usize = 1024;

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window write limit per caller: at most `limit` writes in each
/// `window`, counted from the caller's first write in that window.
pub struct WriteLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<Uuid, Window>>,
}

impl WriteLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one write for `user`. Returns false when over the limit.
    pub async fn try_acquire(&self, user: Uuid) -> bool {
        self.try_acquire_at(user, Instant::now()).await
    }

    async fn try_acquire_at(&self, user: Uuid, now: Instant) -> bool {
        let mut windows = self.windows.lock().await;

        if windows.len() >= PRUNE_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < self.window);
        }

        let w = windows.entry(user).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(w.started) >= self.window {
            w.started = now;
            w.count = 0;
        }

        if w.count >= self.limit {
            return false;
        }
        w.count += 1;
        true
    }
}
