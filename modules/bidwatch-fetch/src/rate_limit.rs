// Per-adapter sliding-window rate limiter.
//
// Each adapter owns a deque of request instants behind an async mutex. The mutex
// is held across the wait, so callers for one adapter are admitted in arrival
// order and the ceiling holds no matter how many callers are queued.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::adapters::RateLimit;

type Window = Arc<tokio::sync::Mutex<VecDeque<Instant>>>;

#[derive(Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for a slot under `limit` and record the request. Returns how long
    /// the caller was held back.
    pub async fn acquire(&self, key: &str, limit: RateLimit) -> Duration {
        let window = self.window(key);
        let max_requests = limit.max_requests.max(1);
        let started = Instant::now();

        let mut stamps = window.lock().await;
        loop {
            let now = Instant::now();
            prune(&mut stamps, now, limit.time_window);

            if stamps.len() < max_requests {
                stamps.push_back(now);
                return now.duration_since(started);
            }

            let Some(&oldest) = stamps.front() else {
                continue;
            };
            let wait = (oldest + limit.time_window).saturating_duration_since(now);
            info!(
                adapter = key,
                wait_ms = wait.as_millis() as u64,
                max_requests,
                "Rate limit reached, waiting"
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Requests recorded for `key` inside the current window.
    pub async fn in_window(&self, key: &str, time_window: Duration) -> usize {
        let window = self.window(key);
        let mut stamps = window.lock().await;
        prune(&mut stamps, Instant::now(), time_window);
        stamps.len()
    }

    fn window(&self, key: &str) -> Window {
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");
        windows.entry(key.to_string()).or_default().clone()
    }
}

fn prune(stamps: &mut VecDeque<Instant>, now: Instant, time_window: Duration) {
    while let Some(&front) = stamps.front() {
        if now.duration_since(front) >= time_window {
            stamps.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(max_requests: usize, secs: u64) -> RateLimit {
        RateLimit {
            max_requests,
            time_window: Duration::from_secs(secs),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn under_limit_does_not_wait() {
        let limiter = RateLimiter::new();
        for _ in 0..3 {
            assert_eq!(limiter.acquire("cardhobby", limit(3, 60)).await, Duration::ZERO);
        }
        assert_eq!(limiter.in_window("cardhobby", Duration::from_secs(60)).await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn over_limit_waits_for_oldest_to_expire() {
        let limiter = RateLimiter::new();
        limiter.acquire("cardhobby", limit(2, 60)).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        limiter.acquire("cardhobby", limit(2, 60)).await;

        let started = Instant::now();
        let waited = limiter.acquire("cardhobby", limit(2, 60)).await;

        // Oldest stamp is 10s old, so 50s remain in its window.
        assert!(waited >= Duration::from_secs(50));
        assert!(started.elapsed() >= Duration::from_secs(50));
        assert!(started.elapsed() < Duration::from_secs(51));
    }

    #[tokio::test(start_paused = true)]
    async fn windows_are_per_adapter() {
        let limiter = RateLimiter::new();
        limiter.acquire("a", limit(1, 60)).await;
        assert_eq!(limiter.acquire("b", limit(1, 60)).await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_callers_are_admitted_in_order() {
        let limiter = Arc::new(RateLimiter::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..4 {
            let limiter = limiter.clone();
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire("cardhobby", limit(1, 5)).await;
                order.lock().unwrap().push(i);
            }));
            // Let each task reach the limiter before spawning the next.
            tokio::task::yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
