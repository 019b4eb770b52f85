//! Simulated latency and randomness. Everything that "thinks" or "loads" in the dashboard
//! goes through these traits so tests can run instantly and deterministically.
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayWindow {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayWindow {
    pub const LOGIN: DelayWindow = DelayWindow::fixed(1500);
    pub const CHAT_REPLY: DelayWindow = DelayWindow::between(1000, 3000);
    pub const PHASE_SELECT: DelayWindow = DelayWindow::between(800, 1200);
    pub const DASHBOARD_RETURN: DelayWindow = DelayWindow::between(600, 900);
    pub const FILE_ANALYSIS: DelayWindow = DelayWindow::between(2000, 5000);

    pub const fn fixed(ms: u64) -> Self {
        Self { min_ms: ms, max_ms: ms }
    }

    pub const fn between(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }
}

#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits out one simulated delay.
    async fn pause(&self, window: DelayWindow);
}

/// Sleeps for a uniformly random duration inside the window.
#[derive(Debug, Default, Clone)]
pub struct RandomPacer;

#[async_trait]
impl Pacer for RandomPacer {
    async fn pause(&self, window: DelayWindow) {
        let ms = if window.max_ms > window.min_ms {
            rand::thread_rng().gen_range(window.min_ms..=window.max_ms)
        } else {
            window.min_ms
        };
        tracing::debug!("Simulated delay of {}ms", ms);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Used when `SIMULATED_LATENCY=off` and in tests.
#[derive(Debug, Default, Clone)]
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn pause(&self, _window: DelayWindow) {
        tokio::task::yield_now().await;
    }
}

pub trait RandomSource: Send + Sync {
    /// Uniform integer in `0..upper`; `upper == 0` yields 0.
    fn below(&self, upper: u32) -> u32;
    /// True with the given probability.
    fn chance(&self, probability: f64) -> bool;
}

#[derive(Debug, Default, Clone)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..upper)
    }

    fn chance(&self, probability: f64) -> bool {
        rand::thread_rng().gen_bool(probability.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
pub use scripted::{ScriptedPacer, ScriptedRandom};

#[cfg(test)]
mod scripted {
    use super::{DelayWindow, Pacer, RandomSource};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Sleeps for queued durations in call order, ignoring the window; zero once drained.
    #[derive(Debug, Default)]
    pub struct ScriptedPacer {
        delays_ms: Mutex<VecDeque<u64>>,
    }

    impl ScriptedPacer {
        pub fn new(delays_ms: &[u64]) -> Self {
            Self {
                delays_ms: Mutex::new(delays_ms.iter().copied().collect()),
            }
        }

        pub fn remaining(&self) -> usize {
            self.delays_ms.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Pacer for ScriptedPacer {
        async fn pause(&self, _window: DelayWindow) {
            let ms = self.delays_ms.lock().unwrap().pop_front().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    /// Replays queued values (each clamped below `upper`), then falls back to zero.
    #[derive(Debug, Default)]
    pub struct ScriptedRandom {
        values: Mutex<VecDeque<u32>>,
        fail: bool,
    }

    impl ScriptedRandom {
        pub fn new(values: &[u32]) -> Self {
            Self {
                values: Mutex::new(values.iter().copied().collect()),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                values: Mutex::default(),
                fail: true,
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn below(&self, upper: u32) -> u32 {
            let next = self.values.lock().unwrap().pop_front().unwrap_or(0);
            if upper == 0 {
                0
            } else {
                next.min(upper - 1)
            }
        }

        fn chance(&self, _probability: f64) -> bool {
            self.fail
        }
    }
}
