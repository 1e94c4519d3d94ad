//! Fixed-rate cooperative render loop. The only place it waits is the sleep
//! until the next tick's deadline, and cancellation is a shared flag checked
//! once per iteration.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> CancelFlag {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tick {
    pub index: u64,
    pub started: Instant,
}

#[derive(Debug, Clone)]
pub struct TickLoop {
    period: Duration,
    cancel: CancelFlag,
}

impl TickLoop {
    pub fn new(period: Duration) -> TickLoop {
        TickLoop { period, cancel: CancelFlag::new() }
    }

    /// Loop ticking `rate` times per second.
    pub fn with_rate(rate: f64) -> TickLoop {
        TickLoop::new(Duration::new(1, 0).div_f64(rate.max(1e-3)))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Call `tick` once per period until it breaks or the flag is raised.
    /// Returns the number of ticks run.
    pub fn run<F>(&self, mut tick: F) -> u64
    where
        F: FnMut(Tick) -> ControlFlow<()>,
    {
        let mut index = 0u64;
        while !self.cancel.is_cancelled() {
            let started = Instant::now();
            let deadline = started + self.period;
            let flow = tick(Tick { index, started });
            index += 1;
            if flow.is_break() {
                break;
            }

            let wait = deadline.saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }
        debug!(ticks = index, "tick loop stopped");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_stops_the_loop() {
        let ticker = TickLoop::new(Duration::from_micros(10));
        let ran = ticker.run(|tick| {
            if tick.index == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(ran, 5);
    }

    #[test]
    fn raised_flag_stops_before_the_next_tick() {
        let ticker = TickLoop::new(Duration::from_micros(10));
        let flag = ticker.cancel_flag();
        let ran = ticker.run(|tick| {
            if tick.index == 2 {
                flag.cancel();
            }
            ControlFlow::Continue(())
        });
        assert_eq!(ran, 3);

        // Already cancelled: nothing runs.
        assert_eq!(ticker.run(|_| ControlFlow::Continue(())), 0);
    }

    #[test]
    fn keeps_to_the_period() {
        let ticker = TickLoop::with_rate(200.0);
        assert_eq!(ticker.period(), Duration::from_millis(5));
        let begin = Instant::now();
        ticker.run(|tick| if tick.index == 3 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) });
        assert!(begin.elapsed() >= Duration::from_millis(15));
    }
}
