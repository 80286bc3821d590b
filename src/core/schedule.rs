use super::constants::{BUDGET_EWMA_ALPHA, BUDGET_WARN_INTERVAL_FRAMES, FRAME_BUDGET_MS};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Shared stop flag for a frame loop.
///
/// Clones observe the same flag. Loops check it at the top of every
/// iteration, so cancelling from inside a frame stops the following one.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Timing handed to each frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTime {
    pub index: u64,
    pub elapsed: Duration,
}

/// Fixed-rate frame driver on a virtual clock.
///
/// Stands in for the display refresh callback where there is no display:
/// frame `n` is reported at `n * interval` without sleeping.
#[derive(Clone, Copy, Debug)]
pub struct FixedRateDriver {
    pub interval: Duration,
}

impl Default for FixedRateDriver {
    fn default() -> Self {
        Self {
            interval: Duration::from_micros(16_667),
        }
    }
}

impl FixedRateDriver {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Run up to `max_frames` frames, stopping early once `token` is cancelled.
    /// Returns the number of frames executed.
    pub fn run(&self, token: &CancelToken, max_frames: u64, mut frame: impl FnMut(FrameTime)) -> u64 {
        let mut index = 0;
        while index < max_frames && !token.is_cancelled() {
            let elapsed = self.interval.saturating_mul(index.min(u32::MAX as u64) as u32);
            frame(FrameTime { index, elapsed });
            index += 1;
        }
        index
    }
}

/// Outcome of recording one frame against the budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetVerdict {
    Within,
    Over,
    /// Over budget and the rate limiter allowed a warning for it.
    OverReported,
}

/// Tracks update+draw time per frame against an explicit budget.
#[derive(Clone, Debug)]
pub struct FrameBudget {
    budget: Duration,
    frames: u64,
    over_budget: u64,
    avg_ms: f32,
    worst: Duration,
    last_report: Option<u64>,
}

impl Default for FrameBudget {
    fn default() -> Self {
        Self::new(Duration::from_secs_f32(FRAME_BUDGET_MS / 1000.0))
    }
}

impl FrameBudget {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            frames: 0,
            over_budget: 0,
            avg_ms: 0.0,
            worst: Duration::ZERO,
            last_report: None,
        }
    }

    pub fn record(&mut self, elapsed: Duration) -> BudgetVerdict {
        let ms = elapsed.as_secs_f32() * 1000.0;
        self.avg_ms = if self.frames == 0 {
            ms
        } else {
            (1.0 - BUDGET_EWMA_ALPHA) * self.avg_ms + BUDGET_EWMA_ALPHA * ms
        };
        self.worst = self.worst.max(elapsed);
        let frame = self.frames;
        self.frames += 1;

        if elapsed <= self.budget {
            return BudgetVerdict::Within;
        }
        self.over_budget += 1;
        let due = match self.last_report {
            None => true,
            Some(prev) => frame - prev >= BUDGET_WARN_INTERVAL_FRAMES,
        };
        if !due {
            return BudgetVerdict::Over;
        }
        self.last_report = Some(frame);
        log::warn!(
            "[budget] frame {} took {:.2}ms (budget {:.2}ms, avg {:.2}ms, {} over so far)",
            frame,
            ms,
            self.budget.as_secs_f32() * 1000.0,
            self.avg_ms,
            self.over_budget
        );
        BudgetVerdict::OverReported
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }

    #[inline]
    pub fn average_ms(&self) -> f32 {
        self.avg_ms
    }

    #[inline]
    pub fn worst(&self) -> Duration {
        self.worst
    }

    pub fn log_summary(&self) {
        log::info!(
            "[budget] {} frames, {} over {:.2}ms, avg {:.3}ms, worst {:.3}ms",
            self.frames,
            self.over_budget,
            self.budget.as_secs_f32() * 1000.0,
            self.avg_ms,
            self.worst.as_secs_f32() * 1000.0
        );
    }
}
