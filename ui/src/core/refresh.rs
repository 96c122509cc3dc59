//! Periodic chart refresh that pauses while the page is hidden.
//!
//! At most one cycle is live. Starting a cycle cancels the previous one by
//! dropping its oneshot sender, so a hidden→visible transition never leaves
//! an older timer running next to the new one.

use std::future::Future;

use futures::future::{self, Either};
use futures_channel::oneshot;

use crate::core::timing;

/// Auto-refresh period: five minutes.
pub const AUTO_REFRESH_MS: u64 = 5 * 60 * 1000;

#[derive(Debug, Default)]
pub struct RefreshSchedule {
    generation: u64,
    live: Option<LiveCycle>,
}

#[derive(Debug)]
struct LiveCycle {
    generation: u64,
    _cancel: oneshot::Sender<()>,
}

/// Handle given to the task that runs one refresh cycle.
#[derive(Debug)]
pub struct RefreshCycle {
    generation: u64,
    cancelled: oneshot::Receiver<()>,
}

impl RefreshCycle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl RefreshSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh cycle, cancelling any live one.
    pub fn start(&mut self) -> RefreshCycle {
        self.generation += 1;
        let (cancel, cancelled) = oneshot::channel();
        self.live = Some(LiveCycle {
            generation: self.generation,
            _cancel: cancel,
        });
        RefreshCycle {
            generation: self.generation,
            cancelled,
        }
    }

    pub fn stop(&mut self) {
        self.live = None;
    }

    /// Hidden stops the timer; visible starts exactly one new cycle.
    pub fn on_visibility(&mut self, visible: bool) -> Option<RefreshCycle> {
        if visible {
            Some(self.start())
        } else {
            self.stop();
            None
        }
    }

    pub fn is_live(&self, generation: u64) -> bool {
        self.live
            .as_ref()
            .is_some_and(|live| live.generation == generation)
    }

    pub fn live_cycles(&self) -> usize {
        usize::from(self.live.is_some())
    }
}

/// Drive `cycle`: wait `period_ms`, call `tick`, repeat until cancelled.
pub async fn run_cycle<F, Fut>(cycle: RefreshCycle, period_ms: u64, mut tick: F)
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = ()>,
{
    let RefreshCycle {
        generation,
        mut cancelled,
    } = cycle;

    loop {
        let sleep = Box::pin(timing::sleep_ms(period_ms));
        match future::select(sleep, &mut cancelled).await {
            Either::Left(((), _)) => tick(generation).await,
            Either::Right(_) => {
                tracing::debug!(generation, "auto-refresh cycle cancelled");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_then_visible_leaves_one_live_cycle() {
        let mut schedule = RefreshSchedule::new();
        let first = schedule.start();
        assert!(schedule.on_visibility(false).is_none());
        assert_eq!(schedule.live_cycles(), 0);
        assert!(!schedule.is_live(first.generation()));

        let resumed = schedule.on_visibility(true).expect("visible restarts the timer");
        assert_eq!(schedule.live_cycles(), 1);
        assert!(schedule.is_live(resumed.generation()));
        assert!(!schedule.is_live(first.generation()));
    }

    #[test]
    fn repeated_visible_events_do_not_accumulate_timers() {
        let mut schedule = RefreshSchedule::new();
        let a = schedule.on_visibility(true).unwrap();
        let b = schedule.on_visibility(true).unwrap();
        assert_eq!(schedule.live_cycles(), 1);
        assert!(!schedule.is_live(a.generation()));
        assert!(schedule.is_live(b.generation()));
    }

    #[test]
    fn superseded_cycle_observes_cancellation() {
        let mut schedule = RefreshSchedule::new();
        let mut old = schedule.start();
        let _new = schedule.start();
        assert!(matches!(old.cancelled.try_recv(), Err(oneshot::Canceled)));
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_ticks_until_stopped() {
        use std::cell::{Cell, RefCell};

        let schedule = RefCell::new(RefreshSchedule::new());
        let cycle = schedule.borrow_mut().start();
        let ticks = Cell::new(0u32);

        let runner = run_cycle(cycle, 1_000, |_| {
            ticks.set(ticks.get() + 1);
            async {}
        });
        let stopper = async {
            timing::sleep_ms(2_500).await;
            schedule.borrow_mut().stop();
        };
        futures::join!(runner, stopper);

        assert_eq!(ticks.get(), 2);
    }
}
