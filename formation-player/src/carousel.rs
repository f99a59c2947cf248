//! Hero carousel auto-advance timer.
//!
//! The timer only emits ticks; the session controller decides whether a
//! tick moves the carousel (it does not in theater or search mode). The
//! background task is cancelled when the timer is stopped or dropped, so
//! no tick outlives its owner.

use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTick;

#[derive(Debug)]
pub struct CarouselTimer {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl CarouselTimer {
    /// Start ticking every `period`. The first tick arrives one full period
    /// after the call.
    pub fn spawn(period: Duration) -> (Self, mpsc::Receiver<CarouselTick>) {
        let (tx, rx) = mpsc::channel(1);
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Carousel timer shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        // A full channel means the last tick is unhandled
                        if let Err(mpsc::error::TrySendError::Closed(_)) =
                            tx.try_send(CarouselTick)
                        {
                            break;
                        }
                    }
                }
            }
        });

        (Self { shutdown, handle }, rx)
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled() || self.handle.is_finished()
    }
}

impl Drop for CarouselTimer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_every_period_until_dropped() {
        let (timer, mut ticks) = CarouselTimer::spawn(Duration::from_secs(5));

        for _ in 0..3 {
            time::advance(Duration::from_secs(5)).await;
            assert_eq!(ticks.recv().await, Some(CarouselTick));
        }

        drop(timer);
        assert_eq!(ticks.recv().await, None);
    }
}
