use std::sync::Arc;

use tokio::time::{sleep_until, Duration, Instant};
use tracing::info;

use crate::timing::clock::Clock;

use super::{engine::StoreStatusEngine, render::Render, verdict::StatusVerdict};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Recomputes the status on a fixed interval and hands it to a renderer.
pub struct StatusTicker<R: Render> {
    engine: Arc<StoreStatusEngine>,
    clock: Arc<dyn Clock>,
    renderer: R,
    interval: Duration,
}

impl<R: Render> StatusTicker<R> {
    pub fn new(
        engine: Arc<StoreStatusEngine>,
        clock: Arc<dyn Clock>,
        renderer: R,
        interval: Duration,
    ) -> Self {
        Self {
            engine,
            clock,
            renderer,
            interval,
        }
    }

    pub fn tick(&self) -> StatusVerdict {
        let verdict = self.engine.status_now(self.clock.as_ref());
        self.renderer.render(&verdict);
        verdict
    }

    /// Ticks once straight away, then once every interval. Never returns.
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "status ticker running");
        loop {
            let next = Instant::now() + self.interval;
            self.tick();
            sleep_until(next).await;
        }
    }
}
