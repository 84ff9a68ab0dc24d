use super::handle::EventSyncHandle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

/// Start the sync timer. The first cycle runs immediately.
///
/// Cycles are awaited one at a time; a tick that fires while a cycle is
/// still running is dropped. Flipping `shutdown` to `true` stops the loop
/// once the current cycle (if any) has finished.
pub fn start_scheduler(
    handle: EventSyncHandle,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Event sync scheduled every {} seconds", period.as_secs());

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            match handle.run_cycle().await {
                Ok(report) => info!(
                    "Sync cycle complete: {} event rows, {} empty rows",
                    report.event_rows, report.empty_rows
                ),
                Err(e) => error!("Sync cycle failed, retrying next tick: {}", e),
            }
        }

        info!("Event sync scheduler stopped");
    })
}
