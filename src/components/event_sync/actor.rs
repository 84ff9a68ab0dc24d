use super::cycle::{CycleReport, SyncPipeline};
use crate::error::{component_error, BotResult};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

/// The sync actor; its mailbox serializes cycles
pub struct EventSyncActor {
    pipeline: SyncPipeline,
    command_rx: mpsc::Receiver<EventSyncCommand>,
}

/// Commands that can be sent to the sync actor
pub enum EventSyncCommand {
    RunCycle(oneshot::Sender<BotResult<CycleReport>>),
    Shutdown,
}

/// Handle for communicating with the sync actor
#[derive(Clone)]
pub struct EventSyncActorHandle {
    command_tx: mpsc::Sender<EventSyncCommand>,
}

impl EventSyncActorHandle {
    /// Run one cycle and wait for its report
    pub async fn run_cycle(&self) -> BotResult<CycleReport> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(EventSyncCommand::RunCycle(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .await
            .map_err(|_| component_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(EventSyncCommand::Shutdown).await;
        Ok(())
    }
}

impl EventSyncActor {
    /// Create a new actor and return its handle
    pub fn new(pipeline: SyncPipeline) -> (Self, EventSyncActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            pipeline,
            command_rx,
        };

        (actor, EventSyncActorHandle { command_tx })
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Event sync actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                EventSyncCommand::RunCycle(response_tx) => {
                    let result = self.pipeline.run_cycle().await;
                    let _ = response_tx.send(result);
                }
                EventSyncCommand::Shutdown => {
                    info!("Event sync actor shutting down");
                    break;
                }
            }
        }

        info!("Event sync actor shut down");
    }
}
