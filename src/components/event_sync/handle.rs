use super::actor::{EventSyncActor, EventSyncActorHandle};
use super::cycle::{CycleReport, SyncPipeline};
use crate::error::BotResult;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the event sync actor
#[derive(Clone)]
pub struct EventSyncHandle {
    actor_handle: EventSyncActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl EventSyncHandle {
    /// Create a new EventSyncHandle and spawn the actor
    pub fn new(pipeline: SyncPipeline) -> Self {
        let (mut actor, handle) = EventSyncActor::new(pipeline);

        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Run one sync cycle
    pub async fn run_cycle(&self) -> BotResult<CycleReport> {
        self.actor_handle.run_cycle().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        self.actor_handle.shutdown().await
    }
}
